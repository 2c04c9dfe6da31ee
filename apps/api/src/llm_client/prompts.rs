// Prompt constants for job analysis and skill extraction.

/// System prompt for job analysis. Enforces JSON-only output.
pub const JOB_ANALYSIS_SYSTEM: &str = "You are an expert technical recruiter and interview coach. \
    Analyze job descriptions and extract structured information about the role. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for free-text skill extraction.
pub const SKILL_EXTRACTION_SYSTEM: &str = "You are a precise skills taxonomist. \
    Identify professional skills mentioned in text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Job analysis prompt template.
/// Replace: {company_context}, {job_description}
const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job description for a candidate preparing for interviews.

Return a JSON object with this EXACT schema (no extra fields):
{
  "job_title": "Senior Backend Engineer",
  "key_requirements": ["5+ years of backend development"],
  "technical_skills": [
    {
      "name": "Python",
      "category": "programming",
      "importance": "critical",
      "years_required": 3,
      "context": "Backend services and API design"
    }
  ],
  "soft_skills": [
    {
      "name": "Communication",
      "category": "soft_skill",
      "importance": "important",
      "years_required": null,
      "context": "Working with cross-functional teams"
    }
  ],
  "experience_level": "senior",
  "industry": "fintech",
  "summary": "One or two sentences describing the role",
  "difficulty_assessment": "high",
  "compensation_insights": null
}

Rules:
- "category" is one of: programming, framework, database, devops, system design, algorithms, testing, architecture, tools, soft_skill
- "importance" is one of: critical, important, preferred, nice_to_have
- "experience_level" is one of: junior, mid, senior
- "difficulty_assessment" is one of: low, medium, high
- "years_required" is an integer or null when the posting does not say
- Use null for job_title when the posting does not name the role
- Only include compensation_insights when the posting mentions pay

COMPANY CONTEXT:
{company_context}

JOB DESCRIPTION:
{job_description}"#;

/// Skill extraction prompt template.
/// Replace: {context_type}, {text}
const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract every professional skill mentioned in the following {context_type}.

Return a JSON object:
{
  "skills": [
    {
      "name": "PostgreSQL",
      "category": "database",
      "importance": "important",
      "years_required": null,
      "context": "Where and how the skill was mentioned"
    }
  ]
}

TEXT:
{text}"#;

pub fn job_analysis_prompt(job_description: &str, company_context: Option<&str>) -> String {
    JOB_ANALYSIS_PROMPT_TEMPLATE
        .replace("{company_context}", company_context.unwrap_or("Not provided"))
        .replace("{job_description}", job_description)
}

pub fn skill_extraction_prompt(text: &str, context_type: &str) -> String {
    SKILL_EXTRACTION_PROMPT_TEMPLATE
        .replace("{context_type}", &context_type.replace('_', " "))
        .replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_analysis_prompt_embeds_description_and_context() {
        let prompt = job_analysis_prompt("Rust engineer wanted", Some("Series B fintech"));
        assert!(prompt.contains("Rust engineer wanted"));
        assert!(prompt.contains("Series B fintech"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_job_analysis_prompt_without_context() {
        let prompt = job_analysis_prompt("Rust engineer wanted", None);
        assert!(prompt.contains("Not provided"));
    }

    #[test]
    fn test_skill_extraction_prompt_humanizes_context_type() {
        let prompt = skill_extraction_prompt("Go and Kafka", "job_description");
        assert!(prompt.contains("following job description"));
        assert!(prompt.contains("Go and Kafka"));
    }
}
