//! Deterministic keyword-driven provider for development and tests.
//!
//! Produces plausible analyses without any network call. The same input always
//! yields the same output, so cached and fresh analyses can be compared directly.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use super::{ExtractedSkill, JobAnalysis, LlmError, LlmOutput, LlmProvider};

/// (needles, title, may carry a "Senior " prefix)
const TITLE_PATTERNS: &[(&[&str], &str, bool)] = &[
    (&["junior software engineer", "junior developer"], "Junior Software Engineer", false),
    (&["lead software engineer", "lead engineer"], "Lead Software Engineer", false),
    (&["principal software engineer", "principal engineer"], "Principal Software Engineer", false),
    (&["staff software engineer", "staff engineer"], "Staff Software Engineer", false),
    (&["frontend developer", "frontend engineer", "front-end developer"], "Frontend Developer", true),
    (&["backend developer", "backend engineer", "back-end developer"], "Backend Developer", true),
    (&["full stack", "full-stack", "fullstack"], "Full Stack Developer", true),
    (&["devops engineer"], "DevOps Engineer", true),
    (&["site reliability engineer"], "Site Reliability Engineer", true),
    (&["cloud engineer"], "Cloud Engineer", true),
    (&["data scientist"], "Data Scientist", true),
    (&["data engineer"], "Data Engineer", true),
    (&["data analyst"], "Data Analyst", true),
    (&["machine learning engineer"], "Machine Learning Engineer", false),
    (&["product manager"], "Product Manager", true),
    (&["engineering manager"], "Engineering Manager", false),
    (&["technical lead", "tech lead"], "Technical Lead", false),
    (&["architect"], "Software Architect", false),
    (&["software engineer"], "Software Engineer", true),
    (&["developer"], "Software Developer", true),
];

const TITLE_MARKERS: &[&str] = &["job title:", "position:", "role:"];

/// (aliases, display name, category, importance)
const SKILL_KEYWORDS: &[(&[&str], &str, &str, &str)] = &[
    (&["python"], "Python", "programming", "critical"),
    (&["javascript", "js"], "JavaScript", "programming", "critical"),
    (&["typescript", "ts"], "TypeScript", "programming", "important"),
    (&["java"], "Java", "programming", "important"),
    (&["c#"], "C#", "programming", "important"),
    (&["go", "golang"], "Go", "programming", "preferred"),
    (&["rust"], "Rust", "programming", "preferred"),
    (&["react", "reactjs"], "React", "framework", "critical"),
    (&["vue", "vuejs"], "Vue", "framework", "important"),
    (&["angular"], "Angular", "framework", "important"),
    (&["fastapi"], "FastAPI", "framework", "important"),
    (&["django"], "Django", "framework", "important"),
    (&["flask"], "Flask", "framework", "preferred"),
    (&["express"], "Express", "framework", "important"),
    (&["node.js", "nodejs", "node"], "Node.js", "framework", "important"),
    (&["spring"], "Spring", "framework", "important"),
    (&["postgresql", "postgres"], "PostgreSQL", "database", "important"),
    (&["mysql"], "MySQL", "database", "important"),
    (&["mongodb", "mongo"], "MongoDB", "database", "preferred"),
    (&["redis"], "Redis", "database", "preferred"),
    (&["elasticsearch"], "Elasticsearch", "database", "preferred"),
    (&["docker"], "Docker", "devops", "important"),
    (&["kubernetes", "k8s"], "Kubernetes", "devops", "preferred"),
    (&["aws"], "AWS", "devops", "important"),
    (&["azure"], "Azure", "devops", "preferred"),
    (&["gcp"], "GCP", "devops", "preferred"),
    (&["git"], "Git", "tools", "important"),
    (&["jenkins"], "Jenkins", "devops", "preferred"),
    (&["terraform"], "Terraform", "devops", "preferred"),
];

pub struct MockProvider {
    delay: Duration,
}

impl MockProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    async fn simulate_latency(&self, fraction: u32) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay / fraction).await;
        }
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn analyze_job(
        &self,
        job_description: &str,
        _company_context: Option<&str>,
    ) -> Result<LlmOutput<JobAnalysis>, LlmError> {
        self.simulate_latency(1).await;
        Ok(LlmOutput {
            data: mock_job_analysis(job_description),
            tokens_used: estimate_tokens(job_description),
        })
    }

    async fn extract_skills(
        &self,
        text: &str,
        context_type: &str,
    ) -> Result<LlmOutput<Vec<ExtractedSkill>>, LlmError> {
        self.simulate_latency(2).await;
        Ok(LlmOutput {
            data: mock_skills(text, context_type),
            tokens_used: estimate_tokens(text),
        })
    }
}

/// Roughly four characters per token.
fn estimate_tokens(text: &str) -> u32 {
    (text.chars().count() / 4).max(1) as u32
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '.' | '#' | '+' | '-')))
        .map(|t| t.trim_matches(|c: char| c == '.' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn detect_job_title(job_description: &str) -> Option<String> {
    let head = job_description
        .lines()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let senior = head.contains("senior");
    for (needles, title, senior_prefix) in TITLE_PATTERNS {
        if contains_any(&head, needles) {
            return Some(if senior && *senior_prefix {
                format!("Senior {title}")
            } else {
                title.to_string()
            });
        }
    }

    job_description.lines().take(3).find_map(|line| {
        let line = line.to_lowercase();
        TITLE_MARKERS.iter().find_map(|marker| {
            let idx = line.find(marker)?;
            let rest = line[idx + marker.len()..].trim();
            (rest.len() > 5 && rest.len() < 100).then(|| title_case(rest))
        })
    })
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn skill(
    name: &str,
    category: &str,
    importance: &str,
    years_required: Option<u32>,
    context: &str,
) -> ExtractedSkill {
    ExtractedSkill {
        name: name.to_string(),
        category: category.to_string(),
        importance: importance.to_string(),
        years_required,
        context: Some(context.to_string()),
    }
}

fn mock_job_analysis(job_description: &str) -> JobAnalysis {
    let desc = job_description.to_lowercase();
    let words = tokenize(job_description);

    let is_senior = contains_any(&desc, &["senior", "lead", "principal", "architect", "director"]);
    let is_junior = contains_any(&desc, &["junior", "entry", "graduate", "intern"]);
    let is_backend = contains_any(&desc, &["backend", "api", "server", "database", "microservices"]);
    let is_frontend = contains_any(&desc, &["frontend", "react", "vue", "angular"])
        || words.contains("ui")
        || words.contains("ux");
    let is_fullstack = contains_any(&desc, &["fullstack", "full-stack", "full stack"]);
    let is_devops = contains_any(&desc, &["devops", "cloud", "aws", "docker", "kubernetes", "infrastructure"]);
    let is_mobile = contains_any(&desc, &["mobile", "ios", "android", "react native", "flutter"]);
    let is_data = contains_any(&desc, &["data", "analytics", "machine learning", "python", "sql"])
        || words.contains("ai");

    let (experience_level, difficulty) = if is_senior {
        ("senior", "high")
    } else if is_junior {
        ("junior", "low")
    } else {
        ("mid", "medium")
    };

    let industry = if contains_any(&desc, &["fintech", "finance", "banking"]) {
        "fintech"
    } else if contains_any(&desc, &["healthcare", "medical", "biotech"]) {
        "healthcare"
    } else if contains_any(&desc, &["ecommerce", "e-commerce", "retail"]) {
        "ecommerce"
    } else if contains_any(&desc, &["startup", "scale-up"]) {
        "startup"
    } else {
        "technology"
    };

    let pick = |senior: u32, junior: u32, mid: u32| {
        if is_senior {
            senior
        } else if is_junior {
            junior
        } else {
            mid
        }
    };

    let mut technical_skills = Vec::new();

    if is_backend || is_fullstack {
        technical_skills.push(skill("Python", "programming", "critical", Some(pick(3, 1, 2)), "Backend development and API design"));
        technical_skills.push(skill("FastAPI", "framework", "important", is_senior.then_some(1), "Building REST APIs"));
        technical_skills.push(skill("PostgreSQL", "database", "important", Some(pick(2, 1, 1)), "Database design and optimization"));
    }

    if is_frontend || is_fullstack {
        technical_skills.push(skill("React", "framework", "critical", Some(pick(2, 1, 1)), "Frontend component development"));
        technical_skills.push(skill("TypeScript", "programming", "important", is_senior.then_some(1), "Type-safe JavaScript development"));
        technical_skills.push(skill("CSS", "programming", "important", None, "Responsive design and styling"));
    }

    if is_devops {
        technical_skills.push(skill("AWS", "devops", "critical", Some(pick(2, 1, 1)), "Cloud infrastructure management"));
        technical_skills.push(skill("Docker", "devops", "important", Some(1), "Containerization and deployment"));
        technical_skills.push(skill(
            "Kubernetes",
            "devops",
            if is_junior { "preferred" } else { "important" },
            (!is_junior).then_some(1),
            "Container orchestration",
        ));
    }

    if is_mobile {
        technical_skills.push(skill("React Native", "framework", "critical", Some(pick(2, 1, 1)), "Cross-platform mobile development"));
        technical_skills.push(skill("JavaScript", "programming", "critical", Some(pick(3, 2, 2)), "Mobile app development"));
    }

    if is_data {
        technical_skills.push(skill("Python", "programming", "critical", Some(pick(3, 2, 2)), "Data analysis and machine learning"));
        technical_skills.push(skill("SQL", "database", "critical", Some(pick(2, 1, 1)), "Data querying and analysis"));
        technical_skills.push(skill("Pandas", "framework", "important", Some(1), "Data manipulation and analysis"));
    }

    if words.contains("git") || desc.contains("version control") {
        technical_skills.push(skill("Git", "tools", "important", None, "Version control and collaboration"));
    }

    let mut soft_skills = vec![
        skill("Communication", "soft_skill", "important", None, "Collaborating with cross-functional teams"),
        skill("Problem Solving", "soft_skill", "critical", None, "Analyzing complex technical challenges"),
    ];
    if is_senior {
        soft_skills.push(skill("Leadership", "soft_skill", "important", None, "Mentoring junior developers and leading projects"));
        soft_skills.push(skill("Architecture Design", "soft_skill", "important", None, "Designing scalable system architecture"));
    }

    let mut key_requirements = vec![
        "Bachelor's degree in Computer Science or related field".to_string(),
        format!(
            "{}+ years of software development experience",
            pick(3, 1, 2)
        ),
    ];
    if is_backend {
        key_requirements.push("Strong experience with backend technologies and API design".to_string());
    }
    if is_frontend {
        key_requirements.push("Proficiency in modern frontend frameworks and responsive design".to_string());
    }
    if is_devops {
        key_requirements.push("Experience with cloud platforms and infrastructure automation".to_string());
    }

    let role_prefix = if is_senior {
        "Senior "
    } else if is_junior {
        "Junior "
    } else {
        ""
    };
    let domain = if is_backend {
        "Backend"
    } else if is_frontend {
        "Frontend"
    } else if is_fullstack {
        "Full-Stack"
    } else if is_devops {
        "DevOps"
    } else if is_mobile {
        "Mobile"
    } else if is_data {
        "Data"
    } else {
        "Software"
    };

    JobAnalysis {
        job_title: detect_job_title(job_description),
        key_requirements,
        technical_skills,
        soft_skills,
        experience_level: experience_level.to_string(),
        industry: industry.to_string(),
        summary: format!(
            "{role_prefix}{domain} Developer position focusing on building scalable applications in the {industry} industry."
        ),
        difficulty_assessment: difficulty.to_string(),
        compensation_insights: None,
    }
}

fn mock_skills(text: &str, context_type: &str) -> Vec<ExtractedSkill> {
    let words = tokenize(text);
    let mut skills: Vec<ExtractedSkill> = SKILL_KEYWORDS
        .iter()
        .filter(|(aliases, ..)| aliases.iter().any(|a| words.contains(*a)))
        .map(|(_, name, category, importance)| {
            let years_required = match *importance {
                "critical" => Some(2),
                "important" => Some(1),
                _ => None,
            };
            skill(
                name,
                category,
                importance,
                years_required,
                &format!("Mentioned in {}", context_type.replace('_', " ")),
            )
        })
        .collect();

    if skills.len() < 3 {
        let inferred = format!("Inferred from {}", context_type.replace('_', " "));
        skills.push(skill("Communication", "soft_skill", "important", None, &inferred));
        skills.push(skill("Problem Solving", "soft_skill", "critical", None, &inferred));
    }

    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_JD: &str = "Senior Backend Engineer\n\
        We are a fintech company building payment APIs. You will design microservices \
        on AWS with Docker and PostgreSQL, and keep everything in git.";

    const FRONTEND_JD: &str = "Junior Frontend Developer\n\
        Join our e-commerce team building React interfaces with a focus on UI polish.";

    #[test]
    fn test_backend_jd_yields_backend_skills() {
        let analysis = mock_job_analysis(BACKEND_JD);
        let names: Vec<_> = analysis.technical_skills.iter().map(|s| s.name.as_str()).collect();

        assert!(names.contains(&"Python"));
        assert!(names.contains(&"PostgreSQL"));
        assert!(names.contains(&"AWS"));
        assert!(names.contains(&"Git"));
        assert_eq!(analysis.experience_level, "senior");
        assert_eq!(analysis.industry, "fintech");
        assert_eq!(analysis.difficulty_assessment, "high");
        assert_eq!(analysis.job_title.as_deref(), Some("Senior Backend Developer"));
    }

    #[test]
    fn test_senior_roles_add_leadership_soft_skills() {
        let analysis = mock_job_analysis(BACKEND_JD);
        assert!(analysis.soft_skills.iter().any(|s| s.name == "Leadership"));
    }

    #[test]
    fn test_junior_frontend_jd() {
        let analysis = mock_job_analysis(FRONTEND_JD);
        assert_eq!(analysis.experience_level, "junior");
        assert_eq!(analysis.industry, "ecommerce");
        assert_eq!(analysis.job_title.as_deref(), Some("Frontend Developer"));
        assert!(analysis.technical_skills.iter().any(|s| s.name == "React"));
        assert!(analysis.summary.starts_with("Junior Frontend"));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let a = serde_json::to_value(mock_job_analysis(BACKEND_JD)).unwrap();
        let b = serde_json::to_value(mock_job_analysis(BACKEND_JD)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_title_marker_fallback() {
        let title = detect_job_title("Position: quantum research scientist\nMore text");
        assert_eq!(title.as_deref(), Some("Quantum Research Scientist"));
    }

    #[test]
    fn test_mock_skills_match_whole_words_only() {
        let skills = mock_skills("We need good people who know Django and Node.js.", "job_description");
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();

        assert!(names.contains(&"Django"));
        assert!(names.contains(&"Node.js"));
        // "good" must not match Go
        assert!(!names.contains(&"Go"));
    }

    #[test]
    fn test_mock_skills_adds_soft_skills_when_sparse() {
        let skills = mock_skills("Python programming", "health_check");
        assert!(skills.iter().any(|s| s.name == "Python"));
        assert!(skills.iter().any(|s| s.name == "Communication"));
        assert_eq!(skills[0].context.as_deref(), Some("Mentioned in health check"));
    }

    #[tokio::test]
    async fn test_provider_reports_tokens() {
        let provider = MockProvider::new(Duration::ZERO);
        let output = provider.analyze_job(BACKEND_JD, None).await.unwrap();
        assert_eq!(output.tokens_used, estimate_tokens(BACKEND_JD));
        assert!(provider.health_check().await);
    }
}
