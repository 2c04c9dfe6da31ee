//! Normalizes provider skills: type, importance, confidence, synonyms.

use std::collections::HashSet;

use super::types::{DifficultyLevel, EnrichedSkill, SkillImportance, SkillType};
use crate::llm_client::{ExtractedSkill, JobAnalysis};

const SYNONYMS: &[(&str, &[&str])] = &[
    ("javascript", &["js", "ecmascript"]),
    ("typescript", &["ts"]),
    ("python", &["py"]),
    ("postgresql", &["postgres", "pg"]),
    ("mongodb", &["mongo"]),
    ("react", &["reactjs"]),
    ("angular", &["angularjs"]),
    ("vue", &["vuejs"]),
    ("node", &["nodejs", "node.js"]),
    ("node.js", &["node", "nodejs"]),
];

const RELATED: &[(&str, &[&str])] = &[
    ("react", &["javascript", "typescript", "jsx", "redux", "next.js"]),
    ("python", &["django", "flask", "pandas", "numpy", "pytest"]),
    ("javascript", &["html", "css", "typescript", "node.js", "npm"]),
    ("sql", &["postgresql", "mysql", "database design", "data modeling"]),
    ("aws", &["cloud computing", "docker", "kubernetes", "devops"]),
];

fn lookup(table: &[(&str, &[&str])], skill_name: &str) -> Vec<String> {
    let key = skill_name.to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, values)| values.iter().map(|v| v.to_string()).collect())
        .unwrap_or_default()
}

pub fn synonyms_for(skill_name: &str) -> Vec<String> {
    lookup(SYNONYMS, skill_name)
}

pub fn related_skills_for(skill_name: &str) -> Vec<String> {
    lookup(RELATED, skill_name)
}

pub fn map_skill_type(category: &str) -> SkillType {
    let c = category.to_lowercase();
    if c.contains("programming") || c.contains("language") {
        SkillType::Programming
    } else if c.contains("framework") || c.contains("library") {
        SkillType::Framework
    } else if c.contains("database") || c.contains("sql") {
        SkillType::Database
    } else if c.contains("devops") || c.contains("deployment") {
        SkillType::Devops
    } else if c.contains("system") && c.contains("design") {
        SkillType::SystemDesign
    } else if c.contains("algorithm") || c.contains("data structure") {
        SkillType::Algorithms
    } else if c.contains("test") {
        SkillType::Testing
    } else if c.contains("architecture") {
        SkillType::Architecture
    } else if c.contains("tool") {
        SkillType::Tools
    } else {
        SkillType::SoftSkill
    }
}

pub fn map_importance(importance: &str) -> SkillImportance {
    let i = importance.to_lowercase();
    if i.contains("critical") || i.contains("required") {
        SkillImportance::Critical
    } else if i.contains("important") || i.contains("essential") {
        SkillImportance::Important
    } else if i.contains("preferred") || i.contains("desirable") {
        SkillImportance::Preferred
    } else {
        SkillImportance::NiceToHave
    }
}

pub fn map_difficulty(assessment: &str) -> DifficultyLevel {
    let d = assessment.to_lowercase();
    if d.contains("beginner") || d.contains("entry") || d.contains("low") {
        DifficultyLevel::Beginner
    } else if d.contains("advanced") || d.contains("senior") || d.contains("high") {
        DifficultyLevel::Advanced
    } else {
        DifficultyLevel::Intermediate
    }
}

pub fn confidence(skill: &ExtractedSkill) -> f64 {
    let mut score: f64 = 0.7;
    if skill.context.as_deref().is_some_and(|c| c.chars().count() > 20) {
        score += 0.1;
    }
    if skill.years_required.is_some() {
        score += 0.1;
    }
    if matches!(skill.importance.as_str(), "critical" | "required" | "important") {
        score += 0.1;
    }
    score.min(1.0)
}

fn enrich(skill: &ExtractedSkill, skill_type: SkillType) -> EnrichedSkill {
    EnrichedSkill {
        name: skill.name.trim().to_string(),
        category: skill.category.clone(),
        skill_type,
        importance: map_importance(&skill.importance),
        years_required: skill.years_required,
        context: skill.context.clone(),
        confidence_score: confidence(skill),
        synonyms: synonyms_for(skill.name.trim()),
        related_skills: related_skills_for(skill.name.trim()),
    }
}

/// Collapses case-insensitive duplicates and blank names, keeping the first.
fn dedup(skills: impl IntoIterator<Item = EnrichedSkill>) -> Vec<EnrichedSkill> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .filter(|s| !s.name.is_empty() && seen.insert(s.name.to_lowercase()))
        .collect()
}

/// Technical skills typed by category, soft skills always `soft_skill`.
pub fn enrich_analysis(analysis: &JobAnalysis) -> Vec<EnrichedSkill> {
    let technical = analysis
        .technical_skills
        .iter()
        .map(|s| enrich(s, map_skill_type(&s.category)));
    let soft = analysis
        .soft_skills
        .iter()
        .map(|s| enrich(s, SkillType::SoftSkill));
    dedup(technical.chain(soft))
}

pub fn enrich_skills(skills: &[ExtractedSkill]) -> Vec<EnrichedSkill> {
    dedup(skills.iter().map(|s| enrich(s, map_skill_type(&s.category))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(name: &str, category: &str, importance: &str) -> ExtractedSkill {
        ExtractedSkill {
            name: name.into(),
            category: category.into(),
            importance: importance.into(),
            years_required: None,
            context: None,
        }
    }

    #[test]
    fn test_skill_type_mapping() {
        assert_eq!(map_skill_type("Programming Language"), SkillType::Programming);
        assert_eq!(map_skill_type("UI library"), SkillType::Framework);
        assert_eq!(map_skill_type("SQL"), SkillType::Database);
        assert_eq!(map_skill_type("system design"), SkillType::SystemDesign);
        assert_eq!(map_skill_type("Data Structures"), SkillType::Algorithms);
        assert_eq!(map_skill_type("unit testing"), SkillType::Testing);
        assert_eq!(map_skill_type("tools"), SkillType::Tools);
        assert_eq!(map_skill_type("leadership"), SkillType::SoftSkill);
    }

    #[test]
    fn test_importance_mapping() {
        assert_eq!(map_importance("Required"), SkillImportance::Critical);
        assert_eq!(map_importance("essential"), SkillImportance::Important);
        assert_eq!(map_importance("desirable"), SkillImportance::Preferred);
        assert_eq!(map_importance(""), SkillImportance::NiceToHave);
    }

    #[test]
    fn test_difficulty_mapping() {
        assert_eq!(map_difficulty("high"), DifficultyLevel::Advanced);
        assert_eq!(map_difficulty("Entry level"), DifficultyLevel::Beginner);
        assert_eq!(map_difficulty("medium"), DifficultyLevel::Intermediate);
    }

    #[test]
    fn test_confidence_accumulates_and_caps() {
        let mut skill = extracted("Rust", "programming", "nice");
        assert!((confidence(&skill) - 0.7).abs() < 1e-9);

        skill.importance = "critical".into();
        skill.years_required = Some(3);
        skill.context = Some("Writing low-latency trading services".into());
        assert!((confidence(&skill) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_synonyms_and_related_are_case_insensitive() {
        assert_eq!(synonyms_for("PostgreSQL"), vec!["postgres", "pg"]);
        assert!(related_skills_for("React").contains(&"redux".to_string()));
        assert!(synonyms_for("Haskell").is_empty());
    }

    #[test]
    fn test_enrich_skills_dedups_case_insensitively() {
        let skills = vec![
            extracted("Python", "programming", "critical"),
            extracted("python", "framework", "preferred"),
            extracted("  ", "programming", "critical"),
        ];
        let enriched = enrich_skills(&skills);
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].importance, SkillImportance::Critical);
    }

    #[test]
    fn test_soft_skills_always_soft() {
        let analysis = JobAnalysis {
            job_title: None,
            key_requirements: vec![],
            technical_skills: vec![extracted("Go", "programming", "important")],
            soft_skills: vec![extracted("Leadership", "programming", "important")],
            experience_level: "mid".into(),
            industry: "technology".into(),
            summary: "Role".into(),
            difficulty_assessment: "medium".into(),
            compensation_insights: None,
        };
        let enriched = enrich_analysis(&analysis);
        assert_eq!(enriched[0].skill_type, SkillType::Programming);
        assert_eq!(enriched[1].skill_type, SkillType::SoftSkill);
    }
}
