//! Turns matched skills into a prioritized training plan.

use super::types::{
    DifficultyLevel, EnrichedSkill, SkillImportance, SkillMatch, SkillRecommendation, SkillType,
    TrainingPriority,
};

pub const MAX_RECOMMENDATIONS: usize = 10;
const MAX_ACTIONS: usize = 5;
const MAX_PREREQUISITES: usize = 3;

pub fn priority_for(importance: SkillImportance) -> TrainingPriority {
    match importance {
        SkillImportance::Critical => TrainingPriority::High,
        SkillImportance::Important => TrainingPriority::Medium,
        _ => TrainingPriority::Low,
    }
}

fn actions(skill: &EnrichedSkill, is_new: bool) -> Vec<String> {
    let name = &skill.name;
    let mut actions = Vec::new();
    if is_new {
        actions.push(format!("Learn the fundamentals of {name}"));
    }
    match skill.skill_type {
        SkillType::Programming => actions.extend([
            format!("Practice coding exercises in {name}"),
            format!("Build a small project using {name}"),
            format!("Read {name} documentation and best practices"),
        ]),
        SkillType::Framework => actions.extend([
            format!("Complete {name} tutorial or course"),
            format!("Build a sample application with {name}"),
            format!("Study {name} architecture and patterns"),
        ]),
        _ => actions.extend([
            format!("Study {name} concepts and principles"),
            format!("Practice {name} through hands-on exercises"),
            format!("Apply {name} in a real-world scenario"),
        ]),
    }
    actions.truncate(MAX_ACTIONS);
    actions
}

pub fn estimate_duration(skill: &EnrichedSkill) -> &'static str {
    if skill.years_required.is_some_and(|y| y > 2) {
        "3-6 months"
    } else if skill.importance == SkillImportance::Critical {
        "4-8 weeks"
    } else {
        "2-4 weeks"
    }
}

pub fn training_difficulty(skill_type: SkillType) -> DifficultyLevel {
    match skill_type {
        SkillType::SystemDesign | SkillType::Architecture => DifficultyLevel::Advanced,
        SkillType::Algorithms | SkillType::Devops => DifficultyLevel::Intermediate,
        _ => DifficultyLevel::Beginner,
    }
}

fn learning_resources(skill: &EnrichedSkill) -> Vec<String> {
    let name = &skill.name;
    match skill.skill_type {
        SkillType::Programming => vec![
            format!("Official {name} documentation"),
            format!("{name} interactive tutorials"),
            format!("Online coding platforms with {name} exercises"),
        ],
        SkillType::Framework => vec![
            format!("{name} official getting started guide"),
            format!("Video course on {name}"),
            "Community examples and templates".to_string(),
        ],
        _ => vec![
            format!("Online course on {name}"),
            format!("Books about {name}"),
            "Professional blogs and articles".to_string(),
        ],
    }
}

fn success_metrics(skill: &EnrichedSkill) -> Vec<String> {
    let name = &skill.name;
    match skill.skill_type {
        SkillType::Programming => vec![
            format!("Complete coding challenges in {name}"),
            format!("Build and deploy a project using {name}"),
            format!("Pass technical interview questions about {name}"),
        ],
        SkillType::Framework => vec![
            format!("Build a functional application with {name}"),
            format!("Understand {name} core concepts"),
            format!("Follow {name} best practices"),
        ],
        _ => vec![
            format!("Demonstrate understanding of {name} principles"),
            format!("Apply {name} in practical scenarios"),
            format!("Explain {name} concepts clearly"),
        ],
    }
}

fn recommend(skill: EnrichedSkill, skill_match: SkillMatch) -> SkillRecommendation {
    let is_new = skill_match.is_new_skill;
    SkillRecommendation {
        priority: priority_for(skill.importance),
        recommended_actions: actions(&skill, is_new),
        estimated_duration: Some(estimate_duration(&skill).to_string()),
        difficulty_level: training_difficulty(skill.skill_type),
        prerequisite_skills: skill
            .related_skills
            .iter()
            .take(MAX_PREREQUISITES)
            .cloned()
            .collect(),
        learning_resources: learning_resources(&skill),
        success_metrics: success_metrics(&skill),
        name: skill.name,
        category: skill.category,
        skill_type: skill.skill_type,
        importance: skill.importance,
        years_required: skill.years_required,
        context: skill.context,
        confidence_score: skill.confidence_score,
        synonyms: skill.synonyms,
        related_skills: skill.related_skills,
        skill_match,
    }
}

/// Orders by importance, then matched skills by descending confidence, then
/// new skills. Keeps the first `MAX_RECOMMENDATIONS`.
pub fn build_recommendations(
    skills: Vec<EnrichedSkill>,
    matches: Vec<SkillMatch>,
) -> Vec<SkillRecommendation> {
    let mut pairs: Vec<(EnrichedSkill, SkillMatch)> = skills.into_iter().zip(matches).collect();
    let key = |(skill, m): &(EnrichedSkill, SkillMatch)| {
        let confidence_key = if m.is_new_skill { 1.0 } else { -m.match_confidence };
        (skill.importance.rank(), confidence_key)
    };
    pairs.sort_by(|a, b| {
        let (rank_a, conf_a) = key(a);
        let (rank_b, conf_b) = key(b);
        rank_a.cmp(&rank_b).then(conf_a.total_cmp(&conf_b))
    });

    pairs
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(skill, m)| recommend(skill, m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::MatchType;

    fn skill(name: &str, skill_type: SkillType, importance: SkillImportance) -> EnrichedSkill {
        EnrichedSkill {
            name: name.into(),
            category: "programming".into(),
            skill_type,
            importance,
            years_required: None,
            context: None,
            confidence_score: 0.8,
            synonyms: vec![],
            related_skills: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        }
    }

    fn found(confidence: f64) -> SkillMatch {
        SkillMatch {
            matched_skill_name: Some("X".into()),
            match_confidence: confidence,
            match_type: MatchType::Partial,
            is_new_skill: false,
        }
    }

    fn new() -> SkillMatch {
        SkillMatch {
            matched_skill_name: None,
            match_confidence: 0.0,
            match_type: MatchType::New,
            is_new_skill: true,
        }
    }

    #[test]
    fn test_ordering_critical_first_then_matched_before_new() {
        let skills = vec![
            skill("Nice", SkillType::Tools, SkillImportance::NiceToHave),
            skill("NewCritical", SkillType::Programming, SkillImportance::Critical),
            skill("WeakCritical", SkillType::Programming, SkillImportance::Critical),
            skill("StrongCritical", SkillType::Programming, SkillImportance::Critical),
        ];
        let matches = vec![found(1.0), new(), found(0.75), found(1.0)];

        let names: Vec<_> = build_recommendations(skills, matches)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["StrongCritical", "WeakCritical", "NewCritical", "Nice"]);
    }

    #[test]
    fn test_caps_at_ten() {
        let skills: Vec<_> = (0..15)
            .map(|i| skill(&format!("S{i}"), SkillType::Tools, SkillImportance::Preferred))
            .collect();
        let matches = (0..15).map(|_| new()).collect();
        assert_eq!(build_recommendations(skills, matches).len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_new_skill_gets_fundamentals_first() {
        let recs = build_recommendations(
            vec![skill("Rust", SkillType::Programming, SkillImportance::Critical)],
            vec![new()],
        );
        let rec = &recs[0];
        assert_eq!(rec.recommended_actions[0], "Learn the fundamentals of Rust");
        assert_eq!(rec.recommended_actions.len(), 4);
        assert_eq!(rec.priority, TrainingPriority::High);
        assert_eq!(rec.estimated_duration.as_deref(), Some("4-8 weeks"));
        assert_eq!(rec.prerequisite_skills.len(), 3);
        assert_eq!(rec.learning_resources.len(), 3);
        assert_eq!(rec.success_metrics.len(), 3);
    }

    #[test]
    fn test_duration_and_difficulty() {
        let mut s = skill("Kubernetes", SkillType::Devops, SkillImportance::Preferred);
        assert_eq!(estimate_duration(&s), "2-4 weeks");
        s.years_required = Some(3);
        assert_eq!(estimate_duration(&s), "3-6 months");
        assert_eq!(training_difficulty(SkillType::Devops), DifficultyLevel::Intermediate);
        assert_eq!(training_difficulty(SkillType::Architecture), DifficultyLevel::Advanced);
        assert_eq!(training_difficulty(SkillType::Framework), DifficultyLevel::Beginner);
    }
}
