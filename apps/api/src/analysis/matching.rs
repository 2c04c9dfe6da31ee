//! Matches extracted skills against the skill cards already in the catalogue.

use std::collections::HashSet;

use super::types::{EnrichedSkill, MatchType, SkillMatch};

const EXACT_CONFIDENCE: f64 = 1.0;
const SYNONYM_CONFIDENCE: f64 = 0.9;
const PARTIAL_THRESHOLD: f64 = 0.7;

/// Similarity of two lowercase names in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }
    if a.contains(b) || b.contains(a) {
        return len_a.min(len_b) as f64 / len_a.max(len_b) as f64 * 0.8;
    }

    let set_a: HashSet<char> = a.chars().collect();
    let set_b: HashSet<char> = b.chars().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

fn matched(name: &str, confidence: f64, match_type: MatchType) -> SkillMatch {
    SkillMatch {
        matched_skill_name: Some(name.to_string()),
        match_confidence: confidence,
        match_type,
        is_new_skill: false,
    }
}

fn unmatched(match_type: MatchType) -> SkillMatch {
    SkillMatch {
        matched_skill_name: None,
        match_confidence: 0.0,
        match_type,
        is_new_skill: true,
    }
}

/// Exact beats synonym beats the best partial match above the threshold.
pub fn match_skill(skill: &EnrichedSkill, known: &[String]) -> SkillMatch {
    let lowered: Vec<(String, &String)> = known.iter().map(|k| (k.to_lowercase(), k)).collect();
    let find = |needle: &str| {
        lowered
            .iter()
            .find(|(lower, _)| lower == needle)
            .map(|(_, original)| original.as_str())
    };

    let name = skill.name.to_lowercase();
    if let Some(hit) = find(&name) {
        return matched(hit, EXACT_CONFIDENCE, MatchType::Exact);
    }

    for synonym in &skill.synonyms {
        if let Some(hit) = find(&synonym.to_lowercase()) {
            return matched(hit, SYNONYM_CONFIDENCE, MatchType::Synonym);
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (lower, original) in &lowered {
        let score = similarity(&name, lower);
        if score > PARTIAL_THRESHOLD && best.map_or(true, |(_, b)| score > b) {
            best = Some((original.as_str(), score));
        }
    }

    match best {
        Some((hit, score)) => matched(hit, score, MatchType::Partial),
        None => unmatched(MatchType::New),
    }
}

/// `None` means the catalogue could not be read; every skill is then new.
pub fn match_skills(skills: &[EnrichedSkill], known: Option<&[String]>) -> Vec<SkillMatch> {
    match known {
        Some(known) => skills.iter().map(|s| match_skill(s, known)).collect(),
        None => skills.iter().map(|_| unmatched(MatchType::NoDatabase)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::enrich::synonyms_for;
    use crate::analysis::types::{SkillImportance, SkillType};

    fn skill(name: &str) -> EnrichedSkill {
        EnrichedSkill {
            name: name.into(),
            category: "programming".into(),
            skill_type: SkillType::Programming,
            importance: SkillImportance::Important,
            years_required: None,
            context: None,
            confidence_score: 0.8,
            synonyms: synonyms_for(name),
            related_skills: vec![],
        }
    }

    fn catalogue() -> Vec<String> {
        ["JavaScript", "React", "Node.js", "System Design", "TypeScript"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("react", "react"), 1.0);
        assert_eq!(similarity("", "react"), 0.0);
        // containment: 5/6 * 0.8
        assert!((similarity("react", "reacts") - 5.0 / 6.0 * 0.8).abs() < 1e-9);
        // disjoint sets
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let m = match_skill(&skill("react"), &catalogue());
        assert_eq!(m.match_type, MatchType::Exact);
        assert_eq!(m.matched_skill_name.as_deref(), Some("React"));
        assert_eq!(m.match_confidence, 1.0);
        assert!(!m.is_new_skill);
    }

    #[test]
    fn test_synonym_match() {
        let m = match_skill(&skill("Node"), &catalogue());
        assert_eq!(m.match_type, MatchType::Synonym);
        assert_eq!(m.matched_skill_name.as_deref(), Some("Node.js"));
        assert_eq!(m.match_confidence, 0.9);
    }

    #[test]
    fn test_partial_match_on_containment() {
        // contains "typescript": 10/11 * 0.8
        let m = match_skill(&skill("TypeScripts"), &catalogue());
        assert_eq!(m.match_type, MatchType::Partial);
        assert_eq!(m.matched_skill_name.as_deref(), Some("TypeScript"));
        assert!(m.match_confidence > PARTIAL_THRESHOLD);
    }

    #[test]
    fn test_unknown_skill_is_new() {
        let m = match_skill(&skill("Kafka"), &catalogue());
        assert_eq!(m.match_type, MatchType::New);
        assert!(m.is_new_skill);
        assert_eq!(m.match_confidence, 0.0);
    }

    #[test]
    fn test_missing_catalogue_marks_everything_new() {
        let matches = match_skills(&[skill("React"), skill("Kafka")], None);
        assert!(matches.iter().all(|m| m.match_type == MatchType::NoDatabase && m.is_new_skill));
    }
}
