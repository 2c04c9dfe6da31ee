//! Per-user skill gap analysis and interview readiness.

use sqlx::PgPool;
use tracing::warn;

use super::types::{SkillGap, SkillImportance, SkillRecommendation, TrainingPriority};
use crate::models::analysis::UserSkillRow;

/// Readiness reported when there is nothing to compare against.
pub const DEFAULT_READINESS: f64 = 0.8;
const UNKNOWN_SKILL_READINESS: f64 = 0.2;

fn level_score(level: &str) -> Option<u32> {
    match level.to_lowercase().as_str() {
        "beginner" => Some(1),
        "intermediate" => Some(2),
        "advanced" => Some(3),
        "expert" => Some(4),
        _ => None,
    }
}

pub fn required_level(years: u32) -> &'static str {
    match years {
        y if y >= 5 => "expert",
        y if y >= 3 => "advanced",
        y if y >= 1 => "intermediate",
        _ => "beginner",
    }
}

fn level_gap(required: &str, current: Option<&str>) -> i64 {
    let required = i64::from(level_score(required).unwrap_or(2));
    let current = i64::from(current.and_then(level_score).unwrap_or(0));
    required - current
}

pub fn gap_severity(
    required: &str,
    current: Option<&str>,
    importance: SkillImportance,
) -> TrainingPriority {
    let gap = level_gap(required, current);
    match importance {
        SkillImportance::Critical if gap >= 2 => TrainingPriority::High,
        SkillImportance::Critical if gap >= 1 => TrainingPriority::Medium,
        SkillImportance::Important if gap >= 3 => TrainingPriority::High,
        SkillImportance::Important if gap >= 2 => TrainingPriority::Medium,
        _ => TrainingPriority::Low,
    }
}

/// Hours to close the gap, never below 10.
pub fn study_hours(required: &str, current: Option<&str>, category: &str) -> u32 {
    let category = category.to_lowercase();
    let base = if category.contains("system design") || category.contains("architecture") {
        60
    } else if category.contains("algorithm") {
        50
    } else if category.contains("programming") {
        30
    } else {
        40
    };
    let hours = level_gap(required, current) * base;
    hours.max(10) as u32
}

pub fn analyze_gaps(
    recommendations: &[SkillRecommendation],
    user_skills: &[UserSkillRow],
) -> Vec<SkillGap> {
    recommendations
        .iter()
        .map(|rec| {
            let required = required_level(rec.years_required.unwrap_or(0));
            let current = user_skills
                .iter()
                .find(|u| u.skill_name.eq_ignore_ascii_case(&rec.name))
                .map(|u| u.proficiency_level.clone());
            SkillGap {
                skill_name: rec.name.clone(),
                required_level: required.to_string(),
                gap_severity: gap_severity(required, current.as_deref(), rec.importance),
                estimated_study_time: study_hours(required, current.as_deref(), &rec.category),
                current_level: current,
            }
        })
        .collect()
}

/// Severity-weighted mean of per-skill readiness, in `[0, 1]`.
pub fn readiness_score(gaps: &[SkillGap]) -> f64 {
    if gaps.is_empty() {
        return DEFAULT_READINESS;
    }
    let (weighted, total_weight) = gaps.iter().fold((0.0, 0.0), |(sum, total), gap| {
        let weight = gap.gap_severity.weight();
        let readiness = match gap.current_level.as_deref() {
            None => UNKNOWN_SKILL_READINESS,
            Some(current) => {
                let current = f64::from(level_score(current).unwrap_or(1));
                let required = f64::from(level_score(&gap.required_level).unwrap_or(2));
                (current / required).min(1.0)
            }
        };
        (sum + readiness * weight, total + weight)
    });
    weighted / total_weight
}

pub async fn load_user_skills(pool: &PgPool, user_id: &str) -> Result<Vec<UserSkillRow>, sqlx::Error> {
    sqlx::query_as::<_, UserSkillRow>(
        "SELECT skill_name, proficiency_level FROM user_skills WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Gap analysis for `user_id`. A failed lookup yields no gaps.
pub async fn gaps_for_user(
    pool: &PgPool,
    user_id: &str,
    recommendations: &[SkillRecommendation],
) -> Vec<SkillGap> {
    match load_user_skills(pool, user_id).await {
        Ok(user_skills) => analyze_gaps(recommendations, &user_skills),
        Err(e) => {
            warn!(user_id, "User skill lookup failed, skipping gap analysis: {e}");
            Vec::new()
        }
    }
}
