//! Dashboard aggregation: stats, skill distribution and performance charts.

pub mod handlers;

use crate::models::dashboard::{PerformanceRow, SkillDistribution};
use crate::models::job::JobRow;

/// Chart colour per skill type. Unlisted types fall back to `FALLBACK_COLOR`.
const PALETTE: &[(&str, &str)] = &[
    ("programming", "#f97316"),
    ("framework", "#14b8a6"),
    ("database", "#1e40af"),
    ("devops", "#eab308"),
    ("soft_skill", "#06b6d4"),
    ("system_design", "#8b5cf6"),
    ("algorithms", "#ef4444"),
    ("testing", "#22c55e"),
    ("architecture", "#ec4899"),
    ("tools", "#64748b"),
];

const FALLBACK_COLOR: &str = "#94a3b8";

pub fn color_for(skill_type: &str) -> &'static str {
    PALETTE
        .iter()
        .find(|(t, _)| *t == skill_type)
        .map(|(_, c)| *c)
        .unwrap_or(FALLBACK_COLOR)
}

/// "soft_skill" -> "Soft Skill"
pub fn display_name(skill_type: &str) -> String {
    skill_type
        .split('_')
        .filter(|w| !w.is_empty())
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

/// Jobs still in flight: no progress recorded yet or below 100.
pub fn active_jobs(jobs: &[JobRow]) -> i64 {
    jobs.iter()
        .filter(|j| j.progress.map_or(true, |p| p < 100))
        .count() as i64
}

/// Rounded mean progress, treating missing progress as 0.
pub fn avg_progress(jobs: &[JobRow]) -> i64 {
    if jobs.is_empty() {
        return 0;
    }
    let total: i64 = jobs.iter().map(|j| i64::from(j.progress.unwrap_or(0))).sum();
    (total as f64 / jobs.len() as f64).round() as i64
}

pub fn success_rate(performance: &[PerformanceRow]) -> i64 {
    let success: i64 = performance.iter().map(|p| i64::from(p.success)).sum();
    let failure: i64 = performance.iter().map(|p| i64::from(p.failure)).sum();
    let attempts = success + failure;
    if attempts == 0 {
        return 0;
    }
    (100.0 * success as f64 / attempts as f64).round() as i64
}

/// Converts (skill type, card count) pairs into chart slices.
pub fn skill_distribution(counts: &[(String, i64)]) -> Vec<SkillDistribution> {
    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .map(|(skill_type, n)| SkillDistribution {
            name: display_name(skill_type),
            value: (100.0 * *n as f64 / total as f64).round() as i64,
            color: color_for(skill_type).to_string(),
        })
        .collect()
}
