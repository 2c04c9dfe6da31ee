use serde::Serialize;
use sqlx::FromRow;

use super::job::JobRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_jobs: i64,
    pub questions_completed: i64,
    pub avg_progress: i64,
    pub success_rate: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillDistribution {
    pub name: String,
    pub value: i64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PerformanceRow {
    pub difficulty: String,
    pub success: i32,
    pub failure: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub jobs: Vec<JobRow>,
    pub skill_distribution_data: Vec<SkillDistribution>,
    pub performance_data: Vec<PerformanceRow>,
}
