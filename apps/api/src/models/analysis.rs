use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingRecommendationRow {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub position: i32,
    pub skill_name: String,
    pub skill_category: String,
    pub priority: String,
    pub difficulty_level: String,
    pub estimated_duration: Option<String>,
    pub recommended_actions: Vec<String>,
    pub prerequisite_skills: Vec<String>,
    pub learning_resources: Vec<String>,
    pub success_metrics: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserSkillRow {
    pub skill_name: String,
    pub proficiency_level: String,
}
