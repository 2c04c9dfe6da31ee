use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub tech_stack: Vec<String>,
    pub location: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub job_type: String,
    pub level: String,
    pub salary_range: Option<String>,
    pub is_remote: bool,
    pub progress: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /jobs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default = "default_job_type")]
    pub job_type: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub progress: Option<i32>,
}

fn default_job_type() -> String {
    "Full-time".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressUpdate {
    pub progress: i32,
}
