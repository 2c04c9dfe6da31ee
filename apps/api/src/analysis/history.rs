//! Per-analysis audit trail and persisted training recommendations.

use sqlx::PgPool;
use uuid::Uuid;

use super::types::{AnalysisStatus, SkillRecommendation};
use crate::models::analysis::TrainingRecommendationRow;

pub struct HistoryEntry<'a> {
    pub analysis_id: Uuid,
    pub hash: &'a str,
    pub status: AnalysisStatus,
    pub cache_hit: bool,
    pub llm_provider: Option<&'a str>,
    pub tokens_used: Option<u32>,
    pub processing_time_ms: f64,
    pub error_message: Option<&'a str>,
}

/// Writes the history row and its recommendations atomically.
pub async fn record_analysis(
    pool: &PgPool,
    entry: &HistoryEntry<'_>,
    recommendations: &[SkillRecommendation],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO job_analysis_history
            (analysis_id, job_description_hash, status, cache_hit, llm_provider,
             tokens_used, processing_time_ms, error_message)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(entry.analysis_id)
    .bind(entry.hash)
    .bind(entry.status.as_str())
    .bind(entry.cache_hit)
    .bind(entry.llm_provider)
    .bind(entry.tokens_used.map(|t| i32::try_from(t).unwrap_or(i32::MAX)))
    .bind(entry.processing_time_ms)
    .bind(entry.error_message)
    .execute(&mut *tx)
    .await?;

    for (position, rec) in recommendations.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO training_recommendations
                (analysis_id, position, skill_name, skill_category, priority,
                 difficulty_level, estimated_duration, recommended_actions,
                 prerequisite_skills, learning_resources, success_metrics)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(entry.analysis_id)
        .bind(position as i32)
        .bind(&rec.name)
        .bind(&rec.category)
        .bind(rec.priority.as_str())
        .bind(rec.difficulty_level.as_str())
        .bind(&rec.estimated_duration)
        .bind(&rec.recommended_actions)
        .bind(&rec.prerequisite_skills)
        .bind(&rec.learning_resources)
        .bind(&rec.success_metrics)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

pub async fn analysis_exists(pool: &PgPool, analysis_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM job_analysis_history WHERE analysis_id = $1)")
        .bind(analysis_id)
        .fetch_one(pool)
        .await
}

pub async fn recommendations_for(
    pool: &PgPool,
    analysis_id: Uuid,
) -> Result<Vec<TrainingRecommendationRow>, sqlx::Error> {
    sqlx::query_as::<_, TrainingRecommendationRow>(
        r#"
        SELECT id, analysis_id, position, skill_name, skill_category, priority,
               difficulty_level, estimated_duration, recommended_actions,
               prerequisite_skills, learning_resources, success_metrics, created_at
        FROM training_recommendations
        WHERE analysis_id = $1
        ORDER BY position
        "#,
    )
    .bind(analysis_id)
    .fetch_all(pool)
    .await
}
