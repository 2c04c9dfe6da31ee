//! Aggregate statistics over the analysis history.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

const TOP_SKILLS: i64 = 10;

#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct AnalysisTotals {
    pub total_analyses: i64,
    pub successful_analyses: i64,
    pub failed_analyses: i64,
    pub cache_hits: i64,
    pub avg_processing_time_ms: Option<f64>,
    pub total_tokens_used: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SkillCount {
    pub skill: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetrics {
    #[serde(flatten)]
    pub totals: AnalysisTotals,
    pub cache_hit_rate: f64,
    pub most_analyzed_skills: Vec<SkillCount>,
}

/// Fraction of successful analyses served from the cache.
pub fn cache_hit_rate(totals: &AnalysisTotals) -> f64 {
    if totals.successful_analyses == 0 {
        return 0.0;
    }
    totals.cache_hits as f64 / totals.successful_analyses as f64
}

pub async fn collect(pool: &PgPool) -> Result<AnalysisMetrics, sqlx::Error> {
    let totals = sqlx::query_as::<_, AnalysisTotals>(
        r#"
        SELECT
            COUNT(*) AS total_analyses,
            COUNT(*) FILTER (WHERE status <> 'failed') AS successful_analyses,
            COUNT(*) FILTER (WHERE status = 'failed') AS failed_analyses,
            COUNT(*) FILTER (WHERE cache_hit) AS cache_hits,
            AVG(processing_time_ms) AS avg_processing_time_ms,
            COALESCE(SUM(tokens_used), 0)::BIGINT AS total_tokens_used
        FROM job_analysis_history
        "#,
    )
    .fetch_one(pool)
    .await?;

    let most_analyzed_skills = sqlx::query_as::<_, SkillCount>(
        r#"
        SELECT skill_name AS skill, COUNT(*) AS count
        FROM job_analysis_cache_skills
        GROUP BY skill_name
        ORDER BY count DESC, skill_name
        LIMIT $1
        "#,
    )
    .bind(TOP_SKILLS)
    .fetch_all(pool)
    .await?;

    Ok(AnalysisMetrics {
        cache_hit_rate: cache_hit_rate(&totals),
        totals,
        most_analyzed_skills,
    })
}
