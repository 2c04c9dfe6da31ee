//! Axum route handlers for the Dashboard API.

use axum::{extract::State, Json};
use sqlx::PgPool;

use crate::dashboard::{active_jobs, avg_progress, skill_distribution, success_rate};
use crate::errors::AppError;
use crate::jobs::queries::list_jobs;
use crate::models::dashboard::{DashboardData, DashboardStats, PerformanceRow};
use crate::models::job::JobRow;
use crate::state::AppState;

async fn load_performance(pool: &PgPool) -> Result<Vec<PerformanceRow>, sqlx::Error> {
    sqlx::query_as::<_, PerformanceRow>(
        r#"
        SELECT difficulty, success, failure
        FROM performance_data
        ORDER BY CASE difficulty WHEN 'beginner' THEN 0 WHEN 'intermediate' THEN 1 WHEN 'advanced' THEN 2 ELSE 3 END,
                 difficulty
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Completed questions as tracked on the skill cards.
async fn questions_completed(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COALESCE(SUM(questions_completed), 0)::BIGINT FROM skill_cards")
        .fetch_one(pool)
        .await
}

async fn skill_type_counts(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT type, COUNT(*) FROM skill_cards GROUP BY type ORDER BY COUNT(*) DESC, type",
    )
    .fetch_all(pool)
    .await
}

fn build_stats(jobs: &[JobRow], questions: i64, performance: &[PerformanceRow]) -> DashboardStats {
    DashboardStats {
        active_jobs: active_jobs(jobs),
        questions_completed: questions,
        avg_progress: avg_progress(jobs),
        success_rate: success_rate(performance),
    }
}

/// GET /dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardData>, AppError> {
    let jobs = list_jobs(&state.db).await?;
    let performance = load_performance(&state.db).await?;
    let questions = questions_completed(&state.db).await?;
    let counts = skill_type_counts(&state.db).await?;

    Ok(Json(DashboardData {
        stats: build_stats(&jobs, questions, &performance),
        jobs,
        skill_distribution_data: skill_distribution(&counts),
        performance_data: performance,
    }))
}

/// GET /dashboard/stats
pub async fn handle_dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let jobs = list_jobs(&state.db).await?;
    let performance = load_performance(&state.db).await?;
    let questions = questions_completed(&state.db).await?;
    Ok(Json(build_stats(&jobs, questions, &performance)))
}
