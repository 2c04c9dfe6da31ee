use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::{JobRow, NewJob};

const JOB_COLUMNS: &str = "id, title, company, description, requirements, skills, tech_stack, \
    location, type, level, salary_range, is_remote, progress, created_at, updated_at";

pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_job(pool: &PgPool, job: &NewJob) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(&format!(
        r#"
        INSERT INTO jobs
            (title, company, description, requirements, skills, tech_stack,
             location, type, level, salary_range, is_remote, progress)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {JOB_COLUMNS}
        "#
    ))
    .bind(job.title.trim())
    .bind(job.company.trim())
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.skills)
    .bind(&job.tech_stack)
    .bind(&job.location)
    .bind(&job.job_type)
    .bind(&job.level)
    .bind(&job.salary_range)
    .bind(job.is_remote)
    .bind(job.progress)
    .fetch_one(pool)
    .await
}

/// Returns `None` when no job has the given id.
pub async fn update_progress(
    pool: &PgPool,
    id: Uuid,
    progress: i32,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(&format!(
        "UPDATE jobs SET progress = $2, updated_at = NOW() WHERE id = $1 RETURNING {JOB_COLUMNS}"
    ))
    .bind(id)
    .bind(progress)
    .fetch_optional(pool)
    .await
}
