//! Postgres-backed cache of analysis results keyed by description hash.
//!
//! Failures here are logged and swallowed: a broken cache degrades to a miss
//! or a skipped write, never to a failed analysis.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};

use super::types::JobAnalysisResult;

#[derive(Debug, FromRow)]
struct CacheHitRow {
    analysis_result: Value,
    llm_provider: String,
    hit_count: i32,
}

#[derive(Debug, Clone)]
pub struct CachedAnalysis {
    pub result: JobAnalysisResult,
    pub llm_provider: String,
    pub hit_count: i32,
}

/// Everything needed to write one cache row.
pub struct CacheEntry<'a> {
    pub hash: &'a str,
    pub request: &'a Value,
    pub result: &'a JobAnalysisResult,
    pub llm_provider: &'a str,
    pub tokens_used: u32,
    pub ttl_hours: i64,
}

async fn try_lookup(pool: &PgPool, hash: &str) -> Result<Option<CachedAnalysis>> {
    // Counting the hit and reading the row happen in one statement.
    let row = sqlx::query_as::<_, CacheHitRow>(
        r#"
        UPDATE job_analysis_cache
        SET hit_count = hit_count + 1, last_accessed = NOW()
        WHERE job_description_hash = $1 AND expires_at > NOW()
        RETURNING analysis_result, llm_provider, hit_count
        "#,
    )
    .bind(hash)
    .fetch_optional(pool)
    .await
    .context("cache lookup query failed")?;

    let Some(row) = row else {
        return Ok(None);
    };

    let result: JobAnalysisResult = serde_json::from_value(row.analysis_result)
        .context("cached analysis has an unexpected shape")?;

    Ok(Some(CachedAnalysis {
        result,
        llm_provider: row.llm_provider,
        hit_count: row.hit_count,
    }))
}

/// Returns the unexpired result for `hash`, bumping its hit counter.
pub async fn lookup(pool: &PgPool, hash: &str) -> Option<CachedAnalysis> {
    match try_lookup(pool, hash).await {
        Ok(Some(hit)) => {
            debug!(hash, hit_count = hit.hit_count, "Analysis cache hit");
            Some(hit)
        }
        Ok(None) => {
            debug!(hash, "Analysis cache miss");
            None
        }
        Err(e) => {
            warn!(hash, "Analysis cache read failed, treating as miss: {e:#}");
            None
        }
    }
}

fn expiry(now: DateTime<Utc>, ttl_hours: i64) -> Option<DateTime<Utc>> {
    now.checked_add_signed(Duration::try_hours(ttl_hours)?)
}

async fn try_store(pool: &PgPool, entry: &CacheEntry<'_>) -> Result<()> {
    let expires_at = expiry(Utc::now(), entry.ttl_hours)
        .with_context(|| format!("cache TTL of {} hours is out of range", entry.ttl_hours))?;
    let result = serde_json::to_value(entry.result).context("serialize analysis result")?;
    let tokens_used = i32::try_from(entry.tokens_used).unwrap_or(i32::MAX);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO job_analysis_cache
            (job_description_hash, analysis_request, analysis_result,
             llm_provider, tokens_used, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (job_description_hash) DO UPDATE SET
            analysis_request = EXCLUDED.analysis_request,
            analysis_result = EXCLUDED.analysis_result,
            llm_provider = EXCLUDED.llm_provider,
            tokens_used = EXCLUDED.tokens_used,
            expires_at = EXCLUDED.expires_at,
            updated_at = NOW()
        "#,
    )
    .bind(entry.hash)
    .bind(entry.request)
    .bind(&result)
    .bind(entry.llm_provider)
    .bind(tokens_used)
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;

    for rec in &entry.result.skill_recommendations {
        sqlx::query(
            r#"
            INSERT INTO job_analysis_cache_skills (job_description_hash, skill_name)
            VALUES ($1, $2)
            ON CONFLICT (job_description_hash, skill_name) DO NOTHING
            "#,
        )
        .bind(entry.hash)
        .bind(&rec.name)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Upserts the cache row for `entry.hash`. Errors are logged only.
pub async fn store(pool: &PgPool, entry: CacheEntry<'_>) {
    match try_store(pool, &entry).await {
        Ok(()) => debug!(hash = entry.hash, ttl_hours = entry.ttl_hours, "Analysis cached"),
        Err(e) => warn!(hash = entry.hash, "Analysis cache write failed: {e:#}"),
    }
}

// Skill rows of an expired entry go in the same statement.
const PURGE_EXPIRED: &str = r#"
    WITH expired AS (
        DELETE FROM job_analysis_cache
        WHERE expires_at <= NOW()
        RETURNING job_description_hash
    ), expired_skills AS (
        DELETE FROM job_analysis_cache_skills s
        USING expired e
        WHERE s.job_description_hash = e.job_description_hash
    )
    SELECT COUNT(*) FROM expired
"#;

/// Deletes expired cache rows and their skill rows, returning how many
/// cache rows went away.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let purged: i64 = sqlx::query_scalar(PURGE_EXPIRED).fetch_one(pool).await?;
    Ok(u64::try_from(purged).unwrap_or_default())
}
