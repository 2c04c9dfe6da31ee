//! Job-analysis orchestration: cache, provider, enrichment, persistence.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use super::cache::{self, CacheEntry, CachedAnalysis};
use super::enrich::{enrich_analysis, enrich_skills, map_difficulty};
use super::gaps::{gaps_for_user, readiness_score};
use super::hashing::hash_job_description;
use super::history::{self, HistoryEntry};
use super::matching::match_skills;
use super::recommendations::build_recommendations;
use super::types::{
    AnalysisMetadata, AnalysisStatus, BulkItemResult, BulkJobAnalysisRequest,
    BulkJobAnalysisResponse, ExtractSkillsResponse, JobAnalysisRequest, JobAnalysisResponse,
    JobAnalysisResult, SkillGap,
};
use crate::errors::AppError;
use crate::llm_client::JobAnalysis;
use crate::skills::queries::skill_names;
use crate::state::AppState;

pub const MIN_DESCRIPTION_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 20_000;
pub const MAX_BULK_JOBS: usize = 20;
const BULK_CONCURRENCY: usize = 5;

/// Returns the trimmed description or a validation error.
pub fn validate_description(job_description: &str) -> Result<&str, AppError> {
    let trimmed = job_description.trim();
    let len = trimmed.chars().count();
    if len < MIN_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "job_description must be at least {MIN_DESCRIPTION_CHARS} characters (got {len})"
        )));
    }
    if len > MAX_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "job_description must be at most {MAX_DESCRIPTION_CHARS} characters (got {len})"
        )));
    }
    Ok(trimmed)
}

pub fn validate_bulk(request: &BulkJobAnalysisRequest) -> Result<(), AppError> {
    let n = request.job_descriptions.len();
    if n == 0 || n > MAX_BULK_JOBS {
        return Err(AppError::Validation(format!(
            "job_descriptions must contain between 1 and {MAX_BULK_JOBS} entries (got {n})"
        )));
    }
    Ok(())
}

/// Builds the user-independent result from raw provider output.
///
/// `known_skills` is `None` when the skill catalogue could not be read.
pub fn build_result(
    analysis: &JobAnalysis,
    request: &JobAnalysisRequest,
    llm_provider: &str,
    known_skills: Option<&[String]>,
) -> JobAnalysisResult {
    let skills = enrich_analysis(analysis);
    let matches = match_skills(&skills, known_skills);
    let matches_found = matches.iter().filter(|m| !m.is_new_skill).count();
    let metadata = AnalysisMetadata {
        llm_provider: llm_provider.to_string(),
        analysis_depth: request.analysis_depth,
        skills_count: skills.len(),
        matches_found,
        new_skills: matches.len() - matches_found,
    };

    JobAnalysisResult {
        job_title: analysis.job_title.clone().or_else(|| request.job_title.clone()),
        company_name: request.company_name.clone(),
        industry: analysis.industry.clone(),
        key_requirements: analysis.key_requirements.clone(),
        skill_recommendations: build_recommendations(skills, matches),
        experience_level: analysis.experience_level.clone(),
        difficulty_assessment: map_difficulty(&analysis.difficulty_assessment),
        role_summary: analysis.summary.clone(),
        compensation_insights: analysis.compensation_insights.clone(),
        analysis_metadata: metadata,
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

async fn record(state: &AppState, entry: HistoryEntry<'_>, result: Option<&JobAnalysisResult>) {
    let recommendations = result.map(|r| r.skill_recommendations.as_slice()).unwrap_or(&[]);
    if let Err(e) = history::record_analysis(&state.db, &entry, recommendations).await {
        warn!(analysis_id = %entry.analysis_id, "Failed to record analysis history: {e}");
    }
}

/// A user-independent result and where it came from.
struct Sourced {
    result: JobAnalysisResult,
    status: AnalysisStatus,
    llm_provider: String,
    tokens_used: Option<u32>,
}

impl Sourced {
    /// Cached results carry the provider that produced them and no token cost.
    fn from_cache(hit: CachedAnalysis) -> Self {
        Self {
            result: hit.result,
            status: AnalysisStatus::Cached,
            llm_provider: hit.llm_provider,
            tokens_used: None,
        }
    }

    fn fresh(result: JobAnalysisResult, llm_provider: &str, tokens_used: u32) -> Self {
        Self {
            result,
            status: AnalysisStatus::Completed,
            llm_provider: llm_provider.to_string(),
            tokens_used: Some(tokens_used),
        }
    }
}

fn assemble_response(
    sourced: Sourced,
    analysis_id: Uuid,
    processing_time_ms: f64,
    skill_gaps: Vec<SkillGap>,
    readiness_score: Option<f64>,
) -> JobAnalysisResponse {
    JobAnalysisResponse {
        success: true,
        status: sourced.status,
        cache_hit: sourced.status == AnalysisStatus::Cached,
        result: sourced.result,
        analysis_id,
        processing_time_ms,
        llm_provider: sourced.llm_provider,
        tokens_used: sourced.tokens_used,
        skill_gaps,
        readiness_score,
    }
}

/// Full analysis of one job description.
pub async fn analyze_job(
    state: &AppState,
    request: &JobAnalysisRequest,
) -> Result<JobAnalysisResponse, AppError> {
    let start = Instant::now();
    let description = validate_description(&request.job_description)?;
    let analysis_id = Uuid::new_v4();
    let hash = hash_job_description(description);

    let sourced = match cache::lookup(&state.db, &hash).await {
        Some(hit) => Sourced::from_cache(hit),
        None => {
            let provider = state.llm.name();
            let output = match state
                .llm
                .analyze_job(description, request.company_context.as_deref())
                .await
            {
                Ok(output) => output,
                Err(e) => {
                    let message = e.to_string();
                    warn!(%analysis_id, provider, "Job analysis failed: {message}");
                    record(
                        state,
                        HistoryEntry {
                            analysis_id,
                            hash: &hash,
                            status: AnalysisStatus::Failed,
                            cache_hit: false,
                            llm_provider: Some(provider),
                            tokens_used: None,
                            processing_time_ms: elapsed_ms(start),
                            error_message: Some(&message),
                        },
                        None,
                    )
                    .await;
                    return Err(e.into());
                }
            };

            let known = match skill_names(&state.db).await {
                Ok(names) => Some(names),
                Err(e) => {
                    warn!("Skill catalogue unavailable, treating all skills as new: {e}");
                    None
                }
            };

            let result = build_result(&output.data, request, provider, known.as_deref());

            let request_json = serde_json::to_value(request).unwrap_or_default();
            cache::store(
                &state.db,
                CacheEntry {
                    hash: &hash,
                    request: &request_json,
                    result: &result,
                    llm_provider: provider,
                    tokens_used: output.tokens_used,
                    ttl_hours: state.config.analysis_cache_ttl_hours,
                },
            )
            .await;

            Sourced::fresh(result, provider, output.tokens_used)
        }
    };

    let (skill_gaps, readiness) = match request.user_id.as_deref() {
        Some(user_id) => {
            let gaps =
                gaps_for_user(&state.db, user_id, &sourced.result.skill_recommendations).await;
            let readiness = readiness_score(&gaps);
            (gaps, Some(readiness))
        }
        None => (Vec::new(), None),
    };

    let response = assemble_response(
        sourced,
        analysis_id,
        elapsed_ms(start),
        skill_gaps,
        readiness,
    );

    record(
        state,
        HistoryEntry {
            analysis_id,
            hash: &hash,
            status: response.status,
            cache_hit: response.cache_hit,
            llm_provider: Some(&response.llm_provider),
            tokens_used: response.tokens_used,
            processing_time_ms: response.processing_time_ms,
            error_message: None,
        },
        Some(&response.result),
    )
    .await;

    info!(
        %analysis_id,
        hash = %hash,
        cache_hit = response.cache_hit,
        llm_provider = %response.llm_provider,
        skills = response.result.skill_recommendations.len(),
        processing_time_ms = response.processing_time_ms,
        "Job analysis completed"
    );

    Ok(response)
}

pub async fn extract_skills(
    state: &AppState,
    text: &str,
    context_type: &str,
) -> Result<ExtractSkillsResponse, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let output = state.llm.extract_skills(text, context_type).await?;
    Ok(ExtractSkillsResponse {
        skills: enrich_skills(&output.data),
        llm_provider: state.llm.name().to_string(),
        tokens_used: output.tokens_used,
    })
}

async fn bulk_item(
    state: &AppState,
    index: usize,
    request: &JobAnalysisRequest,
) -> BulkItemResult {
    match analyze_job(state, request).await {
        Ok(analysis) => BulkItemResult {
            index,
            success: true,
            status: analysis.status,
            analysis: Some(analysis),
            error_message: None,
        },
        Err(e) => BulkItemResult {
            index,
            success: false,
            status: AnalysisStatus::Failed,
            analysis: None,
            error_message: Some(e.to_string()),
        },
    }
}

/// Analyzes each description independently, at most five at a time.
/// Results keep input order.
pub async fn bulk_analyze(
    state: &AppState,
    request: BulkJobAnalysisRequest,
) -> Result<BulkJobAnalysisResponse, AppError> {
    validate_bulk(&request)?;
    let start = Instant::now();
    let batch_id = request
        .batch_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let total_jobs = request.job_descriptions.len();

    let requests: Vec<JobAnalysisRequest> = request
        .job_descriptions
        .into_iter()
        .enumerate()
        .map(|(i, job_description)| JobAnalysisRequest {
            job_description,
            job_title: Some(format!("Job {}", i + 1)),
            company_name: None,
            company_context: None,
            user_id: request.user_id.clone(),
            analysis_depth: request.analysis_depth,
        })
        .collect();

    let results: Vec<BulkItemResult> = stream::iter(requests.into_iter().enumerate())
        .map(|(index, req)| {
            let state = state.clone();
            async move { bulk_item(&state, index, &req).await }
        })
        .buffered(BULK_CONCURRENCY)
        .collect()
        .await;

    let successful_analyses = results.iter().filter(|r| r.success).count();
    let total_tokens: u64 = results
        .iter()
        .filter_map(|r| r.analysis.as_ref()?.tokens_used)
        .map(u64::from)
        .sum();

    info!(
        batch_id = %batch_id,
        total_jobs,
        successful_analyses,
        "Bulk job analysis finished"
    );

    Ok(BulkJobAnalysisResponse {
        success: successful_analyses > 0,
        batch_id,
        total_jobs,
        successful_analyses,
        failed_analyses: total_jobs - successful_analyses,
        results,
        processing_time_ms: elapsed_ms(start),
        total_tokens_used: (total_tokens > 0).then_some(total_tokens),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{AnalysisDepth, DifficultyLevel, MatchType, SkillImportance};
    use crate::llm_client::{LlmProvider, MockProvider};
    use std::time::Duration;

    const BACKEND_JD: &str = "Senior Backend Engineer\n\
        Design and operate REST APIs and microservices for our fintech platform. \
        You will own PostgreSQL schemas, deploy on AWS with Docker, and mentor engineers.";

    fn request(description: &str) -> JobAnalysisRequest {
        JobAnalysisRequest {
            job_description: description.to_string(),
            job_title: Some("Fallback Title".into()),
            company_name: Some("Acme".into()),
            company_context: None,
            user_id: None,
            analysis_depth: AnalysisDepth::Comprehensive,
        }
    }

    fn catalogue() -> Vec<String> {
        ["JavaScript", "React", "Node.js", "Problem Solving", "Communication"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_validate_description_bounds() {
        assert!(validate_description("too short").is_err());
        assert!(validate_description(&"x".repeat(MIN_DESCRIPTION_CHARS)).is_ok());
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_CHARS + 1)).is_err());
        // whitespace does not count
        let padded = format!("   {}   ", "x".repeat(MIN_DESCRIPTION_CHARS - 1));
        assert!(validate_description(&padded).is_err());
    }

    #[test]
    fn test_validate_bulk_bounds() {
        let mut bulk = BulkJobAnalysisRequest {
            job_descriptions: vec![],
            user_id: None,
            analysis_depth: AnalysisDepth::Quick,
            batch_id: None,
        };
        assert!(validate_bulk(&bulk).is_err());
        bulk.job_descriptions = vec![BACKEND_JD.to_string(); MAX_BULK_JOBS];
        assert!(validate_bulk(&bulk).is_ok());
        bulk.job_descriptions.push(BACKEND_JD.to_string());
        assert!(validate_bulk(&bulk).is_err());
    }

    #[tokio::test]
    async fn test_build_result_from_mock_analysis() {
        let provider = MockProvider::new(Duration::ZERO);
        let output = provider.analyze_job(BACKEND_JD, None).await.unwrap();
        let known = catalogue();

        let result = build_result(
            &output.data,
            &request(BACKEND_JD),
            "mock",
            Some(known.as_slice()),
        );

        assert_eq!(result.job_title.as_deref(), Some("Senior Backend Developer"));
        assert_eq!(result.company_name.as_deref(), Some("Acme"));
        assert_eq!(result.difficulty_assessment, DifficultyLevel::Advanced);
        assert_eq!(result.analysis_metadata.analysis_depth, AnalysisDepth::Comprehensive);
        assert!(!result.skill_recommendations.is_empty());
        assert!(result.skill_recommendations.len() <= 10);
        assert_eq!(
            result.skill_recommendations[0].importance,
            SkillImportance::Critical
        );

        let problem_solving = result
            .skill_recommendations
            .iter()
            .find(|r| r.name == "Problem Solving")
            .unwrap();
        assert_eq!(problem_solving.skill_match.match_type, MatchType::Exact);
        assert!(result.analysis_metadata.matches_found >= 1);
        assert_eq!(
            result.analysis_metadata.matches_found + result.analysis_metadata.new_skills,
            result.analysis_metadata.skills_count
        );
    }

    #[tokio::test]
    async fn test_build_result_without_catalogue() {
        let provider = MockProvider::new(Duration::ZERO);
        let output = provider.analyze_job(BACKEND_JD, None).await.unwrap();

        let result = build_result(&output.data, &request(BACKEND_JD), "mock", None);

        assert_eq!(result.analysis_metadata.matches_found, 0);
        assert!(result
            .skill_recommendations
            .iter()
            .all(|r| r.skill_match.match_type == MatchType::NoDatabase));
    }

    #[test]
    fn test_result_survives_cache_round_trip() {
        let analysis = JobAnalysis {
            job_title: None,
            key_requirements: vec!["Ship things".into()],
            technical_skills: vec![],
            soft_skills: vec![],
            experience_level: "mid".into(),
            industry: "technology".into(),
            summary: "Role".into(),
            difficulty_assessment: "medium".into(),
            compensation_insights: None,
        };
        let result = build_result(&analysis, &request(BACKEND_JD), "mock", Some(&[][..]));
        assert_eq!(result.job_title.as_deref(), Some("Fallback Title"));

        let stored = serde_json::to_value(&result).unwrap();
        let restored: JobAnalysisResult = serde_json::from_value(stored).unwrap();
        assert_eq!(restored, result);
    }

    fn sample_result() -> JobAnalysisResult {
        let analysis = JobAnalysis {
            job_title: Some("Data Engineer".into()),
            key_requirements: vec![],
            technical_skills: vec![],
            soft_skills: vec![],
            experience_level: "senior".into(),
            industry: "technology".into(),
            summary: "Pipelines".into(),
            difficulty_assessment: "high".into(),
            compensation_insights: None,
        };
        build_result(&analysis, &request(BACKEND_JD), "anthropic", Some(&[][..]))
    }

    #[test]
    fn test_cache_hit_response_has_no_token_cost() {
        let hit = CachedAnalysis {
            result: sample_result(),
            llm_provider: "anthropic".into(),
            hit_count: 3,
        };
        let analysis_id = Uuid::new_v4();

        let response = assemble_response(
            Sourced::from_cache(hit),
            analysis_id,
            1.5,
            Vec::new(),
            None,
        );

        assert!(response.success);
        assert!(response.cache_hit);
        assert_eq!(response.status, AnalysisStatus::Cached);
        assert_eq!(response.tokens_used, None);
        assert_eq!(response.llm_provider, "anthropic");
        assert_eq!(response.analysis_id, analysis_id);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "cached");
        assert_eq!(json["cache_hit"], true);
        assert!(json["tokens_used"].is_null());
        assert!(json["readiness_score"].is_null());
    }

    #[test]
    fn test_fresh_response_reports_tokens() {
        let response = assemble_response(
            Sourced::fresh(sample_result(), "mock", 420),
            Uuid::new_v4(),
            12.0,
            Vec::new(),
            Some(0.8),
        );

        assert!(!response.cache_hit);
        assert_eq!(response.status, AnalysisStatus::Completed);
        assert_eq!(response.tokens_used, Some(420));
        assert_eq!(response.llm_provider, "mock");
        assert_eq!(response.readiness_score, Some(0.8));
    }
}
