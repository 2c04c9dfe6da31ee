//! Domain types shared across the job-analysis pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Programming,
    Framework,
    Database,
    Devops,
    SoftSkill,
    SystemDesign,
    Algorithms,
    Testing,
    Architecture,
    Tools,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillImportance {
    Critical,
    Important,
    Preferred,
    NiceToHave,
}

impl SkillImportance {
    /// Sort key, most important first.
    pub fn rank(self) -> u8 {
        match self {
            SkillImportance::Critical => 1,
            SkillImportance::Important => 2,
            SkillImportance::Preferred => 3,
            SkillImportance::NiceToHave => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPriority {
    High,
    Medium,
    Low,
}

impl TrainingPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TrainingPriority::High => "high",
            TrainingPriority::Medium => "medium",
            TrainingPriority::Low => "low",
        }
    }

    /// Weight used when averaging per-skill readiness.
    pub fn weight(self) -> f64 {
        match self {
            TrainingPriority::High => 1.0,
            TrainingPriority::Medium => 0.7,
            TrainingPriority::Low => 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Completed,
    Cached,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Cached => "cached",
            AnalysisStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    Quick,
    #[default]
    Standard,
    Comprehensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Synonym,
    Partial,
    New,
    NoDatabase,
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// A provider skill after normalization and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSkill {
    pub name: String,
    pub category: String,
    pub skill_type: SkillType,
    pub importance: SkillImportance,
    pub years_required: Option<u32>,
    pub context: Option<String>,
    pub confidence_score: f64,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub related_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched_skill_name: Option<String>,
    pub match_confidence: f64,
    pub match_type: MatchType,
    pub is_new_skill: bool,
}

/// One extracted skill merged with its training plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecommendation {
    pub name: String,
    pub category: String,
    pub skill_type: SkillType,
    pub importance: SkillImportance,
    pub priority: TrainingPriority,
    pub years_required: Option<u32>,
    pub context: Option<String>,
    pub confidence_score: f64,
    pub recommended_actions: Vec<String>,
    pub estimated_duration: Option<String>,
    pub difficulty_level: DifficultyLevel,
    pub prerequisite_skills: Vec<String>,
    pub learning_resources: Vec<String>,
    pub success_metrics: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub related_skills: Vec<String>,
    pub skill_match: SkillMatch,
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub llm_provider: String,
    pub analysis_depth: AnalysisDepth,
    pub skills_count: usize,
    pub matches_found: usize,
    pub new_skills: usize,
}

/// The cacheable, user-independent part of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysisResult {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub industry: String,
    pub key_requirements: Vec<String>,
    pub skill_recommendations: Vec<SkillRecommendation>,
    pub experience_level: String,
    pub difficulty_assessment: DifficultyLevel,
    pub role_summary: String,
    pub compensation_insights: Option<String>,
    pub analysis_metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub skill_name: String,
    pub required_level: String,
    pub current_level: Option<String>,
    pub gap_severity: TrainingPriority,
    /// Hours.
    pub estimated_study_time: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAnalysisRequest {
    pub job_description: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_context: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub analysis_depth: AnalysisDepth,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobAnalysisResponse {
    pub success: bool,
    pub status: AnalysisStatus,
    pub result: JobAnalysisResult,
    pub analysis_id: Uuid,
    pub cache_hit: bool,
    pub processing_time_ms: f64,
    pub llm_provider: String,
    pub tokens_used: Option<u32>,
    pub skill_gaps: Vec<SkillGap>,
    pub readiness_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
    #[serde(default = "default_context_type")]
    pub context_type: String,
}

fn default_context_type() -> String {
    "job_description".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: Vec<EnrichedSkill>,
    pub llm_provider: String,
    pub tokens_used: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkJobAnalysisRequest {
    pub job_descriptions: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub analysis_depth: AnalysisDepth,
    #[serde(default)]
    pub batch_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkItemResult {
    pub index: usize,
    pub success: bool,
    pub status: AnalysisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<JobAnalysisResponse>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkJobAnalysisResponse {
    pub success: bool,
    pub batch_id: String,
    pub total_jobs: usize,
    pub successful_analyses: usize,
    pub failed_analyses: usize,
    pub results: Vec<BulkItemResult>,
    pub processing_time_ms: f64,
    pub total_tokens_used: Option<u64>,
}
