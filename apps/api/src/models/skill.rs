use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SkillCardRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub skill_type: String,
    pub questions_completed: i32,
    pub questions_total: i32,
    pub exercises_completed: i32,
    pub exercises_total: i32,
}

/// Skill reference embedded in question and exercise payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRef {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub skill_type: String,
    /// Level the linked item trains for.
    pub proficiency: String,
    pub years_of_experience: Option<i32>,
}

impl SkillCardRow {
    pub fn skill_ref(&self, proficiency: &str) -> SkillRef {
        SkillRef {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            skill_type: self.skill_type.clone(),
            proficiency: proficiency.to_string(),
            years_of_experience: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub id: Uuid,
    #[serde(skip)]
    pub skill_name: String,
    #[sqlx(skip)]
    pub skills: Vec<SkillRef>,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub difficulty: String,
    pub category: String,
    pub sample_answer: Option<String>,
    pub tips: Vec<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRow {
    pub id: Uuid,
    #[serde(skip)]
    pub skill_name: String,
    #[sqlx(skip)]
    pub skills: Vec<SkillRef>,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub programming_language: Option<String>,
    pub requirements: Vec<String>,
    #[serde(rename = "code")]
    pub starter_code: Option<String>,
    pub hints: Vec<String>,
    #[serde(rename = "timeLimit")]
    pub time_limit_minutes: Option<i32>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl QuestionRow {
    /// Links the row to `card` when it belongs to it.
    pub fn with_skill(mut self, card: &SkillCardRow) -> Self {
        if self.skill_name.eq_ignore_ascii_case(&card.name) {
            self.skills = vec![card.skill_ref(&self.difficulty)];
        }
        self
    }

    /// Generic prompt served for a skill with no stored questions.
    pub fn placeholder(card: &SkillCardRow) -> Self {
        QuestionRow {
            id: Uuid::nil(),
            skill_name: card.name.clone(),
            skills: Vec::new(),
            text: "What are the key concepts in this skill area?".to_string(),
            question_type: "theoretical".to_string(),
            difficulty: "intermediate".to_string(),
            category: card.name.clone(),
            sample_answer: None,
            tips: Vec::new(),
            is_completed: false,
            created_at: DateTime::<Utc>::from_timestamp(PLACEHOLDER_CREATED_AT, 0)
                .unwrap_or_default(),
        }
        .with_skill(card)
    }
}

impl ExerciseRow {
    /// Links the row to `card` when it belongs to it.
    pub fn with_skill(mut self, card: &SkillCardRow) -> Self {
        if self.skill_name.eq_ignore_ascii_case(&card.name) {
            self.skills = vec![card.skill_ref(&self.difficulty)];
        }
        self
    }
}

// 2024-01-15T00:00:00Z
const PLACEHOLDER_CREATED_AT: i64 = 1_705_276_800;
