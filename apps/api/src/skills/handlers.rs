//! Axum route handlers for the Skills API.

use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::{ExerciseRow, QuestionRow, SkillCardRow};
use crate::skills::queries::{self, CompletionOutcome};
use crate::skills::TrainingItem;
use crate::state::AppState;

async fn require_skill(pool: &PgPool, name: &str) -> Result<SkillCardRow, AppError> {
    queries::find_skill_card(pool, name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Skill '{name}' not found")))
}

/// GET /skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Result<Json<Vec<SkillCardRow>>, AppError> {
    Ok(Json(queries::list_skill_cards(&state.db).await?))
}

/// A known skill never answers with an empty question list.
fn questions_or_placeholder(
    questions: Vec<QuestionRow>,
    card: &SkillCardRow,
) -> Vec<QuestionRow> {
    if questions.is_empty() {
        return vec![QuestionRow::placeholder(card)];
    }
    questions.into_iter().map(|q| q.with_skill(card)).collect()
}

/// GET /skills/:name/questions
pub async fn handle_skill_questions(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<QuestionRow>>, AppError> {
    let card = require_skill(&state.db, &name).await?;
    let questions = queries::questions_for_skill(&state.db, &card.name).await?;
    Ok(Json(questions_or_placeholder(questions, &card)))
}

/// GET /skills/:name/exercises
pub async fn handle_skill_exercises(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ExerciseRow>>, AppError> {
    let card = require_skill(&state.db, &name).await?;
    let exercises = queries::exercises_for_skill(&state.db, &card.name).await?;
    Ok(Json(exercises.into_iter().map(|e| e.with_skill(&card)).collect()))
}

/// POST /skills/:name/questions/:id/complete
pub async fn handle_complete_question(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<SkillCardRow>, AppError> {
    complete(&state.db, TrainingItem::Question, &name, &id).await
}

/// POST /skills/:name/exercises/:id/complete
pub async fn handle_complete_exercise(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<SkillCardRow>, AppError> {
    complete(&state.db, TrainingItem::Exercise, &name, &id).await
}

async fn complete(
    pool: &PgPool,
    item: TrainingItem,
    name: &str,
    raw_id: &str,
) -> Result<Json<SkillCardRow>, AppError> {
    let item_id = Uuid::parse_str(raw_id).map_err(|_| {
        AppError::Validation(format!("Invalid {} id: {raw_id}", item.label().to_lowercase()))
    })?;

    match queries::complete_item(pool, item, name, item_id).await? {
        CompletionOutcome::SkillNotFound => {
            Err(AppError::NotFound(format!("Skill '{name}' not found")))
        }
        CompletionOutcome::ItemNotFound => Err(AppError::NotFound(format!(
            "{} {item_id} not found for skill '{name}'",
            item.label()
        ))),
        CompletionOutcome::Completed(card) => {
            info!(skill = %card.name, item = item.label(), %item_id, "Training item completed");
            Ok(Json(card))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str) -> SkillCardRow {
        SkillCardRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "Backend".to_string(),
            skill_type: "technical".to_string(),
            questions_completed: 0,
            questions_total: 0,
            exercises_completed: 0,
            exercises_total: 0,
        }
    }

    #[test]
    fn test_empty_skill_gets_placeholder_question() {
        let questions = questions_or_placeholder(Vec::new(), &card("Node.js"));
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].category, "Node.js");
        assert_eq!(
            questions[0].text,
            "What are the key concepts in this skill area?"
        );
    }

    #[test]
    fn test_stored_questions_are_kept() {
        let card = card("Python");
        let mut stored = QuestionRow::placeholder(&card);
        stored.text = "Explain the GIL.".to_string();
        stored.skills.clear();

        let questions = questions_or_placeholder(vec![stored], &card);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Explain the GIL.");
        assert_eq!(questions[0].skills[0].name, "Python");
    }
}
