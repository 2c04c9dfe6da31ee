use sqlx::PgPool;
use uuid::Uuid;

use super::TrainingItem;
use crate::models::skill::{ExerciseRow, QuestionRow, SkillCardRow};

const CARD_COLUMNS: &str = "id, name, category, type, questions_completed, questions_total, \
    exercises_completed, exercises_total";

pub async fn list_skill_cards(pool: &PgPool) -> Result<Vec<SkillCardRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillCardRow>(&format!(
        "SELECT {CARD_COLUMNS} FROM skill_cards ORDER BY name"
    ))
    .fetch_all(pool)
    .await
}

/// Case-insensitive lookup by skill name.
pub async fn find_skill_card(
    pool: &PgPool,
    name: &str,
) -> Result<Option<SkillCardRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillCardRow>(&format!(
        "SELECT {CARD_COLUMNS} FROM skill_cards WHERE LOWER(name) = LOWER($1)"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await
}

pub async fn skill_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT name FROM skill_cards ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn questions_for_skill(
    pool: &PgPool,
    skill_name: &str,
) -> Result<Vec<QuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, skill_name, text, question_type, difficulty, category,
               sample_answer, tips, is_completed, created_at
        FROM questions
        WHERE LOWER(skill_name) = LOWER($1)
        ORDER BY created_at, id
        "#,
    )
    .bind(skill_name)
    .fetch_all(pool)
    .await
}

pub async fn exercises_for_skill(
    pool: &PgPool,
    skill_name: &str,
) -> Result<Vec<ExerciseRow>, sqlx::Error> {
    sqlx::query_as::<_, ExerciseRow>(
        r#"
        SELECT id, skill_name, title, description, difficulty, category,
               programming_language, requirements, starter_code, hints,
               time_limit_minutes, is_completed, created_at
        FROM exercises
        WHERE LOWER(skill_name) = LOWER($1)
        ORDER BY created_at, id
        "#,
    )
    .bind(skill_name)
    .fetch_all(pool)
    .await
}

pub enum CompletionOutcome {
    SkillNotFound,
    ItemNotFound,
    Completed(SkillCardRow),
}

/// Marks a question or exercise completed and bumps the card counter.
///
/// Runs in one transaction with the card row locked. The counter moves only
/// when the item flips from incomplete to complete and never exceeds the total.
pub async fn complete_item(
    pool: &PgPool,
    item: TrainingItem,
    skill_name: &str,
    item_id: Uuid,
) -> Result<CompletionOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let card = sqlx::query_as::<_, SkillCardRow>(&format!(
        "SELECT {CARD_COLUMNS} FROM skill_cards WHERE LOWER(name) = LOWER($1) FOR UPDATE"
    ))
    .bind(skill_name)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(card) = card else {
        return Ok(CompletionOutcome::SkillNotFound);
    };

    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND LOWER(skill_name) = LOWER($2))",
        item.table()
    ))
    .bind(item_id)
    .bind(&card.name)
    .fetch_one(&mut *tx)
    .await?;

    if !exists {
        return Ok(CompletionOutcome::ItemNotFound);
    }

    let flipped = sqlx::query(&format!(
        "UPDATE {} SET is_completed = TRUE WHERE id = $1 AND is_completed = FALSE",
        item.table()
    ))
    .bind(item_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let count = item.completion_count(&card, flipped > 0);
    let card = if flipped > 0 {
        sqlx::query_as::<_, SkillCardRow>(&format!(
            "UPDATE skill_cards SET {} = $2 WHERE id = $1 RETURNING {CARD_COLUMNS}",
            item.completed_column()
        ))
        .bind(card.id)
        .bind(count)
        .fetch_one(&mut *tx)
        .await?
    } else {
        card
    };

    tx.commit().await?;
    Ok(CompletionOutcome::Completed(card))
}
