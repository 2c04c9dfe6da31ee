pub mod handlers;
pub mod queries;

use crate::models::skill::SkillCardRow;

/// Which per-skill training item a completion event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingItem {
    Question,
    Exercise,
}

impl TrainingItem {
    pub fn table(self) -> &'static str {
        match self {
            TrainingItem::Question => "questions",
            TrainingItem::Exercise => "exercises",
        }
    }

    pub fn completed_column(self) -> &'static str {
        match self {
            TrainingItem::Question => "questions_completed",
            TrainingItem::Exercise => "exercises_completed",
        }
    }

    /// Card counter after a completion event. Only an item that just
    /// flipped to completed moves it, and never past the total.
    pub fn completion_count(self, card: &SkillCardRow, newly_completed: bool) -> i32 {
        let (completed, total) = match self {
            TrainingItem::Question => (card.questions_completed, card.questions_total),
            TrainingItem::Exercise => (card.exercises_completed, card.exercises_total),
        };
        if newly_completed {
            completed.saturating_add(1).min(total)
        } else {
            completed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrainingItem::Question => "Question",
            TrainingItem::Exercise => "Exercise",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_pair_up() {
        for item in [TrainingItem::Question, TrainingItem::Exercise] {
            let prefix = item.table();
            assert!(item.completed_column().starts_with(prefix));
        }
    }

    fn card(questions: (i32, i32), exercises: (i32, i32)) -> SkillCardRow {
        SkillCardRow {
            id: uuid::Uuid::new_v4(),
            name: "Python".into(),
            category: "Backend".into(),
            skill_type: "technical".into(),
            questions_completed: questions.0,
            questions_total: questions.1,
            exercises_completed: exercises.0,
            exercises_total: exercises.1,
        }
    }

    #[test]
    fn test_completion_bumps_matching_counter() {
        let card = card((2, 5), (0, 3));
        assert_eq!(TrainingItem::Question.completion_count(&card, true), 3);
        assert_eq!(TrainingItem::Exercise.completion_count(&card, true), 1);
    }

    #[test]
    fn test_repeat_completion_leaves_counter() {
        let card = card((2, 5), (1, 3));
        assert_eq!(TrainingItem::Question.completion_count(&card, false), 2);
        assert_eq!(TrainingItem::Exercise.completion_count(&card, false), 1);
    }

    #[test]
    fn test_completion_capped_at_total() {
        let card = card((5, 5), (3, 3));
        assert_eq!(TrainingItem::Question.completion_count(&card, true), 5);
        assert_eq!(TrainingItem::Exercise.completion_count(&card, true), 3);
    }
}
