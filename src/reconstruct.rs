// src/reconstruct.rs
//
// Rebuilds the result list of a past attempt from the best surviving
// source. Three tiers, evaluated until one yields a non-empty list:
// stored per-answer rows, the legacy `details` JSON snapshot, and finally
// the quiz's current questions with blank submissions.

use sqlx::FromRow;

use crate::models::{attempt::AnswerResult, quiz::Question};

/// One `attempt_answers` row joined to its question.
/// `question` and `correct_answer` are empty when the question was deleted
/// after the attempt was recorded.
#[derive(Debug, FromRow)]
pub struct StoredAnswerRow {
    pub question_id: i64,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Tier 1: the authoritative per-answer rows.
pub fn from_stored_rows(rows: &[StoredAnswerRow]) -> Vec<AnswerResult> {
    rows.iter()
        .map(|row| AnswerResult {
            question_id: Some(row.question_id),
            question: row.question.clone(),
            user_answer: row.user_answer.clone(),
            correct_answer: row.correct_answer.clone(),
            is_correct: row.is_correct,
        })
        .collect()
}

/// Tier 2: the legacy JSON snapshot.
///
/// Some historical rows hold the snapshot doubly encoded (a JSON string
/// containing JSON); those get one extra decode pass. Anything that still
/// fails to parse counts as "no details".
pub fn from_details(details: &str) -> Vec<AnswerResult> {
    let value: serde_json::Value = match serde_json::from_str(details) {
        Ok(value) => value,
        Err(_) => return Vec::new(),
    };

    let value = match value {
        serde_json::Value::String(inner) => match serde_json::from_str(&inner) {
            Ok(value) => value,
            Err(_) => return Vec::new(),
        },
        other => other,
    };

    serde_json::from_value(value).unwrap_or_default()
}

/// Tier 3: degraded view from the quiz's current questions. Does not
/// reflect what was actually submitted; used only when no record of the
/// submission survives.
pub fn from_questions(questions: &[Question]) -> Vec<AnswerResult> {
    questions
        .iter()
        .map(|q| AnswerResult {
            question_id: Some(q.id),
            question: q.text.clone(),
            user_answer: String::new(),
            correct_answer: q.correct_answer.clone(),
            is_correct: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_rows_keep_verdict_for_deleted_questions() {
        let rows = vec![
            StoredAnswerRow {
                question_id: 7,
                question: "2+2".to_string(),
                user_answer: "4".to_string(),
                correct_answer: "4".to_string(),
                is_correct: true,
            },
            StoredAnswerRow {
                question_id: 8,
                question: String::new(),
                user_answer: "blue".to_string(),
                correct_answer: String::new(),
                is_correct: true,
            },
        ];

        let results = from_stored_rows(&rows);

        assert_eq!(results.len(), 2);
        assert_eq!(results[1].question, "");
        assert_eq!(results[1].user_answer, "blue");
        assert!(results[1].is_correct);
    }

    #[test]
    fn details_snapshot_parses_directly() {
        let details = r#"[
            {"question_id": 1, "question": "2+2", "user_answer": "4",
             "correct_answer": "4", "is_correct": true}
        ]"#;

        let results = from_details(details);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question_id, Some(1));
        assert!(results[0].is_correct);
    }

    #[test]
    fn details_snapshot_handles_double_encoding() {
        let inner = r#"[{"question_id": 2, "question": "Sky color", "user_answer": "blue", "correct_answer": "Blue", "is_correct": true}]"#;
        let doubly_encoded = serde_json::to_string(inner).unwrap();

        let results = from_details(&doubly_encoded);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question, "Sky color");
    }

    #[test]
    fn details_snapshot_tolerates_missing_fields() {
        let details = r#"[{"question": "orphan entry"}]"#;

        let results = from_details(details);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question_id, None);
        assert_eq!(results[0].user_answer, "");
        assert!(!results[0].is_correct);
    }

    #[test]
    fn unparseable_details_count_as_absent() {
        assert!(from_details("not json at all").is_empty());
        assert!(from_details(r#""still not a list""#).is_empty());
        assert!(from_details("{}").is_empty());
    }

    #[test]
    fn question_fallback_marks_everything_unanswered() {
        let questions = vec![Question {
            id: 3,
            quiz_id: 1,
            order: 0,
            text: "Copy 'Hi'".to_string(),
            correct_answer: "Hi".to_string(),
        }];

        let results = from_questions(&questions);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user_answer, "");
        assert!(!results[0].is_correct);
        assert_eq!(results[0].correct_answer, "Hi");
    }
}
