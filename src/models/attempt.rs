// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'attempts' table in the database.
/// Immutable once created: one row per scoring event.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub quiz_id: i64,
    pub user_id: i64,
    pub score: i64,
    pub total: i64,

    /// Redundant JSON snapshot of the scored results. Kept for attempts
    /// recorded before per-answer rows existed.
    pub details: Option<String>,

    pub created_at: Option<chrono::NaiveDateTime>,
}

/// One submitted answer, keyed by question id.
#[derive(Debug, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    #[serde(default)]
    pub answer: String,
}

/// DTO for submitting answers to a quiz.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub answers: Vec<SubmittedAnswer>,
}

/// One scored question, in quiz order.
///
/// Also the unit of the legacy `details` snapshot; the serde defaults keep
/// parsing lenient for snapshots written by older deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    #[serde(default)]
    pub question_id: Option<i64>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Response to a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResult {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: i64,
    pub total: i64,
    pub results: Vec<AnswerResult>,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// One row of the caller's results listing.
#[derive(Debug, Serialize, FromRow)]
pub struct AttemptListItem {
    pub id: i64,
    pub quiz_id: i64,
    /// Empty string when the quiz has since been deleted.
    pub quiz_title: String,
    pub score: i64,
    pub total: i64,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// Reconstructed view of a past attempt.
#[derive(Debug, Serialize)]
pub struct AttemptDetail {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: i64,
    pub total: i64,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub results: Vec<AnswerResult>,
}
