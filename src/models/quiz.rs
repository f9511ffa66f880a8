// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub creator_id: i64,
    pub is_public: bool,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// Represents the 'questions' table in the database.
/// `order` is a dense 0-based sequence within its quiz.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub order: i64,
    pub text: String,
    pub correct_answer: String,
}

/// One question/answer pair in a create or update request.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionInput {
    pub text: String,
    pub correct_answer: String,
}

/// DTO for creating or fully replacing a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    pub title: String,

    pub description: Option<String>,

    #[validate(length(
        min = 1,
        max = 10,
        message = "A quiz must have between 1 and 10 questions"
    ))]
    pub questions: Vec<QuestionInput>,
}

/// Quiz listing/creation response, without questions.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Per-question payload of a quiz detail view.
/// `correct_answer` is populated only for the quiz owner.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: i64,
    pub order: i64,
    pub text: String,
    pub correct_answer: Option<String>,
}

/// Full quiz detail with ordered questions.
#[derive(Debug, Serialize)]
pub struct QuizDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionOut>,
}
