// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    extractors::{CurrentUser, MaybeUser},
    models::quiz::{
        CreateQuizRequest, Question, QuestionOut, Quiz, QuizDetail, QuizSummary,
    },
};

/// A validated question/answer pair, trimmed and ready to persist.
struct CleanQuestion {
    text: String,
    correct_answer: String,
}

/// Validates a create/update payload before anything is written.
///
/// Returns the trimmed title, description and question list, or the exact
/// validation reason to surface as 400.
fn validate_payload(
    payload: &CreateQuizRequest,
) -> Result<(String, String, Vec<CleanQuestion>), AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if payload.questions.is_empty() {
        return Err(AppError::BadRequest(
            "At least one question is required".to_string(),
        ));
    }

    let description = payload
        .description
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();

    let mut questions = Vec::with_capacity(payload.questions.len());
    for q in &payload.questions {
        let text = q.text.trim().to_string();
        let correct_answer = q.correct_answer.trim().to_string();
        if text.is_empty() || correct_answer.is_empty() {
            return Err(AppError::BadRequest(
                "Each question and answer must be non-empty".to_string(),
            ));
        }
        questions.push(CleanQuestion {
            text,
            correct_answer,
        });
    }

    Ok((title, description, questions))
}

/// Lists all public quizzes, newest first. No authentication required.
pub async fn list_public_quizzes(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT id, title, description
        FROM quizzes
        WHERE is_public = 1
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(quizzes))
}

/// Lists the caller's quizzes, newest first.
pub async fn list_my_quizzes(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT id, title, description
        FROM quizzes
        WHERE creator_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(quizzes))
}

/// Creates a quiz with its ordered question set.
///
/// All validation happens before the transaction opens, so a rejected
/// payload never leaves partial state. Quizzes are currently always
/// created public.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (title, description, questions) = validate_payload(&payload)?;

    let mut tx = pool.begin().await?;

    let summary = sqlx::query_as::<_, QuizSummary>(
        r#"
        INSERT INTO quizzes (title, description, creator_id, is_public)
        VALUES (?, ?, ?, 1)
        RETURNING id, title, description
        "#,
    )
    .bind(&title)
    .bind(&description)
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await?;

    for (idx, q) in questions.iter().enumerate() {
        sqlx::query(
            r#"INSERT INTO questions (quiz_id, "order", text, correct_answer) VALUES (?, ?, ?, ?)"#,
        )
        .bind(summary.id)
        .bind(idx as i64)
        .bind(&q.text)
        .bind(&q.correct_answer)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!("User {} created quiz {}", user.id, summary.id);

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Replaces a quiz's title, description and entire question set.
/// Owner only. The delete-then-insert of questions is transactional.
pub async fn update_quiz(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = fetch_quiz(&pool, quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.creator_id != user.id {
        return Err(AppError::Forbidden(
            "You are not allowed to edit this quiz.".to_string(),
        ));
    }

    let (title, description, questions) = validate_payload(&payload)?;

    let mut tx = pool.begin().await?;

    let summary = sqlx::query_as::<_, QuizSummary>(
        r#"
        UPDATE quizzes SET title = ?, description = ?
        WHERE id = ?
        RETURNING id, title, description
        "#,
    )
    .bind(&title)
    .bind(&description)
    .bind(quiz_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM questions WHERE quiz_id = ?")
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

    for (idx, q) in questions.iter().enumerate() {
        sqlx::query(
            r#"INSERT INTO questions (quiz_id, "order", text, correct_answer) VALUES (?, ?, ?, ?)"#,
        )
        .bind(quiz_id)
        .bind(idx as i64)
        .bind(&q.text)
        .bind(&q.correct_answer)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Json(summary))
}

/// Deletes a quiz and its questions. Owner only.
///
/// Existing attempts survive as dangling references; result listings
/// render them with an empty quiz title.
pub async fn delete_quiz(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = fetch_quiz(&pool, quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.creator_id != user.id {
        return Err(AppError::Forbidden(
            "You are not allowed to delete this quiz.".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM questions WHERE quiz_id = ?")
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(quiz_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("User {} deleted quiz {}", user.id, quiz_id);

    Ok(StatusCode::NO_CONTENT)
}

/// Retrieves a quiz with its questions in order.
///
/// A private quiz is indistinguishable from a missing one unless the
/// caller owns it. Reference answers are included only for the owner.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    MaybeUser(user): MaybeUser,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = fetch_quiz(&pool, quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let is_owner = user.as_ref().is_some_and(|u| u.id == quiz.creator_id);
    if !quiz.is_public && !is_owner {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    let questions = fetch_questions(&pool, quiz_id).await?;

    let questions_payload = questions
        .into_iter()
        .map(|q| QuestionOut {
            id: q.id,
            order: q.order,
            text: q.text,
            correct_answer: is_owner.then_some(q.correct_answer),
        })
        .collect();

    Ok(Json(QuizDetail {
        id: quiz.id,
        title: quiz.title,
        description: quiz.description,
        questions: questions_payload,
    }))
}

pub(crate) async fn fetch_quiz<'e>(
    executor: impl sqlx::SqliteExecutor<'e>,
    quiz_id: i64,
) -> Result<Option<Quiz>, AppError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        SELECT id, title, description, creator_id, is_public, created_at
        FROM quizzes
        WHERE id = ?
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(executor)
    .await?;

    Ok(quiz)
}

pub(crate) async fn fetch_questions<'e>(
    executor: impl sqlx::SqliteExecutor<'e>,
    quiz_id: i64,
) -> Result<Vec<Question>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, quiz_id, "order", text, correct_answer
        FROM questions
        WHERE quiz_id = ?
        ORDER BY "order" ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(executor)
    .await?;

    Ok(questions)
}
