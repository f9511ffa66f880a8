// src/handlers/attempt.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    extractors::CurrentUser,
    handlers::quiz::{fetch_questions, fetch_quiz},
    models::attempt::{Attempt, AttemptDetail, AttemptListItem, SubmitRequest, SubmitResult},
    reconstruct::{self, StoredAnswerRow},
    scoring,
};

/// Helper struct for reading back a freshly inserted attempt.
#[derive(sqlx::FromRow)]
struct InsertedAttempt {
    id: i64,
    created_at: Option<chrono::NaiveDateTime>,
}

/// Scores a submission and records it as an immutable attempt.
///
/// The attempt row (with its legacy `details` snapshot) and all per-answer
/// rows commit in one transaction; a failure leaves no partial attempt.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(quiz_id): Path<i64>,
    Json(submission): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    // The question read and the attempt write share one transaction, so a
    // concurrent question replace cannot interleave.
    let mut tx = pool.begin().await?;

    let quiz = fetch_quiz(&mut *tx, quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let questions = fetch_questions(&mut *tx, quiz_id).await?;

    let outcome = scoring::score(&questions, &submission.answers);

    let details = serde_json::to_string(&outcome.results)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let attempt = sqlx::query_as::<_, InsertedAttempt>(
        r#"
        INSERT INTO attempts (quiz_id, user_id, score, total, details)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, created_at
        "#,
    )
    .bind(quiz_id)
    .bind(user.id)
    .bind(outcome.score)
    .bind(outcome.total)
    .bind(&details)
    .fetch_one(&mut *tx)
    .await?;

    for result in &outcome.results {
        sqlx::query(
            r#"
            INSERT INTO attempt_answers (attempt_id, question_id, user_answer, is_correct)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(attempt.id)
        .bind(result.question_id)
        .bind(&result.user_answer)
        .bind(result.is_correct)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        "User {} scored {}/{} on quiz {} (attempt {})",
        user.id,
        outcome.score,
        outcome.total,
        quiz_id,
        attempt.id
    );

    Ok(Json(SubmitResult {
        attempt_id: attempt.id,
        quiz_id,
        quiz_title: quiz.title,
        score: outcome.score,
        total: outcome.total,
        results: outcome.results,
        created_at: attempt.created_at,
    }))
}

/// Lists the caller's attempts, most recent first.
pub async fn my_results(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let attempts = sqlx::query_as::<_, AttemptListItem>(
        r#"
        SELECT
            a.id,
            a.quiz_id,
            COALESCE(q.title, '') AS quiz_title,
            a.score,
            a.total,
            a.created_at
        FROM attempts a
        LEFT JOIN quizzes q ON q.id = a.quiz_id
        WHERE a.user_id = ?
        ORDER BY a.id DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(attempts))
}

/// Reconstructs the detail view of a past attempt.
///
/// Visible only to the user who made the attempt; not to the quiz owner.
/// The result list comes from the first non-empty source: stored
/// per-answer rows, the legacy `details` snapshot, then the quiz's
/// current questions as a degraded last resort.
pub async fn attempt_detail(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = sqlx::query_as::<_, Attempt>(
        r#"
        SELECT id, quiz_id, user_id, score, total, details, created_at
        FROM attempts
        WHERE id = ?
        "#,
    )
    .bind(attempt_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;

    if attempt.user_id != user.id {
        return Err(AppError::Forbidden(
            "Not authorized to view this attempt".to_string(),
        ));
    }

    let stored_rows = sqlx::query_as::<_, StoredAnswerRow>(
        r#"
        SELECT
            aa.question_id,
            COALESCE(q.text, '') AS question,
            aa.user_answer,
            COALESCE(q.correct_answer, '') AS correct_answer,
            aa.is_correct
        FROM attempt_answers aa
        LEFT JOIN questions q ON q.id = aa.question_id
        WHERE aa.attempt_id = ?
        ORDER BY aa.id ASC
        "#,
    )
    .bind(attempt_id)
    .fetch_all(&pool)
    .await?;

    let mut results = reconstruct::from_stored_rows(&stored_rows);

    if results.is_empty() {
        if let Some(details) = attempt.details.as_deref() {
            results = reconstruct::from_details(details);
        }
    }

    if results.is_empty() {
        let questions = fetch_questions(&pool, attempt.quiz_id).await?;
        results = reconstruct::from_questions(&questions);
    }

    let quiz_title = fetch_quiz(&pool, attempt.quiz_id)
        .await?
        .map(|quiz| quiz.title)
        .unwrap_or_default();

    Ok(Json(AttemptDetail {
        attempt_id: attempt.id,
        quiz_id: attempt.quiz_id,
        quiz_title,
        score: attempt.score,
        total: attempt.total,
        created_at: attempt.created_at,
        results,
    }))
}

/// Returns the caller's most recent attempt at a quiz, or an explicit
/// "not attempted" signal.
pub async fn my_latest_attempt(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempt = sqlx::query_as::<_, Attempt>(
        r#"
        SELECT id, quiz_id, user_id, score, total, details, created_at
        FROM attempts
        WHERE quiz_id = ? AND user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(quiz_id)
    .bind(user.id)
    .fetch_optional(&pool)
    .await?;

    let Some(attempt) = attempt else {
        return Ok(Json(serde_json::json!({ "attempted": false })));
    };

    Ok(Json(serde_json::json!({
        "attempted": true,
        "attempt_id": attempt.id,
        "score": attempt.score,
        "total": attempt.total,
        "completed_at": attempt.created_at,
    })))
}
