// src/scoring.rs

use std::collections::HashMap;

use crate::models::{
    attempt::{AnswerResult, SubmittedAnswer},
    quiz::Question,
};

/// Normalizes an answer for comparison: trim surrounding whitespace and
/// lowercase by codepoint. Not locale-sensitive.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Outcome of scoring one submission against one quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    /// One entry per question, in quiz order.
    pub results: Vec<AnswerResult>,
    pub score: i64,
    /// Server-side question count, independent of how many answers
    /// were submitted.
    pub total: i64,
}

/// Scores a submission against the quiz's question set.
///
/// Walks the questions in quiz order; a question with no submitted answer
/// counts as an empty (always incorrect) submission. Submitted answers for
/// unknown question ids are silently ignored. Pure and deterministic.
pub fn score(questions: &[Question], submitted: &[SubmittedAnswer]) -> ScoreOutcome {
    let answer_lookup: HashMap<i64, String> = submitted
        .iter()
        .map(|a| (a.question_id, a.answer.trim().to_string()))
        .collect();

    let mut results = Vec::with_capacity(questions.len());
    let mut score = 0;

    for q in questions {
        let user_answer = answer_lookup.get(&q.id).cloned().unwrap_or_default();
        let is_correct = normalize(&user_answer) == normalize(&q.correct_answer);
        if is_correct {
            score += 1;
        }
        results.push(AnswerResult {
            question_id: Some(q.id),
            question: q.text.clone(),
            user_answer,
            correct_answer: q.correct_answer.clone(),
            is_correct,
        });
    }

    ScoreOutcome {
        results,
        score,
        total: questions.len() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, order: i64, text: &str, answer: &str) -> Question {
        Question {
            id,
            quiz_id: 1,
            order,
            text: text.to_string(),
            correct_answer: answer.to_string(),
        }
    }

    fn submitted(question_id: i64, answer: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id,
            answer: answer.to_string(),
        }
    }

    fn sample_questions() -> Vec<Question> {
        vec![
            question(1, 0, "2+2", "4"),
            question(2, 1, "Sky color", "Blue"),
            question(3, 2, "Copy 'Hi'", "Hi"),
        ]
    }

    #[test]
    fn normalize_is_idempotent_and_insensitive() {
        assert_eq!(normalize(" 4 "), "4");
        assert_eq!(normalize("4"), "4");
        assert_eq!(normalize(&normalize("  Blue ")), normalize("blue"));
        assert_eq!(normalize("Blue"), normalize("bLuE"));
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn scores_trimmed_and_case_folded_answers_as_correct() {
        let questions = sample_questions();
        let answers = vec![submitted(1, " 4 "), submitted(2, "blue"), submitted(3, "hi")];

        let outcome = score(&questions, &answers);

        assert_eq!(outcome.score, 3);
        assert_eq!(outcome.total, 3);
        assert!(outcome.results.iter().all(|r| r.is_correct));
        // Raw submissions are stored trimmed but otherwise untouched.
        assert_eq!(outcome.results[0].user_answer, "4");
        assert_eq!(outcome.results[1].user_answer, "blue");
    }

    #[test]
    fn missing_and_blank_answers_score_incorrect() {
        let questions = sample_questions();
        // Wrong, blank, and the third question not submitted at all.
        let answers = vec![submitted(1, "5"), submitted(2, "")];

        let outcome = score(&questions, &answers);

        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results.iter().all(|r| !r.is_correct));
        assert_eq!(outcome.results[2].user_answer, "");
    }

    #[test]
    fn output_follows_quiz_order_not_submission_order() {
        let questions = sample_questions();
        let answers = vec![submitted(3, "hi"), submitted(1, "4"), submitted(2, "blue")];

        let outcome = score(&questions, &answers);

        let ids: Vec<i64> = outcome.results.iter().filter_map(|r| r.question_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(outcome.score, 3);
    }

    #[test]
    fn unknown_question_ids_are_ignored_and_total_stays_server_side() {
        let questions = sample_questions();
        let answers = vec![submitted(1, "4"), submitted(99, "whatever"), submitted(100, "4")];

        let outcome = score(&questions, &answers);

        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.results.len(), 3);
    }

    #[test]
    fn correct_plus_incorrect_always_equals_total() {
        let questions = sample_questions();
        let cases = vec![
            vec![],
            vec![submitted(1, "4")],
            vec![submitted(1, "4"), submitted(2, "BLUE"), submitted(3, "nope")],
        ];

        for answers in cases {
            let outcome = score(&questions, &answers);
            let incorrect = outcome.results.iter().filter(|r| !r.is_correct).count() as i64;
            assert_eq!(outcome.score + incorrect, outcome.total);
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let questions = sample_questions();
        let answers = vec![submitted(1, " 4 "), submitted(2, "blue")];

        let first = score(&questions, &answers);
        let second = score(&questions, &answers);

        assert_eq!(first, second);
    }
}
