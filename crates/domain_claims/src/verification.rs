//! Answer verification
//!
//! Answers are compared trimmed and case-insensitively against the
//! reporter's expected answers. There is no partial credit: a claim
//! verifies only when every question has a matching answer.

use serde::{Deserialize, Serialize};

use core_kernel::QuestionId;
use domain_items::Question;

use crate::claim::ClaimAnswer;

/// One row of the reviewer's side-by-side view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerComparison {
    pub question_id: QuestionId,
    pub question: String,
    pub expected: String,
    /// Empty when the claimant skipped the question
    pub submitted: String,
    pub matches: bool,
}

/// True if every question has a submitted answer equal to the expected one
///
/// An item with no questions verifies trivially.
pub fn verify_answers(questions: &[Question], answers: &[ClaimAnswer]) -> bool {
    questions.iter().all(|q| {
        submitted_for(q.id, answers)
            .map(|submitted| answers_match(&q.answer, submitted))
            .unwrap_or(false)
    })
}

/// Per-question comparison in question order
pub fn compare_answers(questions: &[Question], answers: &[ClaimAnswer]) -> Vec<AnswerComparison> {
    questions
        .iter()
        .map(|q| {
            let submitted = submitted_for(q.id, answers).unwrap_or_default();
            AnswerComparison {
                question_id: q.id,
                question: q.question.clone(),
                expected: q.answer.clone(),
                submitted: submitted.to_string(),
                matches: answers_match(&q.answer, submitted),
            }
        })
        .collect()
}

/// Position (1-based) of the first question without a non-blank answer
pub fn first_unanswered(questions: &[Question], answers: &[ClaimAnswer]) -> Option<usize> {
    questions
        .iter()
        .position(|q| {
            submitted_for(q.id, answers)
                .map(|a| a.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|index| index + 1)
}

/// Case-insensitive, whitespace-trimmed equality; blank never matches
pub fn answers_match(expected: &str, submitted: &str) -> bool {
    let submitted = submitted.trim();
    !submitted.is_empty() && expected.trim().to_lowercase() == submitted.to_lowercase()
}

fn submitted_for(question_id: QuestionId, answers: &[ClaimAnswer]) -> Option<&str> {
    answers
        .iter()
        .find(|a| a.question_id == question_id)
        .map(|a| a.answer.as_str())
}
