//! Claim attempt aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Actor, ClaimId, ItemId, QuestionId, UserId};
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Waiting for the reporter's decision
    Pending,
    /// Accepted; the item is bound to the claimant
    Approved,
    /// Declined by the reporter, or superseded by another approval
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Pending and approved claims block a second claim by the same user
    pub fn is_active(&self) -> bool {
        matches!(self, ClaimStatus::Pending | ClaimStatus::Approved)
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claimant's answer to one verification question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAnswer {
    pub question_id: QuestionId,
    pub answer: String,
}

impl ClaimAnswer {
    pub fn new(question_id: QuestionId, answer: impl Into<String>) -> Self {
        Self {
            question_id,
            answer: answer.into(),
        }
    }
}

/// A claim against a found item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAttempt {
    /// Unique identifier
    pub id: ClaimId,
    /// Item being claimed
    pub item_id: ItemId,
    pub claimant_id: UserId,
    pub claimant_name: String,
    /// Answers in question order
    pub answers: Vec<ClaimAnswer>,
    pub status: ClaimStatus,
    /// Note from the reviewer, shown to the claimant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClaimAttempt {
    /// Creates a pending claim
    pub fn submit(item_id: ItemId, claimant: &Actor, answers: Vec<ClaimAnswer>) -> Self {
        let now = Utc::now();
        Self {
            id: ClaimId::new_v7(),
            item_id,
            claimant_id: claimant.user_id,
            claimant_name: claimant.display_name.clone(),
            answers: answers
                .into_iter()
                .map(|a| ClaimAnswer::new(a.question_id, a.answer.trim()))
                .collect(),
            status: ClaimStatus::Pending,
            reporter_response: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Answer submitted for `question_id`, if any
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| a.answer.as_str())
    }

    pub fn approve(&mut self, response: Option<String>) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::Approved, response)
    }

    pub fn reject(&mut self, response: Option<String>) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::Rejected, response)
    }

    /// Updates the status and stores the reviewer's response
    pub fn update_status(
        &mut self,
        status: ClaimStatus,
        response: Option<String>,
    ) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        if let Some(response) = response.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
            self.reporter_response = Some(response);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::UserRole;

    fn claimant() -> Actor {
        Actor::new(UserId::new(), "Mike Johnson", UserRole::User)
    }

    #[test]
    fn test_submit_trims_answers() {
        let question = QuestionId::new();
        let claim = ClaimAttempt::submit(ItemId::new(), &claimant(), vec![ClaimAnswer::new(question, "  Blue ")]);

        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.answer_for(question), Some("Blue"));
        assert_eq!(claim.claimant_name, "Mike Johnson");
    }

    #[test]
    fn test_reviewed_claim_is_final() {
        let mut claim = ClaimAttempt::submit(ItemId::new(), &claimant(), vec![]);
        claim.reject(Some("Wrong sticker".to_string())).unwrap();

        assert_eq!(claim.reporter_response.as_deref(), Some("Wrong sticker"));
        assert!(claim.approve(None).is_err());
        assert_eq!(claim.status, ClaimStatus::Rejected);
    }

    #[test]
    fn test_active_statuses() {
        assert!(ClaimStatus::Pending.is_active());
        assert!(ClaimStatus::Approved.is_active());
        assert!(!ClaimStatus::Rejected.is_active());
    }
}
