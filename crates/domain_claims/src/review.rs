//! Reviewer decisions and the review queue view

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::ItemId;
use domain_items::Item;

use crate::claim::{ClaimAttempt, ClaimStatus};
use crate::error::ClaimError;
use crate::verification::{compare_answers, AnswerComparison};

/// Response stored on pending claims rejected because another claim on
/// the same item was approved
pub const SUPERSEDED_RESPONSE: &str = "Another claim for this item was approved";

/// Reviewer decision on a pending claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    #[serde(alias = "approved")]
    Approve,
    #[serde(alias = "rejected")]
    Reject,
}

impl ReviewDecision {
    /// Claim status the decision leads to
    pub fn target_status(&self) -> ClaimStatus {
        match self {
            ReviewDecision::Approve => ClaimStatus::Approved,
            ReviewDecision::Reject => ClaimStatus::Rejected,
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewDecision::Approve => f.write_str("approve"),
            ReviewDecision::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = ClaimError;

    /// Accepts both the verb and the resulting status
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(ReviewDecision::Approve),
            "reject" | "rejected" => Ok(ReviewDecision::Reject),
            other => Err(ClaimError::validation_field(
                "decision",
                format!("Unknown review decision '{}'", other),
            )),
        }
    }
}

/// A pending claim laid out for its reviewer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSheet {
    pub item_id: ItemId,
    pub item_name: String,
    pub claim: ClaimAttempt,
    pub comparisons: Vec<AnswerComparison>,
    /// True when every answer matches
    pub all_correct: bool,
}

impl ReviewSheet {
    pub fn new(item: &Item, claim: ClaimAttempt) -> Self {
        let comparisons = compare_answers(&item.questions, &claim.answers);
        let all_correct = comparisons.iter().all(|c| c.matches);
        Self {
            item_id: item.id,
            item_name: item.name.clone(),
            claim,
            comparisons,
            all_correct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parsing() {
        assert_eq!("approved".parse::<ReviewDecision>().unwrap(), ReviewDecision::Approve);
        assert_eq!("Reject".parse::<ReviewDecision>().unwrap(), ReviewDecision::Reject);
        assert!("maybe".parse::<ReviewDecision>().is_err());
    }

    #[test]
    fn test_target_status() {
        assert_eq!(ReviewDecision::Approve.target_status(), ClaimStatus::Approved);
        assert_eq!(ReviewDecision::Reject.target_status(), ClaimStatus::Rejected);
    }
}
