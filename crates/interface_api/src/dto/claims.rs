//! Claim DTOs

use serde::{Deserialize, Serialize};

use core_kernel::{Actor, ClaimId};
use domain_claims::{ClaimAttempt, ClaimOutcome, ReviewDecision};

use crate::dto::items::ItemResponse;

/// Body of `POST /items/:id/review-claim`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewClaimRequest {
    pub claim_id: ClaimId,
    /// `approve`/`reject`, or the resulting status `approved`/`rejected`
    pub decision: ReviewDecision,
    /// Optional note shown to the claimant
    #[serde(default)]
    pub response: Option<String>,
}

/// A claim together with the item it concerns
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOutcomeResponse {
    pub claim: ClaimAttempt,
    pub item: ItemResponse,
}

impl ClaimOutcomeResponse {
    pub fn view(outcome: ClaimOutcome, viewer: &Actor) -> Self {
        Self {
            claim: outcome.claim,
            item: ItemResponse::view(outcome.item, Some(viewer)),
        }
    }
}
