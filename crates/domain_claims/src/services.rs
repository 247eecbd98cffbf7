//! Claims domain services
//!
//! `ClaimService` runs claim submission and review. It reads and writes
//! items directly through the item port, since approving a claim and
//! binding the item to its claimant are one operation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

use core_kernel::{Actor, ClaimId, ItemId};
use domain_items::{Item, ItemPort, ItemStatus};

use crate::claim::{ClaimAnswer, ClaimAttempt, ClaimStatus};
use crate::error::ClaimError;
use crate::ports::{ClaimPort, ClaimQuery};
use crate::review::{ReviewDecision, ReviewSheet, SUPERSEDED_RESPONSE};
use crate::verification::{first_unanswered, verify_answers};

/// How submitted claims are decided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimMode {
    /// Every claim waits for the reporter's decision
    #[default]
    Review,
    /// Correct answers claim the item immediately; wrong ones are refused
    AutoVerify,
}

impl fmt::Display for ClaimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimMode::Review => f.write_str("review"),
            ClaimMode::AutoVerify => f.write_str("auto_verify"),
        }
    }
}

impl FromStr for ClaimMode {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "review" => Ok(ClaimMode::Review),
            "auto_verify" | "direct" => Ok(ClaimMode::AutoVerify),
            other => Err(ClaimError::validation_field(
                "claimMode",
                format!("Unknown claim mode '{}'", other),
            )),
        }
    }
}

/// Answers submitted with a claim
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClaim {
    pub answers: Vec<ClaimAnswer>,
}

/// A claim together with the item it refers to, as stored after the
/// operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimOutcome {
    pub claim: ClaimAttempt,
    pub item: Item,
}

/// Service for submitting and reviewing claims
#[derive(Clone)]
pub struct ClaimService {
    items: Arc<dyn ItemPort>,
    claims: Arc<dyn ClaimPort>,
    mode: ClaimMode,
}

impl ClaimService {
    /// Creates a new claim service
    pub fn new(items: Arc<dyn ItemPort>, claims: Arc<dyn ClaimPort>, mode: ClaimMode) -> Self {
        Self { items, claims, mode }
    }

    pub fn mode(&self) -> ClaimMode {
        self.mode
    }

    /// The underlying claim store
    pub fn port(&self) -> &Arc<dyn ClaimPort> {
        &self.claims
    }

    /// Submits a claim on a found item
    ///
    /// In review mode the claim is stored as pending whatever the answers.
    /// In auto-verify mode correct answers claim the item at once and
    /// wrong answers are refused without storing anything.
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` if the item does not exist
    /// - `ItemNotClaimable` unless the item is `found`
    /// - `Validation` if a question is left unanswered
    /// - `DuplicateClaim` if the claimant already has an active claim on it
    /// - `IncorrectAnswers` in auto-verify mode when verification fails
    pub async fn submit_claim(
        &self,
        actor: &Actor,
        item_id: ItemId,
        submission: SubmitClaim,
    ) -> Result<ClaimOutcome, ClaimError> {
        let mut item = self.load_item(item_id).await?;

        if item.status != ItemStatus::Found {
            warn!(item_id = %item_id, status = %item.status, "Refused claim on unclaimable item");
            return Err(ClaimError::ItemNotClaimable { status: item.status });
        }
        if let Some(number) = first_unanswered(&item.questions, &submission.answers) {
            return Err(ClaimError::validation_field(
                "answers",
                format!("Please answer question {}", number),
            ));
        }

        let active = self
            .claims
            .find_claims(
                &ClaimQuery::for_item(item_id)
                    .with_claimant(actor.user_id)
                    .with_statuses([ClaimStatus::Pending, ClaimStatus::Approved]),
            )
            .await?;
        if !active.is_empty() {
            warn!(item_id = %item_id, claimant = %actor.user_id, "Refused duplicate claim");
            return Err(ClaimError::DuplicateClaim);
        }

        let mut claim = ClaimAttempt::submit(item_id, actor, submission.answers);

        match self.mode {
            ClaimMode::Review => {
                self.claims.insert_claim(&claim).await?;
                info!(claim_id = %claim.id, item_id = %item_id, claimant = %actor.user_id, "Claim submitted for review");
            }
            ClaimMode::AutoVerify => {
                if !verify_answers(&item.questions, &claim.answers) {
                    info!(item_id = %item_id, claimant = %actor.user_id, "Claim answers did not verify");
                    return Err(ClaimError::IncorrectAnswers);
                }
                claim.approve(None)?;
                let unclaimed = item.clone();
                item.mark_claimed(actor.user_id)?;
                self.items.save_item(&item).await?;
                if let Err(e) = self.claims.insert_claim(&claim).await {
                    self.restore_item(&unclaimed).await;
                    return Err(e.into());
                }
                info!(claim_id = %claim.id, item_id = %item_id, claimant = %actor.user_id, "Item claimed by verified answers");
            }
        }

        Ok(ClaimOutcome { claim, item })
    }

    /// Records a reviewer decision on a pending claim
    ///
    /// Approval binds the item to the claimant and rejects every other
    /// pending claim on the item. If the claim cannot be written the item
    /// is put back, and approving an already approved claim again retries
    /// the competing rejections.
    pub async fn review_claim(
        &self,
        actor: &Actor,
        item_id: ItemId,
        claim_id: ClaimId,
        decision: ReviewDecision,
        response: Option<String>,
    ) -> Result<ClaimOutcome, ClaimError> {
        let mut item = self.load_item(item_id).await?;
        if !item.is_reviewable_by(actor) {
            warn!(item_id = %item_id, actor = %actor.user_id, "Refused review by non-owner");
            return Err(ClaimError::unauthorized(
                "Only the reporter or an admin can review claims on this item",
            ));
        }

        let mut claim = self
            .claims
            .get_claim(claim_id)
            .await
            .map_err(|e| ClaimError::claim_lookup(e, claim_id))?;
        if claim.item_id != item_id {
            return Err(ClaimError::ClaimNotFound(claim_id));
        }
        let bound_to_claimant = item.status == ItemStatus::Claimed
            && item.claimed_by == Some(claim.claimant_id);

        // Approving again finishes an approval whose competing rejections
        // did not all get written
        if decision == ReviewDecision::Approve
            && claim.status == ClaimStatus::Approved
            && bound_to_claimant
        {
            self.reject_competing(item_id, claim_id).await?;
            return Ok(ClaimOutcome { claim, item });
        }

        if claim.status != ClaimStatus::Pending {
            return Err(ClaimError::InvalidStatusTransition {
                from: claim.status,
                to: decision.target_status(),
            });
        }

        match decision {
            ReviewDecision::Approve => {
                claim.approve(response)?;
                if bound_to_claimant {
                    // The item was saved by an approval whose claim write failed
                    self.claims.save_claim(&claim).await?;
                } else {
                    if item.status != ItemStatus::Found {
                        return Err(ClaimError::ItemNotClaimable { status: item.status });
                    }
                    let unclaimed = item.clone();
                    item.mark_claimed(claim.claimant_id)?;
                    self.items.save_item(&item).await?;
                    if let Err(e) = self.claims.save_claim(&claim).await {
                        self.restore_item(&unclaimed).await;
                        return Err(e.into());
                    }
                }
                info!(claim_id = %claim_id, item_id = %item_id, reviewer = %actor.user_id, "Claim approved");

                self.reject_competing(item_id, claim_id).await?;
            }
            ReviewDecision::Reject => {
                claim.reject(response)?;
                self.claims.save_claim(&claim).await?;
                info!(claim_id = %claim_id, item_id = %item_id, reviewer = %actor.user_id, "Claim rejected");
            }
        }

        Ok(ClaimOutcome { claim, item })
    }

    async fn reject_competing(&self, item_id: ItemId, approved: ClaimId) -> Result<(), ClaimError> {
        let pending = self
            .claims
            .find_claims(&ClaimQuery::for_item(item_id).with_statuses([ClaimStatus::Pending]))
            .await?;

        for mut other in pending.into_iter().filter(|c| c.id != approved) {
            other.reject(Some(SUPERSEDED_RESPONSE.to_string()))?;
            self.claims.save_claim(&other).await?;
            info!(claim_id = %other.id, item_id = %item_id, "Competing claim rejected");
        }
        Ok(())
    }

    /// Claims on an item: all of them for its reviewers, otherwise only
    /// the actor's own
    pub async fn claims_for_item(
        &self,
        actor: &Actor,
        item_id: ItemId,
    ) -> Result<Vec<ClaimAttempt>, ClaimError> {
        let item = self.load_item(item_id).await?;
        let mut query = ClaimQuery::for_item(item_id);
        if !item.is_reviewable_by(actor) {
            query = query.with_claimant(actor.user_id);
        }
        Ok(self.claims.find_claims(&query).await?)
    }

    /// Claims the actor has submitted, newest first
    pub async fn my_claims(&self, actor: &Actor) -> Result<Vec<ClaimAttempt>, ClaimError> {
        let mut claims = self
            .claims
            .find_claims(&ClaimQuery::by_claimant(actor.user_id))
            .await?;
        claims.reverse();
        Ok(claims)
    }

    /// Pending claims the actor may decide, with answer comparisons
    ///
    /// Claims on deleted items are skipped.
    pub async fn review_queue(&self, actor: &Actor) -> Result<Vec<ReviewSheet>, ClaimError> {
        let pending = self.claims.find_claims(&ClaimQuery::pending()).await?;

        let mut items: HashMap<ItemId, Option<Item>> = HashMap::new();
        let mut sheets = Vec::new();
        for claim in pending {
            if !items.contains_key(&claim.item_id) {
                let item = match self.items.get_item(claim.item_id).await {
                    Ok(item) => Some(item),
                    Err(e) if e.is_not_found() => None,
                    Err(e) => return Err(e.into()),
                };
                items.insert(claim.item_id, item);
            }
            if let Some(Some(item)) = items.get(&claim.item_id) {
                if item.is_reviewable_by(actor) {
                    sheets.push(ReviewSheet::new(item, claim));
                }
            }
        }
        Ok(sheets)
    }

    /// Puts back an item whose claim could not be written
    ///
    /// If this write fails too, the item stays bound to the claimant and
    /// approving the pending claim again completes the operation.
    async fn restore_item(&self, unclaimed: &Item) {
        if let Err(e) = self.items.save_item(unclaimed).await {
            error!(item_id = %unclaimed.id, error = %e, "Failed to restore item after claim write failure");
        } else {
            warn!(item_id = %unclaimed.id, "Restored item after claim write failure");
        }
    }

    async fn load_item(&self, item_id: ItemId) -> Result<Item, ClaimError> {
        self.items
            .get_item(item_id)
            .await
            .map_err(|e| ClaimError::item_lookup(e, item_id))
    }
}
