//! Item domain services
//!
//! `ItemService` orchestrates reports, listings and status changes over
//! an [`ItemPort`]. Claim submission and review live in the claims crate;
//! this service only needs to know whether an item has been claimed at
//! all, which it asks through [`ClaimReferences`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use core_kernel::{Actor, ItemId};
use crate::error::ItemError;
use crate::item::{Item, ItemStatus, ReportFoundItem, ReportLostItem, UpdateItemRequest};
use crate::matching::check_for_matches;
use crate::ports::{ClaimReferences, ItemPort};
use crate::query::{ItemQuery, ItemStats};
use crate::validation::ItemValidator;

/// Result of reporting an item: the stored item plus counterparts the
/// matcher found in the opposite pool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutcome {
    pub item: Item,
    pub potential_matches: Vec<Item>,
}

/// Service for reporting, browsing and updating items
#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemPort>,
    claim_refs: Arc<dyn ClaimReferences>,
}

impl ItemService {
    /// Creates a new item service
    pub fn new(items: Arc<dyn ItemPort>, claim_refs: Arc<dyn ClaimReferences>) -> Self {
        Self { items, claim_refs }
    }

    /// The underlying item store
    pub fn port(&self) -> &Arc<dyn ItemPort> {
        &self.items
    }

    /// Reports a found item and returns lost items it may belong to
    ///
    /// # Errors
    ///
    /// Returns `ItemError::Validation` if a required field is blank or
    /// fewer than two complete questions are supplied
    pub async fn report_found(
        &self,
        actor: &Actor,
        report: ReportFoundItem,
    ) -> Result<ReportOutcome, ItemError> {
        ItemValidator::validate_found(&report)?;
        let item = Item::found(report, actor);
        self.store_new(item).await
    }

    /// Reports a lost item and returns found items that may be it
    pub async fn report_lost(
        &self,
        actor: &Actor,
        report: ReportLostItem,
    ) -> Result<ReportOutcome, ItemError> {
        ItemValidator::validate_lost(&report)?;
        let item = Item::lost(report, actor);
        self.store_new(item).await
    }

    async fn store_new(&self, item: Item) -> Result<ReportOutcome, ItemError> {
        self.items.insert_item(&item).await?;
        info!(
            item_id = %item.id,
            status = %item.status,
            reporter = %item.reported_by,
            "Item reported"
        );

        let potential_matches = self.matches_for(&item).await?;
        if !potential_matches.is_empty() {
            info!(item_id = %item.id, count = potential_matches.len(), "Potential matches found");
        }

        Ok(ReportOutcome {
            item,
            potential_matches,
        })
    }

    /// Retrieves an item by ID
    pub async fn get_item(&self, id: ItemId) -> Result<Item, ItemError> {
        self.items
            .get_item(id)
            .await
            .map_err(|e| ItemError::from_lookup(e, id))
    }

    /// Lists items matching the query, newest first
    pub async fn list_items(&self, query: &ItemQuery) -> Result<Vec<Item>, ItemError> {
        Ok(self.items.find_items(query).await?)
    }

    /// Items currently reported lost
    pub async fn lost_items(&self) -> Result<Vec<Item>, ItemError> {
        self.list_items(&ItemQuery::lost()).await
    }

    /// Items in the found pool, including claimed and returned ones
    pub async fn found_items(&self) -> Result<Vec<Item>, ItemError> {
        self.list_items(&ItemQuery::found()).await
    }

    pub async fn items_by_status(&self, status: ItemStatus) -> Result<Vec<Item>, ItemError> {
        self.list_items(&ItemQuery::new().with_statuses([status])).await
    }

    /// Dashboard counts and the most recent reports
    pub async fn stats(&self) -> Result<ItemStats, ItemError> {
        let all = self.items.find_items(&ItemQuery::new()).await?;
        Ok(ItemStats::compute(all.iter()))
    }

    /// Reruns the matcher for an existing item
    pub async fn find_matches(&self, id: ItemId) -> Result<Vec<Item>, ItemError> {
        let item = self.get_item(id).await?;
        self.matches_for(&item).await
    }

    async fn matches_for(&self, item: &Item) -> Result<Vec<Item>, ItemError> {
        let counterpart = item.kind().counterpart_status();
        let mut pool = self
            .items
            .find_items(&ItemQuery::new().with_statuses([counterpart]))
            .await?;
        // Pool order is report order
        pool.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        let matches = check_for_matches(item, pool.iter());
        debug!(item_id = %item.id, pool = pool.len(), matches = matches.len(), "Matcher ran");
        Ok(matches)
    }

    /// Applies an allow-listed update
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the actor reported the item or is an admin
    /// - `Validation` for blank fields or an incomplete question list
    /// - `QuestionsLocked` when replacing questions on a claimed-against item
    pub async fn update_item(
        &self,
        actor: &Actor,
        id: ItemId,
        update: UpdateItemRequest,
    ) -> Result<Item, ItemError> {
        let mut item = self.get_item(id).await?;
        self.require_reviewer(actor, &item, "update")?;
        ItemValidator::validate_update(&update)?;

        if update.questions.is_some() && self.claim_refs.has_claims(id).await? {
            warn!(item_id = %id, "Refused question change on item with claims");
            return Err(ItemError::QuestionsLocked);
        }

        item.apply_update(update)?;
        self.items.save_item(&item).await?;
        info!(item_id = %id, actor = %actor.user_id, "Item updated");
        Ok(item)
    }

    /// Hard-deletes an item. Claims referring to it are left in place.
    pub async fn delete_item(&self, actor: &Actor, id: ItemId) -> Result<(), ItemError> {
        let item = self.get_item(id).await?;
        self.require_reviewer(actor, &item, "delete")?;

        self.items
            .delete_item(id)
            .await
            .map_err(|e| ItemError::from_lookup(e, id))?;
        info!(item_id = %id, actor = %actor.user_id, "Item deleted");
        Ok(())
    }

    /// Marks a claimed item as handed back
    ///
    /// Only the user the item was claimed by, or an admin, may do this.
    pub async fn return_item(&self, actor: &Actor, id: ItemId) -> Result<Item, ItemError> {
        let mut item = self.get_item(id).await?;

        if item.status != ItemStatus::Claimed {
            warn!(item_id = %id, status = %item.status, "Refused return of unclaimed item");
            return Err(ItemError::InvalidStatusTransition {
                from: item.status,
                to: ItemStatus::Returned,
            });
        }
        let is_claimant = item.claimed_by == Some(actor.user_id);
        if !is_claimant && !actor.is_admin() {
            warn!(item_id = %id, actor = %actor.user_id, "Refused return by non-claimant");
            return Err(ItemError::unauthorized(
                "Only the claimant or an admin can mark this item returned",
            ));
        }

        item.mark_returned()?;
        self.items.save_item(&item).await?;
        info!(item_id = %id, actor = %actor.user_id, "Item returned");
        Ok(item)
    }

    /// Marks a lost report as matched with its found counterpart
    pub async fn mark_matched(&self, actor: &Actor, id: ItemId) -> Result<Item, ItemError> {
        let mut item = self.get_item(id).await?;
        self.require_reviewer(actor, &item, "mark as matched")?;

        item.mark_matched()?;
        self.items.save_item(&item).await?;
        info!(item_id = %id, actor = %actor.user_id, "Item matched");
        Ok(item)
    }

    fn require_reviewer(&self, actor: &Actor, item: &Item, action: &str) -> Result<(), ItemError> {
        if item.is_reviewable_by(actor) {
            return Ok(());
        }
        warn!(item_id = %item.id, actor = %actor.user_id, action, "Refused non-owner action");
        Err(ItemError::unauthorized(format!(
            "Only the reporter or an admin can {} this item",
            action
        )))
    }
}
