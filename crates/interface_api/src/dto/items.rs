//! Item DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Actor, ItemId, QuestionId, UserId};
use domain_items::{
    CategoryCount, Item, ItemError, ItemQuery, ItemStats, ItemStatus, ReportFoundItem,
    ReportLostItem, ReportOutcome, StatusCounts,
};

/// Largest page a listing will return
pub const MAX_PAGE_SIZE: usize = 200;

/// Body of `POST /items`
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportItemRequest {
    Found(ReportFoundItem),
    Lost(ReportLostItem),
}

/// Query string of `GET /items`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsParams {
    pub search: Option<String>,
    /// One status or a comma-separated list
    pub status: Option<String>,
    pub category: Option<String>,
    pub reported_by: Option<UserId>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListItemsParams {
    pub fn into_query(self) -> Result<ItemQuery, ItemError> {
        let mut query = ItemQuery::new();
        if let Some(search) = self.search {
            query = query.with_search(search);
        }
        if let Some(status) = self.status {
            let statuses = status
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<ItemStatus>)
                .collect::<Result<Vec<_>, _>>()?;
            query = query.with_statuses(statuses);
        }
        if let Some(category) = self.category {
            query = query.with_category(category);
        }
        if let Some(reporter) = self.reported_by {
            query = query.with_reporter(reporter);
        }
        query.offset = self.offset.unwrap_or(0);
        query.limit = self.limit.map(|l| l.min(MAX_PAGE_SIZE));
        Ok(query)
    }
}

/// A verification question as shown to a viewer
///
/// The expected answer is only present for the item's reporter and admins.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// Item as returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_found: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_lost: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    pub is_lost_item: bool,
    pub reported_by: UserId,
    pub reporter_name: String,
    pub reporter_contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub questions: Vec<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemResponse {
    /// Renders `item` for `viewer`, hiding expected answers from anyone
    /// who cannot review claims on it
    pub fn view(item: Item, viewer: Option<&Actor>) -> Self {
        let show_answers = viewer.is_some_and(|actor| item.is_reviewable_by(actor));
        let is_lost_item = item.is_lost_item();
        let questions = item
            .questions
            .into_iter()
            .map(|q| QuestionView {
                id: q.id,
                question: q.question,
                answer: show_answers.then_some(q.answer),
            })
            .collect();

        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            category: item.category,
            location: item.location,
            date_found: item.date_found,
            date_lost: item.date_lost,
            status: item.status,
            is_lost_item,
            reported_by: item.reported_by,
            reporter_name: item.reporter_name,
            reporter_contact: item.reporter_contact,
            image_url: item.image_url,
            questions,
            claimed_by: item.claimed_by,
            returned_date: item.returned_date,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }

    pub fn view_all(items: Vec<Item>, viewer: Option<&Actor>) -> Vec<Self> {
        items.into_iter().map(|item| Self::view(item, viewer)).collect()
    }
}

/// Body of a successful `POST /items`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItemResponse {
    pub item: ItemResponse,
    pub potential_matches: Vec<ItemResponse>,
}

impl ReportItemResponse {
    pub fn view(outcome: ReportOutcome, viewer: &Actor) -> Self {
        Self {
            item: ItemResponse::view(outcome.item, Some(viewer)),
            potential_matches: ItemResponse::view_all(outcome.potential_matches, Some(viewer)),
        }
    }
}

/// Body of `GET /items/stats`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub status_counts: StatusCounts,
    pub categories: Vec<CategoryCount>,
    pub recent_items: Vec<ItemResponse>,
}

impl StatsResponse {
    pub fn view(stats: ItemStats, viewer: Option<&Actor>) -> Self {
        Self {
            status_counts: stats.status_counts,
            categories: stats.categories,
            recent_items: ItemResponse::view_all(stats.recent_items, viewer),
        }
    }
}

/// Plain confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
