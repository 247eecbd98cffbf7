//! Item aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::{Actor, ItemId, QuestionId, UserId};
use crate::error::ItemError;

/// Item status
///
/// The single source of truth for whether an item was reported lost or
/// found. Transitions are monotonic along `Found -> Claimed -> Returned`
/// and `Lost -> Matched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Turned in and waiting for its owner
    Found,
    /// Reported missing by its owner
    Lost,
    /// A claim was approved; waiting for hand-over
    Claimed,
    /// A lost report was paired with its found counterpart
    Matched,
    /// Handed back to the owner
    Returned,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 5] = [
        ItemStatus::Found,
        ItemStatus::Lost,
        ItemStatus::Claimed,
        ItemStatus::Matched,
        ItemStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Found => "found",
            ItemStatus::Lost => "lost",
            ItemStatus::Claimed => "claimed",
            ItemStatus::Matched => "matched",
            ItemStatus::Returned => "returned",
        }
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ItemStatus) -> bool {
        use ItemStatus::*;
        matches!(
            (self, target),
            (Found, Claimed) | (Claimed, Returned) | (Lost, Matched)
        )
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ItemError::validation_field("status", format!("Unknown item status '{}'", s)))
    }
}

/// Which pool an item belongs to, derived from its status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Found,
    Lost,
}

impl ItemKind {
    /// Status of the items this kind is matched against
    pub fn counterpart_status(&self) -> ItemStatus {
        match self {
            ItemKind::Found => ItemStatus::Lost,
            ItemKind::Lost => ItemStatus::Found,
        }
    }
}

/// A reporter-authored verification question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Prompt shown to claimants
    pub question: String,
    /// Expected answer, compared trimmed and case-insensitively
    pub answer: String,
}

impl Question {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new_v7(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Question as submitted by a reporter, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
}

impl From<NewQuestion> for Question {
    fn from(q: NewQuestion) -> Self {
        Question::new(q.question.trim(), q.answer.trim())
    }
}

/// A reported found or lost item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_found: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_lost: Option<DateTime<Utc>>,
    pub status: ItemStatus,
    pub reported_by: UserId,
    pub reporter_name: String,
    pub reporter_contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Creates a found item from a validated report
    pub fn found(request: ReportFoundItem, reporter: &Actor) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new_v7(),
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            category: request.category.trim().to_string(),
            location: request.location.trim().to_string(),
            date_found: Some(request.date_found),
            date_lost: None,
            status: ItemStatus::Found,
            reported_by: reporter.user_id,
            reporter_name: reporter_name_or_default(request.reporter_name, reporter),
            reporter_contact: request.reporter_contact.trim().to_string(),
            image_url: non_blank(request.image_url),
            questions: request.questions.into_iter().map(Question::from).collect(),
            claimed_by: None,
            returned_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a lost item from a validated report
    pub fn lost(request: ReportLostItem, reporter: &Actor) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new_v7(),
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            category: request.category.trim().to_string(),
            location: request.location.trim().to_string(),
            date_found: None,
            date_lost: Some(request.date_lost),
            status: ItemStatus::Lost,
            reported_by: reporter.user_id,
            reporter_name: reporter_name_or_default(request.reporter_name, reporter),
            reporter_contact: request.reporter_contact.trim().to_string(),
            image_url: non_blank(request.image_url),
            questions: Vec::new(),
            claimed_by: None,
            returned_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Which pool the item belongs to
    pub fn kind(&self) -> ItemKind {
        match self.status {
            ItemStatus::Lost | ItemStatus::Matched => ItemKind::Lost,
            ItemStatus::Found | ItemStatus::Claimed | ItemStatus::Returned => ItemKind::Found,
        }
    }

    /// Derived view of the legacy "is lost item" flag; never stored
    pub fn is_lost_item(&self) -> bool {
        self.kind() == ItemKind::Lost
    }

    /// Date the item was found or lost, whichever applies
    pub fn event_date(&self) -> Option<DateTime<Utc>> {
        self.date_found.or(self.date_lost)
    }

    /// True if `actor` may edit, delete or review claims on this item
    pub fn is_reviewable_by(&self, actor: &Actor) -> bool {
        actor.owns_or_admin(self.reported_by)
    }

    /// Binds the item to an approved claimant
    pub fn mark_claimed(&mut self, claimant: UserId) -> Result<(), ItemError> {
        self.transition_to(ItemStatus::Claimed)?;
        self.claimed_by = Some(claimant);
        Ok(())
    }

    /// Records the hand-over to the claimant
    pub fn mark_returned(&mut self) -> Result<(), ItemError> {
        self.transition_to(ItemStatus::Returned)?;
        self.returned_date = Some(self.updated_at);
        Ok(())
    }

    /// Marks a lost report as paired with its found counterpart
    pub fn mark_matched(&mut self) -> Result<(), ItemError> {
        self.transition_to(ItemStatus::Matched)
    }

    /// Applies an allow-listed update. Status and ownership are not writable.
    pub fn apply_update(&mut self, update: UpdateItemRequest) -> Result<(), ItemError> {
        match self.kind() {
            ItemKind::Found if update.date_lost.is_some() => {
                return Err(ItemError::validation_field("dateLost", "Found items have no date lost"));
            }
            ItemKind::Lost if update.date_found.is_some() => {
                return Err(ItemError::validation_field("dateFound", "Lost items have no date found"));
            }
            ItemKind::Lost if update.questions.is_some() => {
                return Err(ItemError::validation_field(
                    "questions",
                    "Lost items do not carry verification questions",
                ));
            }
            _ => {}
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = update.category {
            self.category = category.trim().to_string();
        }
        if let Some(location) = update.location {
            self.location = location.trim().to_string();
        }
        if let Some(date) = update.date_found {
            self.date_found = Some(date);
        }
        if let Some(date) = update.date_lost {
            self.date_lost = Some(date);
        }
        if let Some(image_url) = update.image_url {
            // An empty string clears the image
            self.image_url = non_blank(Some(image_url));
        }
        if let Some(reporter_name) = update.reporter_name {
            self.reporter_name = reporter_name.trim().to_string();
        }
        if let Some(reporter_contact) = update.reporter_contact {
            self.reporter_contact = reporter_contact.trim().to_string();
        }
        if let Some(questions) = update.questions {
            self.questions = questions.into_iter().map(Question::from).collect();
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn transition_to(&mut self, target: ItemStatus) -> Result<(), ItemError> {
        if !self.status.can_transition_to(target) {
            return Err(ItemError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Report of a found item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportFoundItem {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub date_found: DateTime<Utc>,
    /// Defaults to the reporter's display name
    #[serde(default)]
    pub reporter_name: Option<String>,
    #[validate(length(min = 1, message = "Contact information is required"))]
    pub reporter_contact: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[validate(length(min = 2, message = "At least two verification questions are required"))]
    pub questions: Vec<NewQuestion>,
}

/// Report of a lost item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportLostItem {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Last seen location is required"))]
    pub location: String,
    pub date_lost: DateTime<Utc>,
    #[serde(default)]
    pub reporter_name: Option<String>,
    #[validate(length(min = 1, message = "Contact information is required"))]
    pub reporter_contact: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Allow-listed fields a reporter or admin may change on an item
///
/// Unknown fields are refused at deserialization, so status, ownership
/// and claim bindings can only change through their dedicated operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: Option<String>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,
    pub date_found: Option<DateTime<Utc>>,
    pub date_lost: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    #[validate(length(min = 1, message = "Your name is required"))]
    pub reporter_name: Option<String>,
    #[validate(length(min = 1, message = "Contact information is required"))]
    pub reporter_contact: Option<String>,
    #[validate(length(min = 2, message = "At least two verification questions are required"))]
    pub questions: Option<Vec<NewQuestion>>,
}

fn reporter_name_or_default(name: Option<String>, reporter: &Actor) -> String {
    non_blank(name).unwrap_or_else(|| reporter.display_name.clone())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
