//! Test Data Builders
//!
//! Builder patterns for constructing items and claim attempts with
//! sensible defaults. Tests specify only the fields they care about.
//!
//! Builders write fields directly and skip validation, so they can also
//! produce states the services would only reach after several steps
//! (a claimed item, an approved claim).

use chrono::{DateTime, Duration, Utc};

use core_kernel::{Actor, ClaimId, ItemId, UserId};
use domain_claims::{ClaimAnswer, ClaimAttempt, ClaimStatus};
use domain_items::{Item, ItemStatus, Question};

use crate::fixtures::{DateFixtures, QuestionFixtures, UserFixtures};

/// Builder for constructing test items
pub struct TestItemBuilder {
    item: Item,
}

impl TestItemBuilder {
    /// A found water bottle reported by [`UserFixtures::finder`]
    pub fn found() -> Self {
        let finder = UserFixtures::finder();
        let now = Utc::now();
        Self {
            item: Item {
                id: ItemId::new_v7(),
                name: "Water Bottle".to_string(),
                description: "Blue steel bottle with stickers".to_string(),
                category: "Personal Items".to_string(),
                location: "Library, 2nd floor".to_string(),
                date_found: Some(DateFixtures::found_date()),
                date_lost: None,
                status: ItemStatus::Found,
                reported_by: finder.user_id,
                reporter_name: finder.display_name,
                reporter_contact: "jane.smith@campus.edu".to_string(),
                image_url: None,
                questions: QuestionFixtures::stored_bottle_questions(),
                claimed_by: None,
                returned_date: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    /// A lost bottle reported by [`UserFixtures::owner`]
    pub fn lost() -> Self {
        let owner = UserFixtures::owner();
        let mut builder = Self::found();
        builder.item.name = "Bottle".to_string();
        builder.item.description = "Lost near the library".to_string();
        builder.item.location = "Library".to_string();
        builder.item.date_found = None;
        builder.item.date_lost = Some(DateFixtures::lost_date());
        builder.item.status = ItemStatus::Lost;
        builder.item.reported_by = owner.user_id;
        builder.item.reporter_name = owner.display_name;
        builder.item.reporter_contact = "mike.jones@campus.edu".to_string();
        builder.item.questions = Vec::new();
        builder
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.item.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.item.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.item.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.item.category = category.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.item.location = location.into();
        self
    }

    pub fn with_reporter(mut self, reporter: &Actor) -> Self {
        self.item.reported_by = reporter.user_id;
        self.item.reporter_name = reporter.display_name.clone();
        self
    }

    /// Replaces the questions with `(question, answer)` pairs
    pub fn with_questions(mut self, questions: &[(&str, &str)]) -> Self {
        self.item.questions = questions.iter().map(|(q, a)| Question::new(*q, *a)).collect();
        self
    }

    /// Sets the status without checking the transition
    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.item.status = status;
        self
    }

    /// Marks the item claimed by `claimant`
    pub fn claimed_by(mut self, claimant: UserId) -> Self {
        self.item.status = ItemStatus::Claimed;
        self.item.claimed_by = Some(claimant);
        self
    }

    /// Sets the creation time
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.item.created_at = at;
        self.item.updated_at = at;
        self
    }

    /// Sets the creation time to `minutes` before now
    pub fn minutes_ago(self, minutes: i64) -> Self {
        self.created_at(Utc::now() - Duration::minutes(minutes))
    }

    pub fn build(self) -> Item {
        self.item
    }
}

/// Builder for constructing test claim attempts
pub struct TestClaimBuilder {
    claim: ClaimAttempt,
}

impl TestClaimBuilder {
    /// A pending claim by [`UserFixtures::owner`] answering every question
    /// of `item` correctly
    pub fn for_item(item: &Item) -> Self {
        let answers = item
            .questions
            .iter()
            .map(|q| ClaimAnswer::new(q.id, q.answer.clone()))
            .collect();
        Self {
            claim: ClaimAttempt::submit(item.id, &UserFixtures::owner(), answers),
        }
    }

    pub fn with_id(mut self, id: ClaimId) -> Self {
        self.claim.id = id;
        self
    }

    pub fn with_claimant(mut self, claimant: &Actor) -> Self {
        self.claim.claimant_id = claimant.user_id;
        self.claim.claimant_name = claimant.display_name.clone();
        self
    }

    /// Replaces the answers, in question order
    pub fn with_answers(mut self, item: &Item, answers: &[&str]) -> Self {
        self.claim.answers = item
            .questions
            .iter()
            .zip(answers)
            .map(|(q, a)| ClaimAnswer::new(q.id, *a))
            .collect();
        self
    }

    /// Sets the status without checking the transition
    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.claim.status = status;
        self
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.claim.reporter_response = Some(response.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.claim.created_at = at;
        self.claim.updated_at = at;
        self
    }

    pub fn build(self) -> ClaimAttempt {
        self.claim
    }
}
