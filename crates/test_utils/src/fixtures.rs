//! Pre-built Test Fixtures
//!
//! Ready-to-use users, dates and reports for the lost-and-found domain.
//! Values are fixed so tests stay predictable.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use core_kernel::{Actor, UserId, UserRole};
use domain_items::{NewQuestion, Question, ReportFoundItem, ReportLostItem};

/// Fixture for the people involved in a report
pub struct UserFixtures;

impl UserFixtures {
    /// Administrator who may review and return anything
    pub fn admin() -> Actor {
        Actor::new(UserId::from_uuid(Uuid::from_u128(1)), "John Doe", UserRole::Admin)
    }

    /// User who turned an item in
    pub fn finder() -> Actor {
        Actor::new(UserId::from_uuid(Uuid::from_u128(2)), "Jane Smith", UserRole::User)
    }

    /// User who lost an item and claims it
    pub fn owner() -> Actor {
        Actor::new(UserId::from_uuid(Uuid::from_u128(3)), "Mike Jones", UserRole::User)
    }

    /// A second claimant competing for the same item
    pub fn rival() -> Actor {
        Actor::new(UserId::from_uuid(Uuid::from_u128(4)), "Priya Sharma", UserRole::User)
    }
}

/// Fixture for report dates
pub struct DateFixtures;

impl DateFixtures {
    /// When the standard item was turned in (Mar 1, 2024)
    pub fn found_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    /// When the standard item went missing (Feb 29, 2024)
    pub fn lost_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 18, 0, 0).unwrap()
    }

    /// Well in the past, for ordering tests
    pub fn semester_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap()
    }
}

/// Fixture for verification questions
pub struct QuestionFixtures;

impl QuestionFixtures {
    /// Questions as a reporter submits them
    pub fn bottle_questions() -> Vec<NewQuestion> {
        vec![
            NewQuestion {
                question: "What color is it?".to_string(),
                answer: "Blue".to_string(),
            },
            NewQuestion {
                question: "What sticker is on it?".to_string(),
                answer: "Cat".to_string(),
            },
        ]
    }

    /// Stored questions with ids assigned
    pub fn stored_bottle_questions() -> Vec<Question> {
        Self::bottle_questions().into_iter().map(Question::from).collect()
    }

    /// Correct answers to [`Self::bottle_questions`], in order
    pub fn bottle_answers() -> [&'static str; 2] {
        ["Blue", "Cat"]
    }
}

/// Fixture for complete reports
pub struct ReportFixtures;

impl ReportFixtures {
    /// The standard found water bottle
    pub fn found_bottle() -> ReportFoundItem {
        ReportFoundItem {
            name: "Water Bottle".to_string(),
            description: "Blue steel bottle with stickers".to_string(),
            category: "Personal Items".to_string(),
            location: "Library, 2nd floor".to_string(),
            date_found: DateFixtures::found_date(),
            reporter_name: None,
            reporter_contact: "jane.smith@campus.edu".to_string(),
            image_url: None,
            questions: QuestionFixtures::bottle_questions(),
        }
    }

    /// A lost report that matches [`Self::found_bottle`]
    pub fn lost_bottle() -> ReportLostItem {
        ReportLostItem {
            name: "Bottle".to_string(),
            description: "Lost near the library".to_string(),
            category: "Personal Items".to_string(),
            location: "Library".to_string(),
            date_lost: DateFixtures::lost_date(),
            reporter_name: None,
            reporter_contact: "mike.jones@campus.edu".to_string(),
            image_url: None,
        }
    }

    /// A lost report that matches nothing in the standard fixtures
    pub fn lost_umbrella() -> ReportLostItem {
        ReportLostItem {
            name: "Umbrella".to_string(),
            description: "Black folding umbrella".to_string(),
            category: "Accessories".to_string(),
            location: "Cafeteria".to_string(),
            date_lost: DateFixtures::lost_date(),
            reporter_name: Some("Mike".to_string()),
            reporter_contact: "mike.jones@campus.edu".to_string(),
            image_url: None,
        }
    }
}
