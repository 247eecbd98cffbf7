//! Property-Based Test Generators
//!
//! Proptest strategies for statuses, categories and answer spellings,
//! plus `fake`-backed report generators for bulk data.

use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use proptest::prelude::*;

use domain_items::{ItemStatus, NewQuestion, ReportFoundItem, ReportLostItem};

/// Categories offered by the reporting form
pub const CATEGORIES: [&str; 6] = [
    "Electronics",
    "Personal Items",
    "Clothing",
    "Accessories",
    "Books",
    "Keys",
];

/// Strategy for any item status
pub fn item_status_strategy() -> impl Strategy<Value = ItemStatus> {
    proptest::sample::select(ItemStatus::ALL.to_vec())
}

/// Strategy for a category from [`CATEGORIES`]
pub fn category_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(CATEGORIES.to_vec())
}

/// Strategy for a non-blank answer made of letters and inner spaces
pub fn answer_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,18}[a-zA-Z]"
}

/// Strategy for spellings of `answer` that verification must accept:
/// any letter case with any surrounding whitespace
pub fn equivalent_answer_strategy(answer: String) -> impl Strategy<Value = String> {
    let len = answer.chars().count();
    (
        proptest::collection::vec(any::<bool>(), len),
        "[ \t]{0,3}",
        "[ \t]{0,3}",
    )
        .prop_map(move |(upper, lead, trail)| {
            let body: String = answer
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect();
            format!("{lead}{body}{trail}")
        })
}

/// A random found report that passes validation
pub fn fake_found_report() -> ReportFoundItem {
    let name: String = Word().fake();
    ReportFoundItem {
        name,
        description: Sentence(3..8).fake(),
        category: CATEGORIES[(0..CATEGORIES.len()).fake::<usize>()].to_string(),
        location: Sentence(1..3).fake(),
        date_found: Utc::now() - Duration::hours((1..240).fake::<i64>()),
        reporter_name: None,
        reporter_contact: SafeEmail().fake(),
        image_url: None,
        questions: vec![fake_question(), fake_question()],
    }
}

/// A random lost report that passes validation
pub fn fake_lost_report() -> ReportLostItem {
    ReportLostItem {
        name: Word().fake(),
        description: Sentence(3..8).fake(),
        category: CATEGORIES[(0..CATEGORIES.len()).fake::<usize>()].to_string(),
        location: Sentence(1..3).fake(),
        date_lost: Utc::now() - Duration::hours((1..240).fake::<i64>()),
        reporter_name: None,
        reporter_contact: SafeEmail().fake(),
        image_url: None,
    }
}

fn fake_question() -> NewQuestion {
    let question: String = Sentence(3..6).fake();
    NewQuestion {
        question: format!("{}?", question.trim_end_matches('.')),
        answer: Word().fake(),
    }
}
