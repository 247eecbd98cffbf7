//! Item validation rules
//!
//! Derived `validator` rules catch empty fields and short question lists;
//! the hand-written checks below cover what the derives cannot express.
//!
//! # Validation Rules
//!
//! ## Found Reports
//! - Name, description, category, location and contact must not be blank
//! - At least 2 verification questions
//! - Every question needs both a prompt and an expected answer
//! - Date found must not be in the future
//!
//! ## Lost Reports
//! - Name, description, category, location and contact must not be blank
//! - Date lost must not be in the future
//!
//! ## Updates
//! - Provided text fields must not be blank
//! - A replacement question list follows the found-report question rules

use chrono::{DateTime, Utc};
use validator::{Validate, ValidationErrors};

use crate::error::ItemError;
use crate::item::{NewQuestion, ReportFoundItem, ReportLostItem, UpdateItemRequest};

/// Minimum number of verification questions on a found item
pub const MIN_QUESTIONS: usize = 2;

/// Validator for item reports and updates
///
/// Each check returns the first failing field so the caller can point
/// the reporter at it.
pub struct ItemValidator;

impl ItemValidator {
    /// Validates a found-item report
    pub fn validate_found(report: &ReportFoundItem) -> Result<(), ItemError> {
        report.validate().map_err(first_field_error)?;

        require_text("name", &report.name, "Item name is required")?;
        require_text("description", &report.description, "Description is required")?;
        require_text("category", &report.category, "Category is required")?;
        require_text("location", &report.location, "Location is required")?;
        require_text("reporterContact", &report.reporter_contact, "Contact information is required")?;
        not_in_future("dateFound", report.date_found)?;
        Self::validate_questions(&report.questions)
    }

    /// Validates a lost-item report
    pub fn validate_lost(report: &ReportLostItem) -> Result<(), ItemError> {
        report.validate().map_err(first_field_error)?;

        require_text("name", &report.name, "Item name is required")?;
        require_text("description", &report.description, "Description is required")?;
        require_text("category", &report.category, "Category is required")?;
        require_text("location", &report.location, "Last seen location is required")?;
        require_text("reporterContact", &report.reporter_contact, "Contact information is required")?;
        not_in_future("dateLost", report.date_lost)
    }

    /// Validates an update request before it is applied
    pub fn validate_update(update: &UpdateItemRequest) -> Result<(), ItemError> {
        update.validate().map_err(first_field_error)?;

        let text_fields = [
            ("name", &update.name, "Item name is required"),
            ("description", &update.description, "Description is required"),
            ("category", &update.category, "Category is required"),
            ("location", &update.location, "Location is required"),
            ("reporterName", &update.reporter_name, "Your name is required"),
            ("reporterContact", &update.reporter_contact, "Contact information is required"),
        ];
        for (field, value, message) in text_fields {
            if let Some(value) = value {
                require_text(field, value, message)?;
            }
        }

        if let Some(date) = update.date_found {
            not_in_future("dateFound", date)?;
        }
        if let Some(date) = update.date_lost {
            not_in_future("dateLost", date)?;
        }
        if let Some(questions) = &update.questions {
            Self::validate_questions(questions)?;
        }
        Ok(())
    }

    /// Validates a found item's question list
    pub fn validate_questions(questions: &[NewQuestion]) -> Result<(), ItemError> {
        if questions.len() < MIN_QUESTIONS {
            return Err(ItemError::validation_field(
                "questions",
                "At least two verification questions are required",
            ));
        }

        for (index, q) in questions.iter().enumerate() {
            if q.question.trim().is_empty() {
                return Err(ItemError::validation_field(
                    "questions",
                    format!("Question {} is missing", index + 1),
                ));
            }
            if q.answer.trim().is_empty() {
                return Err(ItemError::validation_field(
                    "questions",
                    format!("Answer to question {} is missing", index + 1),
                ));
            }
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str, message: &str) -> Result<(), ItemError> {
    if value.trim().is_empty() {
        return Err(ItemError::validation_field(field, message));
    }
    Ok(())
}

fn not_in_future(field: &str, date: DateTime<Utc>) -> Result<(), ItemError> {
    if date > Utc::now() {
        return Err(ItemError::validation_field(field, "Date cannot be in the future"));
    }
    Ok(())
}

/// Picks the first failing field (alphabetically, for stable output) from
/// a derive-generated error set
fn first_field_error(errors: ValidationErrors) -> ItemError {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (to_camel_case(&field.to_string()), message)
            })
        })
        .collect();
    fields.sort();

    match fields.into_iter().next() {
        Some((field, message)) => ItemError::validation_field(field, message),
        None => ItemError::validation("Invalid item"),
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
