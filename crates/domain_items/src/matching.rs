//! Lost/found matching heuristic
//!
//! A newly reported item is compared against the opposite pool: found
//! items when the new item is lost, lost items when it is found. Two items
//! are a potential match when any of the following hold:
//!
//! - either name contains the other (case-insensitive)
//! - categories are equal (case-insensitive)
//! - both descriptions are non-empty and either contains the other
//!
//! There is no scoring. Candidates come back in pool order. This is a
//! crude heuristic and will produce false positives for broad categories.

use crate::item::Item;

/// Returns the items in `pool` that plausibly pair with `item`
///
/// Only items in the counterpart status are considered, and `item` never
/// matches itself.
pub fn check_for_matches<'a, I>(item: &Item, pool: I) -> Vec<Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let counterpart = item.kind().counterpart_status();
    pool.into_iter()
        .filter(|candidate| candidate.id != item.id)
        .filter(|candidate| candidate.status == counterpart)
        .filter(|candidate| is_potential_match(item, candidate))
        .cloned()
        .collect()
}

/// Symmetric field-overlap test between two items
pub fn is_potential_match(a: &Item, b: &Item) -> bool {
    names_overlap(&a.name, &b.name)
        || categories_equal(&a.category, &b.category)
        || descriptions_overlap(&a.description, &b.description)
}

fn names_overlap(a: &str, b: &str) -> bool {
    contains_either(a, b)
}

fn categories_equal(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && !b.is_empty() && a.to_lowercase() == b.to_lowercase()
}

fn descriptions_overlap(a: &str, b: &str) -> bool {
    contains_either(a, b)
}

// Blank text never matches; otherwise a substring test in both directions
fn contains_either(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_either_direction() {
        assert!(contains_either("Water Bottle", "bottle"));
        assert!(contains_either("bottle", "Water Bottle"));
        assert!(!contains_either("Laptop", "Bottle"));
    }

    #[test]
    fn test_blank_text_never_matches() {
        assert!(!contains_either("", "Bottle"));
        assert!(!contains_either("  ", "  "));
        assert!(!categories_equal("", ""));
    }

    #[test]
    fn test_category_is_exact() {
        assert!(categories_equal("Electronics", "electronics "));
        assert!(!categories_equal("Electronics", "Electronic"));
    }
}
