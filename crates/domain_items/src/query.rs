//! Listing filters and dashboard statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::UserId;
use crate::item::{Item, ItemStatus};

/// Number of items shown in the dashboard's "recent" list
pub const RECENT_ITEMS: usize = 5;

/// Filter for item listings
///
/// Every field is optional; an empty query lists all items newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Case-insensitive substring over name, description, category, location
    pub search: Option<String>,
    /// Accepted statuses; empty accepts all
    pub statuses: Vec<ItemStatus>,
    /// Case-insensitive category equality
    pub category: Option<String>,
    pub reported_by: Option<UserId>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items currently reported lost
    pub fn lost() -> Self {
        Self::new().with_statuses([ItemStatus::Lost])
    }

    /// Items in the found pool, including those claimed or returned
    pub fn found() -> Self {
        Self::new().with_statuses([ItemStatus::Found, ItemStatus::Claimed, ItemStatus::Returned])
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ItemStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_reporter(mut self, reporter: UserId) -> Self {
        self.reported_by = Some(reporter);
        self
    }

    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    /// True if `item` passes every filter (pagination aside)
    pub fn matches(&self, item: &Item) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&item.status) {
            return false;
        }
        if let Some(reporter) = self.reported_by {
            if item.reported_by != reporter {
                return false;
            }
        }
        if let Some(category) = non_blank(self.category.as_deref()) {
            if item.category.trim().to_lowercase() != category.to_lowercase() {
                return false;
            }
        }
        if let Some(search) = non_blank(self.search.as_deref()) {
            let needle = search.to_lowercase();
            let hit = [&item.name, &item.description, &item.category, &item.location]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// Filters, sorts newest first, then paginates
    pub fn apply<'a, I>(&self, items: I) -> Vec<Item>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut selected: Vec<Item> = items
            .into_iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect();
        sort_newest_first(&mut selected);

        selected
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Sorts by creation time, newest first; ties broken by id for stable output
pub fn sort_newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Item counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub found: usize,
    pub lost: usize,
    pub claimed: usize,
    pub matched: usize,
    pub returned: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ItemStatus) {
        self.total += 1;
        match status {
            ItemStatus::Found => self.found += 1,
            ItemStatus::Lost => self.lost += 1,
            ItemStatus::Claimed => self.claimed += 1,
            ItemStatus::Matched => self.matched += 1,
            ItemStatus::Returned => self.returned += 1,
        }
    }

    pub fn get(&self, status: ItemStatus) -> usize {
        match status {
            ItemStatus::Found => self.found,
            ItemStatus::Lost => self.lost,
            ItemStatus::Claimed => self.claimed,
            ItemStatus::Matched => self.matched,
            ItemStatus::Returned => self.returned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Dashboard statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub status_counts: StatusCounts,
    /// Sorted by count descending, then category name
    pub categories: Vec<CategoryCount>,
    pub recent_items: Vec<Item>,
}

impl ItemStats {
    pub fn compute<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut status_counts = StatusCounts::default();
        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut all = Vec::new();

        for item in items {
            status_counts.record(item.status);
            *by_category.entry(item.category.trim().to_string()).or_default() += 1;
            all.push(item.clone());
        }

        let mut categories: Vec<CategoryCount> = by_category
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

        sort_newest_first(&mut all);
        all.truncate(RECENT_ITEMS);

        Self {
            status_counts,
            categories,
            recent_items: all,
        }
    }
}
