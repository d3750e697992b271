//! Category names and the two sentinel categories used by analytics.

/// Sentinel budget category aggregating spending across all categories.
pub const OVERALL_CATEGORY: &str = "Overall";

/// Bucket for expenses recorded without a category.
pub const OTHER_CATEGORY: &str = "Other";

/// Stock expense categories offered by the tracker UI. Free-form names are
/// accepted everywhere; this list only seeds pickers.
pub const DEFAULT_CATEGORIES: [&str; 12] = [
    "Eating Out",
    "Groceries",
    "Alcohol",
    "Uber",
    "Gambling",
    "Car",
    "Home Essentials",
    "Clothing",
    "Events",
    "Travel",
    "Rent",
    "Misc.",
];

/// Returns true when the name is one of the stock expense categories.
pub fn is_default_category(name: &str) -> bool {
    DEFAULT_CATEGORIES.contains(&name)
}

/// Maps an optional category to its aggregation bucket.
pub fn effective_category(category: Option<&str>) -> &str {
    match category {
        Some(name) if !name.trim().is_empty() => name,
        _ => OTHER_CATEGORY,
    }
}
