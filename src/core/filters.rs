use crate::models::Place;

/// Selector value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Legacy selector kept for clients of the original dashboard.
const ALL_CATEGORIES_LEGACY: &str = "todas";

/// Check whether a selector means "no category filter"
#[inline]
pub fn is_all_selector(selector: &str) -> bool {
    selector.eq_ignore_ascii_case(ALL_CATEGORIES) || selector.eq_ignore_ascii_case(ALL_CATEGORIES_LEGACY)
}

/// Check if a place matches the requested category selector
///
/// The comparison is case-insensitive; the "all" selector matches everything.
#[inline]
pub fn matches_category(place: &Place, selector: &str) -> bool {
    is_all_selector(selector) || place.category.eq_ignore_ascii_case(selector)
}

/// Return the places whose category matches the selector, preserving the
/// original relative order.
///
/// An unknown category yields an empty result, never an error.
pub fn filter_by_category(places: Vec<Place>, selector: &str) -> Vec<Place> {
    if is_all_selector(selector) {
        return places;
    }

    places
        .into_iter()
        .filter(|place| matches_category(place, selector))
        .collect()
}
