// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod ranker;

pub use distance::{calculate_bounding_box, distance_km, haversine_distance, is_within_bounding_box};
pub use filters::{filter_by_category, is_all_selector, matches_category, ALL_CATEGORIES};
pub use ranker::{rank_places, RankOptions, RankResult, Ranker};
