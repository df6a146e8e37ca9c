use crate::core::{
    distance::{calculate_bounding_box, distance_km, is_within_bounding_box},
    filters::matches_category,
};
use crate::models::{Coordinate, Place, RankedPlace};

/// Result of a ranking request
#[derive(Debug)]
pub struct RankResult {
    pub places: Vec<RankedPlace>,
    pub total_places: usize,
}

/// Optional constraints applied on top of the plain distance ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions {
    pub max_distance_km: Option<f64>,
    pub limit: Option<usize>,
}

/// Compute distance-to-origin for every place and sort ascending.
///
/// The sort is stable: places at equal distance keep their input order, which
/// is the documented tie-breaking contract. An empty input yields an empty
/// output; the operation never fails for validated coordinates.
pub fn rank_places(places: Vec<Place>, origin: Coordinate) -> Vec<RankedPlace> {
    let mut ranked: Vec<RankedPlace> = places
        .into_iter()
        .map(|place| {
            let d = distance_km(
                origin,
                Coordinate {
                    latitude: place.latitude,
                    longitude: place.longitude,
                },
            );
            RankedPlace::from_place(place, d)
        })
        .collect();

    // Vec::sort_by is stable, so equal distances retain input order
    ranked.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}

/// Proximity ranking orchestrator
///
/// # Pipeline stages
/// 1. Category filter
/// 2. Bounding box pre-filter (only when a radius is requested)
/// 3. Exact haversine distance + radius check
/// 4. Stable ascending sort and limit
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    max_limit: usize,
}

impl Ranker {
    pub fn new(max_limit: usize) -> Self {
        Self { max_limit }
    }

    pub fn with_defaults() -> Self {
        Self { max_limit: 100 }
    }

    /// Rank the places matching `category` by distance from `origin`.
    ///
    /// With no options this reproduces the plain filter-then-rank behavior:
    /// every matching place comes back, ordered ascending by distance. A
    /// requested `limit` is capped at the configured maximum.
    pub fn rank_nearby(
        &self,
        places: Vec<Place>,
        origin: Coordinate,
        category: &str,
        options: RankOptions,
    ) -> RankResult {
        let total_places = places.len();

        let bbox = options
            .max_distance_km
            .map(|radius| calculate_bounding_box(origin.latitude, origin.longitude, radius));

        let candidates: Vec<Place> = places
            .into_iter()
            .filter(|place| matches_category(place, category))
            .filter(|place| match &bbox {
                Some(bbox) => is_within_bounding_box(place.latitude, place.longitude, bbox),
                None => true,
            })
            .collect();

        let mut ranked = rank_places(candidates, origin);

        // The bounding box overshoots at its corners, so re-check the radius
        // against the exact distance
        if let Some(radius) = options.max_distance_km {
            ranked.retain(|place| place.distance_km <= radius);
        }

        if let Some(limit) = options.limit {
            ranked.truncate(limit.min(self.max_limit));
        }

        RankResult {
            places: ranked,
            total_places,
        }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_place(name: &str, category: &str, lat: f64, lon: f64) -> Place {
        Place {
            name: name.to_string(),
            description: format!("{} description", name),
            image: format!("https://static.aricago.cl/img/{}.jpg", name),
            category: category.to_string(),
            latitude: lat,
            longitude: lon,
        }
    }

    fn user_origin() -> Coordinate {
        // Default dashboard position, a few blocks from the Arica center
        Coordinate::new(-18.478, -70.312).unwrap()
    }

    #[test]
    fn test_rank_orders_by_ascending_distance() {
        let places = vec![
            create_place("Lago Chungará", "naturaleza", -18.25, -69.1667),
            create_place("Morro de Arica", "miradores", -18.4821, -70.3238),
            create_place("Museo de Azapa", "museos", -18.5166, -70.183),
        ];

        let ranked = rank_places(places, user_origin());

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].name, "Morro de Arica");
        assert_eq!(ranked[2].name, "Lago Chungará");
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    #[test]
    fn test_rank_returns_a_permutation() {
        let places = vec![
            create_place("A", "playas", -18.46, -70.30),
            create_place("B", "playas", -18.49, -70.32),
            create_place("C", "museos", -18.52, -70.18),
        ];
        let mut input_names: Vec<String> = places.iter().map(|p| p.name.clone()).collect();

        let ranked = rank_places(places, user_origin());
        let mut output_names: Vec<String> = ranked.iter().map(|p| p.name.clone()).collect();

        input_names.sort();
        output_names.sort();
        assert_eq!(input_names, output_names);
    }

    #[test]
    fn test_rank_empty_input_yields_empty_output() {
        let ranked = rank_places(vec![], user_origin());
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        // Same coordinates, so identical distance; stable sort must keep
        // the input order
        let places = vec![
            create_place("First", "playas", -18.4614, -70.306),
            create_place("Second", "playas", -18.4614, -70.306),
            create_place("Third", "playas", -18.4614, -70.306),
        ];

        let ranked = rank_places(places, user_origin());

        assert_eq!(ranked[0].name, "First");
        assert_eq!(ranked[1].name, "Second");
        assert_eq!(ranked[2].name, "Third");
    }

    #[test]
    fn test_rank_nearby_filters_category_before_ranking() {
        let ranker = Ranker::with_defaults();
        let places = vec![
            create_place("Playa Chinchorro", "playas", -18.4614, -70.306),
            create_place("Morro de Arica", "miradores", -18.4821, -70.3238),
            create_place("Playa La Lisera", "playas", -18.4929, -70.3244),
        ];

        let result = ranker.rank_nearby(places, user_origin(), "playas", RankOptions::default());

        assert_eq!(result.total_places, 3);
        assert_eq!(result.places.len(), 2);
        assert!(result.places.iter().all(|p| p.category == "playas"));
    }

    #[test]
    fn test_rank_nearby_radius_drops_distant_places() {
        let ranker = Ranker::with_defaults();
        let places = vec![
            create_place("Morro de Arica", "miradores", -18.4821, -70.3238),
            create_place("Lago Chungará", "naturaleza", -18.25, -69.1667),
        ];

        let options = RankOptions {
            max_distance_km: Some(20.0),
            limit: None,
        };
        let result = ranker.rank_nearby(places, user_origin(), "all", options);

        assert_eq!(result.places.len(), 1);
        assert_eq!(result.places[0].name, "Morro de Arica");
    }

    #[test]
    fn test_rank_nearby_caps_limit() {
        let ranker = Ranker::new(5);
        let places: Vec<Place> = (0..20)
            .map(|i| {
                create_place(
                    &format!("Place {}", i),
                    "playas",
                    -18.46 - (i as f64) * 0.001,
                    -70.30,
                )
            })
            .collect();

        let options = RankOptions {
            max_distance_km: None,
            limit: Some(50),
        };
        let result = ranker.rank_nearby(places, user_origin(), "all", options);

        assert_eq!(result.places.len(), 5);
    }

    #[test]
    fn test_rank_nearby_without_limit_returns_all_matches() {
        let ranker = Ranker::new(5);
        let places: Vec<Place> = (0..20)
            .map(|i| {
                create_place(
                    &format!("Place {}", i),
                    "playas",
                    -18.46 - (i as f64) * 0.001,
                    -70.30,
                )
            })
            .collect();

        let result = ranker.rank_nearby(places, user_origin(), "all", RankOptions::default());

        assert_eq!(result.places.len(), 20);
    }
}
