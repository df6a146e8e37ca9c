use crate::models::{CoordinateError, Place};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading the place dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid coordinate for \"{name}\" (row {row}): {source}")]
    InvalidCoordinate {
        row: usize,
        name: String,
        source: CoordinateError,
    },

    #[error("dataset contains no places")]
    Empty,
}

/// One row of the legacy CSV data file
///
/// The column headers are those of the original `lugares.csv` shipped with
/// the dashboard, so the data file can be reused as-is.
#[derive(Debug, Deserialize)]
struct PlaceRecord {
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "descripcion")]
    description: String,
    #[serde(rename = "imagen")]
    image: String,
    #[serde(rename = "categoria")]
    category: String,
    lat: f64,
    lon: f64,
}

/// Immutable in-memory store of every point of interest
///
/// Loaded once per process lifetime, before the server starts accepting
/// requests. Rows with out-of-range coordinates fail the load: the dataset
/// ships with the binary, so a bad row is a packaging error, not a runtime
/// condition.
#[derive(Debug, Clone)]
pub struct PlaceStore {
    places: Vec<Place>,
    categories: Vec<String>,
}

impl PlaceStore {
    /// Load the store from a CSV file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load the store from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut places = Vec::new();

        for (index, record) in csv_reader.deserialize::<PlaceRecord>().enumerate() {
            let record = record?;

            if let Err(source) = crate::models::Coordinate::new(record.lat, record.lon) {
                return Err(DatasetError::InvalidCoordinate {
                    // Header is row 1, first record row 2
                    row: index + 2,
                    name: record.name,
                    source,
                });
            }

            places.push(Place {
                name: record.name,
                description: record.description,
                image: record.image,
                category: record.category,
                latitude: record.lat,
                longitude: record.lon,
            });
        }

        if places.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Self::from_places(places))
    }

    /// Build a store directly from places (used by tests)
    pub fn from_places(places: Vec<Place>) -> Self {
        let mut categories: Vec<String> = places.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();

        Self { places, categories }
    }

    /// Every place, in dataset order
    pub fn all(&self) -> &[Place] {
        &self.places
    }

    /// The first `n` places, shown as the dashboard's featured strip
    pub fn featured(&self, n: usize) -> &[Place] {
        &self.places[..n.min(self.places.len())]
    }

    /// Sorted unique category names
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
nombre,descripcion,imagen,categoria,lat,lon
Morro de Arica,Mirador histórico sobre la ciudad,https://static.aricago.cl/img/morro.jpg,miradores,-18.4821,-70.3238
Playa Chinchorro,Playa urbana de arena suave,https://static.aricago.cl/img/chinchorro.jpg,playas,-18.4614,-70.3060
Museo de Azapa,Museo arqueológico con momias Chinchorro,https://static.aricago.cl/img/azapa.jpg,museos,-18.5166,-70.1830
";

    #[test]
    fn test_load_from_csv() {
        let store = PlaceStore::from_reader(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.all()[0].name, "Morro de Arica");
        assert_eq!(store.all()[0].category, "miradores");
        assert!((store.all()[1].latitude - (-18.4614)).abs() < 1e-9);
    }

    #[test]
    fn test_categories_are_sorted_and_unique() {
        let csv = "\
nombre,descripcion,imagen,categoria,lat,lon
A,d,i,playas,-18.46,-70.30
B,d,i,museos,-18.51,-70.18
C,d,i,playas,-18.49,-70.32
";
        let store = PlaceStore::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(store.categories(), &["museos".to_string(), "playas".to_string()]);
    }

    #[test]
    fn test_featured_returns_leading_places() {
        let store = PlaceStore::from_reader(SAMPLE_CSV.as_bytes()).unwrap();

        let featured = store.featured(2);
        assert_eq!(featured.len(), 2);
        assert_eq!(featured[0].name, "Morro de Arica");

        // Asking for more than exists is not an error
        assert_eq!(store.featured(10).len(), 3);
    }

    #[test]
    fn test_out_of_range_coordinate_fails_load() {
        let csv = "\
nombre,descripcion,imagen,categoria,lat,lon
Bad,d,i,playas,-95.0,-70.30
";
        let err = PlaceStore::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            DatasetError::InvalidCoordinate { row, name, .. } => {
                assert_eq!(row, 2);
                assert_eq!(name, "Bad");
            }
            other => panic!("expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let csv = "nombre,descripcion,imagen,categoria,lat,lon\n";
        assert!(matches!(
            PlaceStore::from_reader(csv.as_bytes()),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn test_malformed_float_is_an_error() {
        let csv = "\
nombre,descripcion,imagen,categoria,lat,lon
Bad,d,i,playas,not-a-number,-70.30
";
        assert!(matches!(
            PlaceStore::from_reader(csv.as_bytes()),
            Err(DatasetError::Csv(_))
        ));
    }
}
