use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to rank places around a user coordinate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearbyRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    #[serde(alias = "max_distance_km", rename = "maxDistanceKm")]
    pub max_distance_km: Option<f64>,
}

fn default_category() -> String {
    "all".to_string()
}

/// Request to convert a currency amount
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConvertRequest {
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[validate(length(min = 3, max = 3))]
    pub from: String,
    #[validate(length(min = 3, max = 3))]
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_request_defaults() {
        let req: NearbyRequest =
            serde_json::from_str(r#"{"latitude": -18.478, "longitude": -70.312}"#).unwrap();

        assert_eq!(req.category, "all");
        assert_eq!(req.limit, None);
        assert_eq!(req.max_distance_km, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_nearby_request_rejects_bad_latitude() {
        let req: NearbyRequest =
            serde_json::from_str(r#"{"latitude": 120.0, "longitude": -70.312}"#).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_convert_request_rejects_bad_code() {
        let req: ConvertRequest =
            serde_json::from_str(r#"{"amount": 10000.0, "from": "CLP", "to": "US"}"#).unwrap();

        assert!(req.validate().is_err());
    }
}
