// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BoundingBox, Coordinate, CoordinateError, Place, RankedPlace};
pub use requests::{ConvertRequest, NearbyRequest};
pub use responses::{
    CategoriesResponse, ConvertResponse, ErrorResponse, HealthResponse, NearbyResponse,
    PlacesResponse,
};
