//! HTTP API module for the quote engine.
//!
//! This module provides the REST API endpoints for quoting moves and the
//! distance resolution seam the boundary uses before calling the engine.

mod distance;
mod handlers;
mod request;
mod response;
mod state;

pub use distance::{
    DistanceResolver, FALLBACK_AVERAGE_SPEED_KMH, FALLBACK_OTHER_CITY_KM, FALLBACK_SAME_CITY_KM,
    FallbackDistanceResolver, Route, TRAVEL_HOURS_DECIMAL_PLACES, travel_hours_for_distance,
};
pub use handlers::create_router;
pub use request::{AddressRequest, ApartmentSize, QuoteRequest};
pub use response::{ApiError, ApiErrorResponse, ENGINE_VERSION, HealthResponse, QuoteResponse};
pub use state::AppState;
