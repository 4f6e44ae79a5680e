//! HTTP API module for the Earnings Engine.
//!
//! This module provides the REST API endpoints for calculating earnings,
//! resolving share links and creating share messages.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::CalculationRequest;
pub use response::{ApiError, CalculationResponse, ShareResponse};
pub use state::AppState;
