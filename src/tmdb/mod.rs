mod client;
mod endpoints;

pub use client::{check_status, ApiError, TmdbClient};
pub use endpoints::Endpoint;
