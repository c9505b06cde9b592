mod client;
mod dev_backend;

pub use client::ApiClient;

use trip_api::ApiError;

/// True when the backend rejected the session token, wherever the error was
/// wrapped with context along the way.
pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ApiError>())
        .any(ApiError::is_unauthorized)
}
