use std::future::Future;

use crate::error::AppError;
use crate::models::RawResponse;

/// An HTTP session: issues one GET and returns the raw response.
///
/// Implementations report network-level failures with the transport
/// variants of [`AppError`] (see [`AppError::is_transport`]). A non-2xx
/// status is still a response, not an error.
pub trait Fetcher: Send + Sync + Clone {
    fn get(&self, url: &str) -> impl Future<Output = Result<RawResponse, AppError>> + Send;
}
