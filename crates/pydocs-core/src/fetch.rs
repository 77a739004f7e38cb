//! Page fetcher: one GET per call with failure containment.
//!
//! Network trouble is expected and non-fatal. A failed request is logged and
//! reported as `None` so the caller can skip that one page and keep going.

use std::backtrace::Backtrace;

use scraper::Html;

use crate::error::AppError;
use crate::html::parse_document;
use crate::models::Page;
use crate::traits::Fetcher;

/// Encoding forced on every fetched page unless the caller asks otherwise.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// GET `url` and force the page text to `encoding`.
///
/// Transport failures are logged with a backtrace and reported as
/// `Ok(None)`. Any other error propagates. Non-2xx responses are returned
/// as pages with a warning.
pub async fn get_response<F: Fetcher>(
    fetcher: &F,
    url: &str,
    encoding: &str,
) -> Result<Option<Page>, AppError> {
    match fetcher.get(url).await {
        Ok(response) => {
            if !response.is_success() {
                tracing::warn!("HTTP {} for {}", response.status, url);
            }
            Ok(Some(Page::new(response, encoding)))
        }
        Err(e) if e.is_transport() => {
            tracing::error!(
                "Failed to load page {}: {}\n{}",
                url,
                e,
                Backtrace::force_capture()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// GET `url` with [`DEFAULT_ENCODING`] and parse it as an HTML document.
///
/// `Ok(None)` from [`get_response`] propagates unchanged.
pub async fn get_document<F: Fetcher>(fetcher: &F, url: &str) -> Result<Option<Html>, AppError> {
    let Some(page) = get_response(fetcher, url, DEFAULT_ENCODING).await? else {
        return Ok(None);
    };
    tracing::debug!(url = page.url(), encoding = page.encoding(), "Parsing page");
    Ok(Some(parse_document(&page.text())))
}
