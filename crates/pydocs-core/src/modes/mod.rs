//! Extraction routines and the mode dispatcher.

mod download;
mod latest_versions;
mod pep;
mod whats_new;

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::config::ParserConfig;
use crate::error::AppError;
use crate::models::ResultTable;
use crate::traits::Fetcher;

pub use download::{download, download_archive};
pub use latest_versions::{latest_versions, parse_version_text};
pub use pep::{PepCensus, StatusMismatch, detail_status, pep, pep_census, status_code};
pub use whats_new::whats_new;

/// One extraction capability per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Mode {
    #[cfg_attr(feature = "clap", value(name = "whats-new"))]
    WhatsNew,
    #[cfg_attr(feature = "clap", value(name = "latest-versions"))]
    LatestVersions,
    #[cfg_attr(feature = "clap", value(name = "download"))]
    Download,
    #[cfg_attr(feature = "clap", value(name = "pep"))]
    Pep,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::WhatsNew, Mode::LatestVersions, Mode::Download, Mode::Pep];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                AppError::ConfigError(format!(
                    "unknown mode '{s}' (expected one of: {})",
                    Mode::ALL.map(|m| m.as_str()).join(", ")
                ))
            })
    }
}

/// Runs one extraction mode against a shared HTTP session.
///
/// Generic over the [`Fetcher`] so routines run against canned pages in
/// tests and against the cached `reqwest` session in the binary.
pub struct ParserService<F: Fetcher> {
    fetcher: F,
    config: ParserConfig,
}

impl<F: Fetcher> ParserService<F> {
    pub fn new(fetcher: F, config: ParserConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Run `mode`.
    ///
    /// `Ok(None)` means there is nothing to output: either the mode's page
    /// could not be fetched or the mode's output is a file. Every error
    /// escaping the routine is logged and wrapped once as
    /// [`AppError::ExtractionFailed`].
    pub async fn run(&self, mode: Mode) -> Result<Option<ResultTable>, AppError> {
        tracing::debug!(%mode, "Running mode");
        let result = match mode {
            Mode::WhatsNew => whats_new(&self.fetcher, &self.config).await,
            Mode::LatestVersions => latest_versions(&self.fetcher, &self.config).await,
            Mode::Download => download(&self.fetcher, &self.config).await,
            Mode::Pep => pep(&self.fetcher, &self.config).await,
        };
        result.map_err(|e| {
            if e.is_structural() {
                tracing::error!("Page layout changed, mode {mode} cannot continue: {e}");
            } else {
                tracing::error!("Error while running mode {mode}: {e}");
            }
            AppError::extraction_failed(mode.as_str(), e)
        })
    }
}

/// Resolve `href` against `base` the way a browser would.
pub(crate) fn join_url(base: &Url, href: &str) -> Result<Url, AppError> {
    base.join(href)
        .map_err(|e| AppError::InvalidUrl(format!("cannot join '{href}' to {base}: {e}")))
}
