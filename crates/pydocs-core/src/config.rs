use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::AppError;

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const PEP_DOC_URL: &str = "https://peps.python.org/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Root of the Python documentation.
    pub main_doc_url: Url,
    /// Root of the PEP index.
    pub pep_doc_url: Url,
    /// Directory holding `logs/`, `downloads/`, `results/` and `cache/`.
    pub base_dir: PathBuf,
    pub request_timeout: Duration,
    /// Cache entries older than this are refetched. `None` keeps them forever.
    pub cache_ttl: Option<Duration>,
    pub show_progress: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            main_doc_url: Url::parse(MAIN_DOC_URL).expect("MAIN_DOC_URL is a valid URL"),
            pep_doc_url: Url::parse(PEP_DOC_URL).expect("PEP_DOC_URL is a valid URL"),
            base_dir: PathBuf::from("."),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: None,
            show_progress: true,
        }
    }
}

impl ParserConfig {
    /// Read configuration from environment variables.
    ///
    /// - `PYDOCS_MAIN_DOC_URL` (optional)
    /// - `PYDOCS_PEP_DOC_URL` (optional)
    /// - `PYDOCS_BASE_DIR` (optional, defaults to the current directory)
    /// - `PYDOCS_TIMEOUT_SECS` (optional, defaults to 30)
    /// - `PYDOCS_CACHE_TTL_SECS` (optional, unset keeps entries forever)
    /// - `PYDOCS_PROGRESS` (optional, `0` or `false` hides progress bars)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("PYDOCS_MAIN_DOC_URL") {
            config.main_doc_url = parse_base_url("PYDOCS_MAIN_DOC_URL", &raw)?;
        }
        if let Some(raw) = lookup("PYDOCS_PEP_DOC_URL") {
            config.pep_doc_url = parse_base_url("PYDOCS_PEP_DOC_URL", &raw)?;
        }
        if let Some(raw) = lookup("PYDOCS_BASE_DIR") {
            config.base_dir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("PYDOCS_TIMEOUT_SECS") {
            let secs = parse_secs("PYDOCS_TIMEOUT_SECS", &raw)?;
            if secs == 0 {
                return Err(AppError::ConfigError(
                    "PYDOCS_TIMEOUT_SECS must be at least 1".into(),
                ));
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("PYDOCS_CACHE_TTL_SECS") {
            config.cache_ttl = Some(Duration::from_secs(parse_secs(
                "PYDOCS_CACHE_TTL_SECS",
                &raw,
            )?));
        }
        if let Some(raw) = lookup("PYDOCS_PROGRESS") {
            let raw = raw.trim().to_ascii_lowercase();
            config.show_progress = !matches!(raw.as_str(), "0" | "false" | "no");
        }

        Ok(config)
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join("downloads")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join("results")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join("cache")
    }
}

/// Parse a documentation root. A trailing slash is added so relative
/// links join below it rather than replacing its last segment.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, AppError> {
    let raw = raw.trim();
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| AppError::ConfigError(format!("Invalid {key} '{raw}': {e}")))
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!(
            "Invalid {key} '{raw}': must be a non-negative integer"
        ))
    })
}
