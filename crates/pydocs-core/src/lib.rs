pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod html;
pub mod models;
pub mod modes;
pub mod progress;
pub mod traits;


pub use cache::{CachedFetcher, DiskCache};
pub use config::ParserConfig;
pub use error::AppError;
pub use models::{Page, RawResponse, ResultTable, StatusTally};
pub use modes::{Mode, ParserService};
pub use traits::Fetcher;
