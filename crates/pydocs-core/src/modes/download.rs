use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ParserConfig;
use crate::error::AppError;
use crate::fetch::get_document;
use crate::html::{TagQuery, attr_of, find_tag};
use crate::models::ResultTable;
use crate::traits::Fetcher;

use super::join_url;

static PDF_A4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+pdf-a4\.zip$").expect("archive regex is valid"));

/// Download the A4 PDF documentation archive into the downloads directory.
///
/// The saved file is the only output, so no table is returned.
pub async fn download<F: Fetcher>(
    fetcher: &F,
    config: &ParserConfig,
) -> Result<Option<ResultTable>, AppError> {
    download_archive(fetcher, config).await?;
    Ok(None)
}

/// Same as [`download`], returning where the archive was written.
/// `None` means the downloads page could not be loaded.
pub async fn download_archive<F: Fetcher>(
    fetcher: &F,
    config: &ParserConfig,
) -> Result<Option<PathBuf>, AppError> {
    let downloads_url = join_url(&config.main_doc_url, "download.html")?;
    let Some(archive_url) = archive_link(fetcher, &downloads_url).await? else {
        return Ok(None);
    };

    let filename = archive_url
        .as_str()
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::InvalidUrl(format!("no file name in {archive_url}")))?
        .to_string();

    let downloads_dir = config.downloads_dir();
    tokio::fs::create_dir_all(&downloads_dir).await?;
    let archive_path = downloads_dir.join(filename);

    let response = fetcher.get(archive_url.as_str()).await?;
    if !response.is_success() {
        return Err(AppError::HttpError(format!(
            "HTTP {} for {}",
            response.status, archive_url
        )));
    }
    tokio::fs::write(&archive_path, &response.body).await?;
    tracing::info!("Archive downloaded and saved: {}", archive_path.display());

    Ok(Some(archive_path))
}

async fn archive_link<F: Fetcher>(
    fetcher: &F,
    downloads_url: &url::Url,
) -> Result<Option<url::Url>, AppError> {
    let Some(doc) = get_document(fetcher, downloads_url.as_str()).await? else {
        return Ok(None);
    };
    let main = find_tag(doc.root_element(), &TagQuery::new("div").attr("role", "main"))?;
    let table = find_tag(main, &TagQuery::new("table").attr("class", "docutils"))?;
    let link = find_tag(
        table,
        &TagQuery::new("a").attr_pattern("href", PDF_A4_RE.clone()),
    )?;
    let url = join_url(downloads_url, &attr_of(link, "href")?)?;
    Ok(Some(url))
}
