use std::sync::LazyLock;

use regex::Regex;

use crate::config::ParserConfig;
use crate::constants::LATEST_VERSIONS_HEADER;
use crate::error::AppError;
use crate::fetch::get_document;
use crate::html::{TagQuery, attr_of, find_all, find_tag, text_of};
use crate::models::ResultTable;
use crate::traits::Fetcher;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)").expect("version regex is valid")
});

/// Split a sidebar link text into (version, status).
///
/// Text that is not of the form `Python X.Y (status)` is kept whole as the
/// version with an empty status.
pub fn parse_version_text(text: &str) -> (String, String) {
    match VERSION_RE.captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// List every documentation version linked from the sidebar.
pub async fn latest_versions<F: Fetcher>(
    fetcher: &F,
    config: &ParserConfig,
) -> Result<Option<ResultTable>, AppError> {
    let Some(doc) = get_document(fetcher, config.main_doc_url.as_str()).await? else {
        return Ok(None);
    };
    let sidebar = find_tag(
        doc.root_element(),
        &TagQuery::new("div").attr("class", "sphinxsidebarwrapper"),
    )?;
    let versions_list = find_all(sidebar, &TagQuery::new("ul"))
        .into_iter()
        .find(|ul| text_of(*ul).contains("All versions"))
        .ok_or_else(|| {
            AppError::StructureNotFound("no sidebar list contains 'All versions'".into())
        })?;

    let mut table = ResultTable::new(LATEST_VERSIONS_HEADER);
    for a in find_all(versions_list, &TagQuery::new("a")) {
        let link = attr_of(a, "href")?;
        let (version, status) = parse_version_text(&text_of(a));
        table.push_row([link, version, status])?;
    }

    Ok(Some(table))
}
