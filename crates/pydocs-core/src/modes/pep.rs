use scraper::ElementRef;

use crate::config::ParserConfig;
use crate::constants::{PEP_HEADER, expected_statuses};
use crate::error::AppError;
use crate::fetch::get_document;
use crate::html::{TagQuery, attr_of, find_all, find_tag, find_text_node, node_text, text_of};
use crate::models::{ResultTable, StatusTally};
use crate::progress::item_bar;
use crate::traits::Fetcher;

use super::join_url;

/// A PEP whose detail page disagrees with the index table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMismatch {
    pub link: String,
    pub status: String,
    pub expected: &'static [&'static str],
}

/// Outcome of walking the PEP index.
#[derive(Debug, Default)]
pub struct PepCensus {
    pub tally: StatusTally,
    pub mismatches: Vec<StatusMismatch>,
}

struct IndexRow {
    code: String,
    link: url::Url,
}

/// Status code shown in the index's first column.
///
/// The cell starts with a one-character type glyph; everything after it is
/// the status letter, or nothing for drafts.
pub fn status_code(cell_text: &str) -> String {
    cell_text.chars().skip(1).collect()
}

/// Status value from a PEP page's metadata list: the node two siblings
/// after the element holding the `Status` label.
pub fn detail_status(dl: ElementRef<'_>) -> Result<String, AppError> {
    let label = find_text_node(dl, "Status")
        .ok_or_else(|| AppError::StructureNotFound("no 'Status' field in PEP metadata".into()))?;
    let value = label
        .parent()
        .and_then(|field| field.next_sibling())
        .and_then(|node| node.next_sibling())
        .ok_or_else(|| AppError::StructureNotFound("no value after the 'Status' field".into()))?;
    Ok(node_text(value))
}

/// Count PEPs by the status on their own page, checking each against the
/// status code in the index.
pub async fn pep<F: Fetcher>(
    fetcher: &F,
    config: &ParserConfig,
) -> Result<Option<ResultTable>, AppError> {
    let census = pep_census(fetcher, config).await?;
    Ok(census.map(|c| c.tally.into_table(PEP_HEADER)))
}

/// Walk every PEP in the numerical index. `None` means the index itself
/// could not be loaded; detail pages that fail to load are skipped.
pub async fn pep_census<F: Fetcher>(
    fetcher: &F,
    config: &ParserConfig,
) -> Result<Option<PepCensus>, AppError> {
    let Some(rows) = index_rows(fetcher, &config.pep_doc_url).await? else {
        return Ok(None);
    };

    let mut census = PepCensus::default();
    let bar = item_bar(rows.len(), "pep", config.show_progress);
    for row in rows {
        bar.inc(1);
        let Some(doc) = get_document(fetcher, row.link.as_str()).await? else {
            continue;
        };
        let dl = find_tag(doc.root_element(), &TagQuery::new("dl"))?;
        let status = detail_status(dl)?;
        census.tally.increment(&status);

        let Some(expected) = expected_statuses(&row.code) else {
            tracing::warn!(
                "Unrecognized status code {:?} in the PEP index for {}; the leading type glyph may have changed",
                row.code,
                row.link
            );
            continue;
        };
        if !expected.contains(&status.as_str()) {
            tracing::info!(
                "Mismatched statuses:\n{}\nStatus on page: {}\nExpected statuses: {:?}\n",
                row.link,
                status,
                expected
            );
            census.mismatches.push(StatusMismatch {
                link: row.link.to_string(),
                status,
                expected,
            });
        }
    }
    bar.finish_and_clear();

    Ok(Some(census))
}

async fn index_rows<F: Fetcher>(
    fetcher: &F,
    pep_url: &url::Url,
) -> Result<Option<Vec<IndexRow>>, AppError> {
    let Some(doc) = get_document(fetcher, pep_url.as_str()).await? else {
        return Ok(None);
    };
    let section = find_tag(
        doc.root_element(),
        &TagQuery::new("section").attr("id", "numerical-index"),
    )?;
    let tbody = find_tag(section, &TagQuery::new("tbody"))?;

    let mut rows = Vec::new();
    for tr in find_all(tbody, &TagQuery::new("tr")) {
        let td = find_tag(tr, &TagQuery::new("td"))?;
        let a = find_tag(tr, &TagQuery::new("a"))?;
        rows.push(IndexRow {
            code: status_code(&text_of(td)),
            link: join_url(pep_url, &attr_of(a, "href")?)?,
        });
    }
    Ok(Some(rows))
}
