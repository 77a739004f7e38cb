use crate::config::ParserConfig;
use crate::constants::WHATS_NEW_HEADER;
use crate::error::AppError;
use crate::fetch::get_document;
use crate::html::{TagQuery, attr_of, find_all, find_tag, text_of};
use crate::models::ResultTable;
use crate::progress::item_bar;
use crate::traits::Fetcher;

use super::join_url;

/// Collect (link, title, editors) for every "What's New" article.
///
/// Articles whose page fails to load are skipped.
pub async fn whats_new<F: Fetcher>(
    fetcher: &F,
    config: &ParserConfig,
) -> Result<Option<ResultTable>, AppError> {
    let index_url = join_url(&config.main_doc_url, "whatsnew/")?;
    let Some(links) = article_links(fetcher, &index_url).await? else {
        return Ok(None);
    };

    let mut table = ResultTable::new(WHATS_NEW_HEADER);
    let bar = item_bar(links.len(), "whats-new", config.show_progress);
    for link in links {
        bar.inc(1);
        let Some(doc) = get_document(fetcher, link.as_str()).await? else {
            continue;
        };
        let root = doc.root_element();
        let h1 = find_tag(root, &TagQuery::new("h1"))?;
        let dl = find_tag(root, &TagQuery::new("dl"))?;
        let editors = text_of(dl).replace('\n', " ");
        table.push_row([link.to_string(), text_of(h1), editors])?;
    }
    bar.finish_and_clear();

    Ok(Some(table))
}

async fn article_links<F: Fetcher>(
    fetcher: &F,
    index_url: &url::Url,
) -> Result<Option<Vec<url::Url>>, AppError> {
    let Some(doc) = get_document(fetcher, index_url.as_str()).await? else {
        return Ok(None);
    };
    let main_section = find_tag(
        doc.root_element(),
        &TagQuery::new("section").attr("id", "what-s-new-in-python"),
    )?;
    let wrapper = find_tag(
        main_section,
        &TagQuery::new("div").attr("class", "toctree-wrapper"),
    )?;

    let links = find_all(wrapper, &TagQuery::new("li").attr("class", "toctree-l1"))
        .into_iter()
        .map(|item| {
            let a = find_tag(item, &TagQuery::new("a"))?;
            join_url(index_url, &attr_of(a, "href")?)
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    Ok(Some(links))
}
