use pydocs_core::modes::pep_census;
use pydocs_core::{AppError, Mode, ParserService};

use crate::common::{FixtureFetcher, LogBuffer, PEPS, test_config};

/// Numerical index with one row per (type+status code, pep number).
fn pep_index(rows: &[(&str, u32)]) -> String {
    let body: String = rows
        .iter()
        .map(|(code, number)| {
            format!(
                r#"<tr class="row-odd">
<td><abbr title="type and status">{code}</abbr></td>
<td><a class="pep reference internal" href="pep-{number:04}/" title="PEP {number}">{number}</a></td>
<td>Title {number}</td>
</tr>
"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
<section id="numerical-index">
<h2>Numerical Index</h2>
<table class="pep-zero-table docutils align-default">
<thead><tr><th>&nbsp;</th><th>PEP</th><th>Title</th></tr></thead>
<tbody>
{body}</tbody>
</table>
</section>
</body></html>"#
    )
}

fn pep_page(status: &str) -> String {
    format!(
        r#"<html><body><section id="pep-content">
<dl class="rfc2822 field-list simple">
<dt class="field-odd">Author<span class="colon">:</span></dt>
<dd class="field-odd">Someone</dd>
<dt class="field-even">Status<span class="colon">:</span></dt>
<dd class="field-even"><abbr title="status description">{status}</abbr></dd>
<dt class="field-odd">Type<span class="colon">:</span></dt>
<dd class="field-odd">Process</dd>
</dl>
</section></body></html>"#
    )
}

fn pep_url(number: u32) -> String {
    format!("{PEPS}pep-{number:04}/")
}

#[tokio::test]
async fn tally_counts_in_first_seen_order_with_total_last() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FixtureFetcher::new()
        .page(PEPS, pep_index(&[("PA", 1), ("PA", 8), ("IF", 20)]))
        .page(&pep_url(1), pep_page("Active"))
        .page(&pep_url(8), pep_page("Active"))
        .page(&pep_url(20), pep_page("Final"));
    let service = ParserService::new(fetcher, test_config(tmp.path()));

    let table = service.run(Mode::Pep).await.unwrap().unwrap();

    assert_eq!(table.header(), ["Status", "Count"]);
    assert_eq!(
        table.rows(),
        &[
            vec!["Active".to_string(), "2".to_string()],
            vec!["Final".to_string(), "1".to_string()],
            vec!["Total".to_string(), "3".to_string()],
        ]
    );
}

#[tokio::test]
async fn draft_code_mismatch_is_logged_not_raised() {
    let tmp = tempfile::tempdir().unwrap();
    let logs = LogBuffer::default();
    let _guard = logs.install();

    // "S" alone: type glyph with no status letter, so the expected set is Draft/Active.
    let fetcher = FixtureFetcher::new()
        .page(PEPS, pep_index(&[("S", 3001), ("S", 3002)]))
        .page(&pep_url(3001), pep_page("Rejected"))
        .page(&pep_url(3002), pep_page("Draft"));
    let config = test_config(tmp.path());

    let census = pep_census(&fetcher, &config).await.unwrap().unwrap();

    assert_eq!(census.mismatches.len(), 1);
    let mismatch = &census.mismatches[0];
    assert_eq!(mismatch.link, pep_url(3001));
    assert_eq!(mismatch.status, "Rejected");
    assert_eq!(mismatch.expected, &["Draft", "Active"]);
    assert_eq!(census.tally.get("Rejected"), 1);
    assert_eq!(census.tally.get("Draft"), 1);

    let output = logs.contents();
    assert_eq!(output.matches("Mismatched statuses").count(), 1);
    assert!(output.contains(&pep_url(3001)));
}

#[tokio::test]
async fn unreachable_detail_pages_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FixtureFetcher::new()
        .page(PEPS, pep_index(&[("IF", 20), ("SF", 404)]))
        .page(&pep_url(20), pep_page("Final"));
    let service = ParserService::new(fetcher.clone(), test_config(tmp.path()));

    let table = service.run(Mode::Pep).await.unwrap().unwrap();

    assert_eq!(table.rows().last().unwrap(), &["Total".to_string(), "1".to_string()]);
    assert_eq!(fetcher.requested().len(), 3);
}

#[tokio::test]
async fn unknown_status_code_is_counted_without_comparison() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FixtureFetcher::new()
        .page(PEPS, pep_index(&[("IX", 9)]))
        .page(&pep_url(9), pep_page("Final"));
    let config = test_config(tmp.path());

    let census = pep_census(&fetcher, &config).await.unwrap().unwrap();

    assert!(census.mismatches.is_empty());
    assert_eq!(census.tally.total(), 1);
}

#[tokio::test]
async fn detail_page_without_metadata_aborts() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FixtureFetcher::new()
        .page(PEPS, pep_index(&[("IF", 20)]))
        .page(&pep_url(20), "<html><body><p>moved</p></body></html>");
    let service = ParserService::new(fetcher, test_config(tmp.path()));

    match service.run(Mode::Pep).await.unwrap_err() {
        AppError::ExtractionFailed { mode, source } => {
            assert_eq!(mode, "pep");
            assert!(matches!(*source, AppError::TagNotFound { ref tag, .. } if tag == "dl"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_index_produces_no_table() {
    let tmp = tempfile::tempdir().unwrap();
    let service = ParserService::new(FixtureFetcher::new(), test_config(tmp.path()));

    assert!(service.run(Mode::Pep).await.unwrap().is_none());
}
