use pydocs_core::modes::download_archive;
use pydocs_core::{AppError, Mode, ParserService};

use crate::common::{FixtureFetcher, MAIN, test_config};

const WHATS_NEW_INDEX: &str = r#"<html><body>
<section id="what-s-new-in-python">
  <h1>What's New in Python</h1>
  <div class="toctree-wrapper compound">
    <ul>
      <li class="toctree-l1"><a class="reference internal" href="3.13.html">What's New In Python 3.13</a>
        <ul><li class="toctree-l2"><a href="3.13.html#summary">Summary</a></li></ul>
      </li>
      <li class="toctree-l1"><a class="reference internal" href="3.12.html">What's New In Python 3.12</a></li>
      <li class="toctree-l1"><a class="reference internal" href="3.11.html">What's New In Python 3.11</a></li>
    </ul>
  </div>
</section>
</body></html>"#;

fn whats_new_article(version: &str, editor: &str) -> String {
    format!(
        r#"<html><body><section>
<h1>What's New In Python {version}</h1>
<dl class="field-list simple">
<dt class="field-odd">Editor<span class="colon">:</span></dt>
<dd class="field-odd"><p>{editor}</p>
</dd>
</dl>
</section></body></html>"#
    )
}

const MAIN_PAGE: &str = r#"<html><body>
<div class="sphinxsidebar"><div class="sphinxsidebarwrapper">
  <h3>Navigation</h3>
  <ul><li><a href="genindex.html">Index</a></li></ul>
  <h3>Docs by version</h3>
  <ul>
    <li><a href="https://docs.python.org/3.14/">Python 3.14 (in development)</a></li>
    <li><a href="https://docs.python.org/3.13/">Python 3.13 (stable)</a></li>
    <li><a href="https://docs.python.org/2.7/">Python 2.7 (EOL)</a></li>
    <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
  </ul>
</div></div>
</body></html>"#;

const DOWNLOAD_PAGE: &str = r#"<html><body>
<div class="body" role="main">
  <h1>Download Python 3.12 Documentation</h1>
  <table class="docutils align-default">
    <thead><tr><th>Format</th><th>Packed as .zip</th></tr></thead>
    <tbody>
      <tr><td>PDF (US-Letter paper size)</td>
          <td><a class="reference external" href="archives/python-3.12-docs-pdf-letter.zip">Download</a></td></tr>
      <tr><td>PDF (A4 paper size)</td>
          <td><a class="reference external" href="archives/cpython-3.12-docs-pdf-a4.zip">Download</a></td></tr>
    </tbody>
  </table>
</div>
</body></html>"#;

#[tokio::test]
async fn whats_new_collects_articles_and_skips_failed_pages() {
    let tmp = tempfile::tempdir().unwrap();
    // 3.12 is not served, so its fetch fails and the row is skipped.
    let fetcher = FixtureFetcher::new()
        .page("https://docs.test/3/whatsnew/", WHATS_NEW_INDEX)
        .page(
            "https://docs.test/3/whatsnew/3.13.html",
            whats_new_article("3.13", "Adam Turner and Thomas Wouters"),
        )
        .page(
            "https://docs.test/3/whatsnew/3.11.html",
            whats_new_article("3.11", "Pablo Galindo Salgado"),
        );
    let service = ParserService::new(fetcher.clone(), test_config(tmp.path()));

    let table = service.run(Mode::WhatsNew).await.unwrap().unwrap();

    assert_eq!(table.header(), ["Article link", "Title", "Editor, author"]);
    assert_eq!(table.rows().len(), 2);
    let first = &table.rows()[0];
    assert_eq!(first[0], "https://docs.test/3/whatsnew/3.13.html");
    assert_eq!(first[1], "What's New In Python 3.13");
    assert!(!first[2].contains('\n'));
    assert!(first[2].contains("Editor: Adam Turner and Thomas Wouters"));
    assert_eq!(table.rows()[1][0], "https://docs.test/3/whatsnew/3.11.html");
    assert!(
        fetcher
            .requested()
            .contains(&"https://docs.test/3/whatsnew/3.12.html".to_string())
    );
}

#[tokio::test]
async fn whats_new_without_section_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FixtureFetcher::new().page("https://docs.test/3/whatsnew/", "<html><body></body></html>");
    let service = ParserService::new(fetcher, test_config(tmp.path()));

    let err = service.run(Mode::WhatsNew).await.unwrap_err();
    assert!(err.to_string().contains("what-s-new-in-python"));
}

#[tokio::test]
async fn latest_versions_parses_sidebar_links() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FixtureFetcher::new().page(MAIN, MAIN_PAGE);
    let service = ParserService::new(fetcher, test_config(tmp.path()));

    let table = service.run(Mode::LatestVersions).await.unwrap().unwrap();

    assert_eq!(table.header(), ["Documentation link", "Version", "Status"]);
    let rows: Vec<Vec<&str>> = table
        .rows()
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["https://docs.python.org/3.14/", "3.14", "in development"],
            vec!["https://docs.python.org/3.13/", "3.13", "stable"],
            vec!["https://docs.python.org/2.7/", "2.7", "EOL"],
            vec!["https://www.python.org/doc/versions/", "All versions", ""],
        ]
    );
}

#[tokio::test]
async fn latest_versions_without_version_list_is_structure_error() {
    let tmp = tempfile::tempdir().unwrap();
    let page = r#"<div class="sphinxsidebarwrapper"><ul><li><a href="x">Index</a></li></ul></div>"#;
    let fetcher = FixtureFetcher::new().page(MAIN, page);
    let service = ParserService::new(fetcher, test_config(tmp.path()));

    match service.run(Mode::LatestVersions).await.unwrap_err() {
        AppError::ExtractionFailed { mode, source } => {
            assert_eq!(mode, "latest-versions");
            assert!(matches!(*source, AppError::StructureNotFound(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn download_saves_archive_under_its_own_name() {
    let tmp = tempfile::tempdir().unwrap();
    let archive: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    let fetcher = FixtureFetcher::new()
        .page("https://docs.test/3/download.html", DOWNLOAD_PAGE)
        .page(
            "https://docs.test/3/archives/cpython-3.12-docs-pdf-a4.zip",
            &archive,
        );
    let config = test_config(tmp.path());

    let path = download_archive(&fetcher, &config).await.unwrap().unwrap();

    assert_eq!(path, tmp.path().join("downloads").join("cpython-3.12-docs-pdf-a4.zip"));
    assert_eq!(std::fs::read(&path).unwrap(), archive);
}

#[tokio::test]
async fn download_overwrites_and_returns_no_table() {
    let tmp = tempfile::tempdir().unwrap();
    let downloads = tmp.path().join("downloads");
    std::fs::create_dir_all(&downloads).unwrap();
    std::fs::write(downloads.join("cpython-3.12-docs-pdf-a4.zip"), b"stale").unwrap();

    let fetcher = FixtureFetcher::new()
        .page("https://docs.test/3/download.html", DOWNLOAD_PAGE)
        .page("https://docs.test/3/archives/cpython-3.12-docs-pdf-a4.zip", b"fresh");
    let service = ParserService::new(fetcher, test_config(tmp.path()));

    assert!(service.run(Mode::Download).await.unwrap().is_none());
    assert_eq!(
        std::fs::read(downloads.join("cpython-3.12-docs-pdf-a4.zip")).unwrap(),
        b"fresh"
    );
}

#[tokio::test]
async fn download_archive_fetch_failure_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let fetcher = FixtureFetcher::new().page("https://docs.test/3/download.html", DOWNLOAD_PAGE);
    let service = ParserService::new(fetcher, test_config(tmp.path()));

    match service.run(Mode::Download).await.unwrap_err() {
        AppError::ExtractionFailed { source, .. } => assert!(source.is_transport()),
        other => panic!("unexpected error: {other:?}"),
    }
}
