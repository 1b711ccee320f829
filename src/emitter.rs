use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ArchiveError;
use crate::model::ExtractedRecord;

/// The three sitemap files for one suffix.
#[derive(Debug, Clone)]
pub struct SitemapPaths {
    pub html: PathBuf,
    pub json: PathBuf,
    pub text: PathBuf,
}

impl SitemapPaths {
    pub fn new(dir: &Path, suffix: &str) -> Self {
        Self {
            html: dir.join(format!("sitemap-{}.htm", suffix)),
            json: dir.join(format!("sitemap-{}.json", suffix)),
            text: dir.join(format!("sitemap-{}.txt", suffix)),
        }
    }
}

pub fn render_html(records: &[ExtractedRecord]) -> String {
    let mut links = String::new();
    for r in records {
        links.push_str("   <ul>\n");
        links.push_str(&format!(
            "      <li>Title: {}</li>\n",
            r.title.as_deref().unwrap_or("None")
        ));
        links.push_str(&format!(
            "      <li>HTML: <a href=\"{0}\">{0}</a></li>\n",
            r.detail_url
        ));
        links.push_str(&format!(
            "      <li>PDF: <a href=\"{0}\">{0}</a></li>\n",
            r.artifact_url
        ));
        links.push_str("   </ul>");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n   <head><title>Newsroom Sitemap</title></head>\n   <body>\n{}\n   </body>\n</html>",
        links
    )
}

/// Pretty-printed JSON array with each record's keys in sorted order.
pub fn render_json(records: &[ExtractedRecord]) -> serde_json::Result<String> {
    // Value objects are BTreeMap-backed, which sorts the keys.
    let value = serde_json::to_value(records)?;
    serde_json::to_string_pretty(&value)
}

pub fn render_text(records: &[ExtractedRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}\n{}\n", r.detail_url, r.artifact_url))
        .collect()
}

fn write_file(path: &Path, contents: &str) -> Result<(), ArchiveError> {
    fs::write(path, contents.as_bytes()).map_err(|source| ArchiveError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write all three sitemaps, overwriting earlier runs. Every write is
/// attempted; the first failure is returned afterwards.
pub fn write_all(records: &[ExtractedRecord], paths: &SitemapPaths) -> Result<(), ArchiveError> {
    let json = render_json(records).map_err(|e| ArchiveError::Write {
        path: paths.json.clone(),
        source: e.into(),
    });

    let results = [
        write_file(&paths.html, &render_html(records)),
        json.and_then(|body| write_file(&paths.json, &body)),
        write_file(&paths.text, &render_text(records)),
    ];

    let mut first_err = None;
    for result in results {
        if let Err(e) = result {
            warn!("{}", e);
            if first_err.is_none() {
                first_err = Some(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ExtractedRecord> {
        vec![
            ExtractedRecord {
                title: Some("Acme Launch".into()),
                detail_url: "https://x/news_id/10".into(),
                artifact_url: "https://x/pdf.php?id=A".into(),
            },
            ExtractedRecord {
                title: None,
                detail_url: "https://x/news_id/20".into(),
                artifact_url: "https://x/pdf.php?id=B".into(),
            },
        ]
    }

    #[test]
    fn html_has_one_block_per_record() {
        let html = render_html(&sample());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<head><title>Newsroom Sitemap</title></head>"));
        assert_eq!(html.matches("<ul>").count(), 2);
        assert!(html.contains("<li>Title: Acme Launch</li>"));
        assert!(html.contains("<li>Title: None</li>"));
        assert!(html.contains(r#"<li>HTML: <a href="https://x/news_id/10">https://x/news_id/10</a></li>"#));
        assert!(html.contains(r#"<li>PDF: <a href="https://x/pdf.php?id=B">https://x/pdf.php?id=B</a></li>"#));
    }

    #[test]
    fn json_round_trips_with_sorted_keys() {
        let records = sample();
        let json = render_json(&records).unwrap();

        let artifact = json.find("\"artifact_url\"").unwrap();
        let detail = json.find("\"detail_url\"").unwrap();
        let title = json.find("\"title\"").unwrap();
        assert!(artifact < detail && detail < title);
        assert!(json.contains("\n  {\n    \"artifact_url\""));

        let back: Vec<ExtractedRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn json_absent_title_is_null() {
        let json = render_json(&sample()[1..]).unwrap();
        assert!(json.contains("\"title\": null"));
    }

    #[test]
    fn text_is_two_lines_per_record() {
        assert_eq!(
            render_text(&sample()),
            "https://x/news_id/10\nhttps://x/pdf.php?id=A\nhttps://x/news_id/20\nhttps://x/pdf.php?id=B\n"
        );
    }

    #[test]
    fn write_all_overwrites_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SitemapPaths::new(dir.path(), "acme");
        fs::write(&paths.text, "stale content that is much longer than the new one\n".repeat(10)).unwrap();

        write_all(&sample(), &paths).unwrap();

        assert!(dir.path().join("sitemap-acme.htm").exists());
        assert!(dir.path().join("sitemap-acme.json").exists());
        let text = fs::read_to_string(&paths.text).unwrap();
        assert_eq!(text, render_text(&sample()));
    }

    #[test]
    fn one_failed_write_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = SitemapPaths::new(dir.path(), "acme");
        paths.html = dir.path().join("missing-dir").join("sitemap-acme.htm");

        let err = write_all(&sample(), &paths).unwrap_err();
        assert!(matches!(err, ArchiveError::Write { .. }));
        assert!(paths.json.exists());
        assert!(paths.text.exists());
    }
}
