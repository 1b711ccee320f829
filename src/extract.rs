use std::sync::LazyLock;

use regex::Regex;

/// Canonical press-release page; the news id is appended verbatim.
pub const DETAIL_BASE_URL: &str =
    "https://myconvento.com/public/newsroom/data/plugin/news/run/show_news/news_id/";

/// Site-name boilerplate at the start of every press-release `<title>`.
pub const TITLE_BOILERPLATE: &str = "Newsroom der  - ";

/// Icon class that marks the PDF download link.
pub const PDF_ICON_CLASS: &str = "fa fa-file-pdf-o";

static NEWS_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<class_marker>a class="" )(?P<href_marker>href=")(?P<href_prefix>[^"]*?)(?P<path_marker>news_id/)(?P<numeric_id>\d+)(?P<lang_marker>/lang/)"#,
    )
    .unwrap()
});
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title>(?P<text>.*?)</title>").unwrap());
static PDF_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"i class="(?P<icon>{})[^"]*"[^>]*>.*?href="(?P<href>[^"]*)" rel="#,
        regex::escape(PDF_ICON_CLASS)
    ))
    .unwrap()
});

/// One press-release anchor on an index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsLink {
    /// Everything in the href before `news_id/`.
    pub href_prefix: String,
    pub numeric_id: String,
}

/// All press-release anchors in `body`, in markup order.
pub fn news_links(body: &str) -> Vec<NewsLink> {
    NEWS_ID_RE
        .captures_iter(body)
        .map(|caps| NewsLink {
            href_prefix: caps["href_prefix"].to_string(),
            numeric_id: caps["numeric_id"].to_string(),
        })
        .collect()
}

/// Press-release address for `id` under `base` (normally [`DETAIL_BASE_URL`]).
pub fn detail_url(base: &str, id: &str) -> String {
    format!("{}{}", base, id)
}

/// Text of the first `<title>`, minus the site-name prefix.
pub fn title(body: &str) -> Option<String> {
    let caps = TITLE_RE.captures(body)?;
    let text = &caps["text"];
    let text = text.strip_prefix(TITLE_BOILERPLATE).unwrap_or(text);
    Some(text.trim().to_string())
}

/// href of the anchor that follows the PDF icon.
pub fn pdf_link(body: &str) -> Option<String> {
    PDF_LINK_RE
        .captures(body)
        .map(|caps| caps["href"].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_ids(body: &str) -> Vec<String> {
        news_links(body).into_iter().map(|l| l.numeric_id).collect()
    }

    #[test]
    fn extracts_numeric_id() {
        let html = r#"<a class="" href="https://x/news_id/123456/lang/22/id/">Launch</a>"#;
        assert_eq!(page_ids(html), vec!["123456".to_string()]);
    }

    #[test]
    fn named_groups_carry_prefix() {
        let html = r#"<a class="" href="https://myconvento.com/public/newsroom/data/plugin/news/run/show_news/news_id/3107954/lang/22/id/">"#;
        let links = news_links(html);
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].href_prefix,
            "https://myconvento.com/public/newsroom/data/plugin/news/run/show_news/"
        );
        assert_eq!(links[0].numeric_id, "3107954");
    }

    #[test]
    fn ignores_malformed_anchors() {
        let wrong_class = r#"<a class="btn" href="https://x/news_id/111/lang/22/">"#;
        let no_lang = r#"<a class="" href="https://x/news_id/222/id/">"#;
        let not_numeric = r#"<a class="" href="https://x/news_id/abc/lang/22/">"#;
        assert!(page_ids(wrong_class).is_empty());
        assert!(page_ids(no_lang).is_empty());
        assert!(page_ids(not_numeric).is_empty());
    }

    #[test]
    fn finds_every_anchor_on_one_line() {
        let html = concat!(
            r#"<li><a class="" href="/a/news_id/1/lang/22/">A</a></li>"#,
            r#"<li><a class="" href="/b/news_id/2/lang/22/">B</a></li>"#,
            r#"<li><a class="" href="/c/news_id/1/lang/22/">A again</a></li>"#,
        );
        assert_eq!(page_ids(html), vec!["1", "2", "1"]);
    }

    #[test]
    fn detail_url_appends_id() {
        assert_eq!(
            detail_url(DETAIL_BASE_URL, "2998166"),
            "https://myconvento.com/public/newsroom/data/plugin/news/run/show_news/news_id/2998166"
        );
        assert_eq!(detail_url("http://mirror/n/", "7"), "http://mirror/n/7");
    }

    #[test]
    fn strips_title_boilerplate() {
        assert_eq!(
            title("<title>Newsroom der  - Acme Launch</title>").as_deref(),
            Some("Acme Launch")
        );
        assert_eq!(title("<title>Other</title>").as_deref(), Some("Other"));
    }

    #[test]
    fn boilerplate_only_stripped_at_start() {
        assert_eq!(
            title("<title>Report: Newsroom der  - x</title>").as_deref(),
            Some("Report: Newsroom der  - x")
        );
    }

    #[test]
    fn missing_title_is_none() {
        assert_eq!(title("<html><head></head></html>"), None);
    }

    #[test]
    fn extracts_pdf_link() {
        let html = r#"<i class="fa fa-file-pdf-o"></i> <a href="https://x/pdf.php?id=ABC" rel="nofollow">PDF</a>"#;
        assert_eq!(pdf_link(html).as_deref(), Some("https://x/pdf.php?id=ABC"));
    }

    #[test]
    fn pdf_icon_may_carry_extra_classes() {
        let html = r#"<i class="fa fa-file-pdf-o fa-lg"></i> <a href="https://x/pdf.php?id=ABC" rel="nofollow">"#;
        assert_eq!(pdf_link(html).as_deref(), Some("https://x/pdf.php?id=ABC"));
    }

    #[test]
    fn pdf_link_requires_icon() {
        let html = r#"<i class="fa fa-file-word-o"></i> <a href="https://x/doc.php?id=ABC" rel="nofollow">DOC</a>"#;
        assert_eq!(pdf_link(html), None);
    }
}
