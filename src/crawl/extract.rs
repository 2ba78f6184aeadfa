use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Elements whose text never counts as visible page text.
const HIDDEN_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "nav", "header", "footer",
];

/// Text of the first `<title>` in document order.
///
/// `None` means the document has no title element at all. A title that is
/// present but blank yields `Some("")`. Entities are decoded by the parser
/// and whitespace runs are collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TITLE)
        .next()
        .map(|title| clean_text(&title.text().collect::<String>()))
}

/// Absolute http(s) links found in `<a href>` attributes, resolved against
/// `base`, de-duplicated and sorted. Bare fragments are skipped.
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let links: BTreeSet<Url> = document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .collect();
    links.into_iter().collect()
}

/// Visible body text, whitespace-collapsed.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }

    clean_text(&text)
}

/// Trim and collapse every whitespace run to a single space.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_title() {
        let html = "<html><head><title>Example</title></head><body></body></html>";
        assert_eq!(extract_title(html).as_deref(), Some("Example"));
    }

    #[test]
    fn decodes_entities() {
        let html = "<html><head><title>A &amp; B</title></head></html>";
        assert_eq!(extract_title(html).as_deref(), Some("A & B"));

        let html = "<title>&lt;Caf&eacute;&gt; &#8212; &#x41;</title>";
        assert_eq!(extract_title(html).as_deref(), Some("<Café> \u{2014} A"));
    }

    #[test]
    fn missing_title_is_none() {
        let html = "<html><head><meta charset=\"utf-8\"></head><body><h1>Hi</h1></body></html>";
        assert_eq!(extract_title(html), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn empty_title_is_distinct_from_missing() {
        assert_eq!(extract_title("<title></title>").as_deref(), Some(""));
        assert_eq!(extract_title("<title>  \n\t </title>").as_deref(), Some(""));
    }

    #[test]
    fn first_title_wins() {
        let html = "<head><title>First</title></head><body><title>Second</title></body>";
        assert_eq!(extract_title(html).as_deref(), Some("First"));
    }

    #[test]
    fn collapses_whitespace() {
        let html = "<title>\n    Release notes\n    |   Project\n</title>";
        assert_eq!(extract_title(html).as_deref(), Some("Release notes | Project"));
    }

    #[test]
    fn tolerates_malformed_markup() {
        let html = "<html><head><title>Broken page</title><body><div><p>unclosed <b>tags";
        assert_eq!(extract_title(html).as_deref(), Some("Broken page"));

        // Unterminated title: the parser takes the rest of the input as its text.
        let html = "<title>Dangling";
        assert_eq!(extract_title(html).as_deref(), Some("Dangling"));
    }

    #[test]
    fn markup_inside_title_is_text() {
        let html = "<title>a <b>bold</b> move</title>";
        assert_eq!(extract_title(html).as_deref(), Some("a <b>bold</b> move"));
    }

    #[test]
    fn extraction_is_repeatable() {
        let html = "<title>Same</title>";
        assert_eq!(extract_title(html), extract_title(html));
    }

    #[test]
    fn links_are_resolved_filtered_and_sorted() {
        let base = Url::parse("https://example.com/docs/index.html").unwrap();
        let html = r##"
            <a href="/about">About</a>
            <a href="guide.html">Guide</a>
            <a href=" https://other.org/ ">Other</a>
            <a href="#top">Top</a>
            <a href="">Empty</a>
            <a href="mailto:me@example.com">Mail</a>
            <a href="javascript:void(0)">JS</a>
            <a href="/about">About again</a>
            <a>No href</a>
        "##;

        let links: Vec<String> = extract_links(html, &base)
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(
            links,
            vec![
                "https://example.com/about",
                "https://example.com/docs/guide.html",
                "https://other.org/",
            ]
        );
    }

    #[test]
    fn no_links_gives_empty_list() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(extract_links("<p>nothing here</p>", &base).is_empty());
    }

    #[test]
    fn visible_text_skips_chrome_and_scripts() {
        let html = r#"
            <html>
              <head><title>Ignored</title><style>p { color: red }</style></head>
              <body>
                <header>Site header</header>
                <nav><a href="/">Home</a></nav>
                <main><h1>Heading</h1><p>First   paragraph.</p>
                <script>var x = 1;</script><p>Second &amp; last.</p></main>
                <footer>Copyright</footer>
              </body>
            </html>
        "#;
        assert_eq!(extract_text(html), "Heading First paragraph. Second & last.");
    }

    #[test]
    fn clean_text_trims_and_collapses() {
        assert_eq!(clean_text("  a \n\n b\tc  "), "a b c");
        assert_eq!(clean_text(" \n "), "");
    }
}
