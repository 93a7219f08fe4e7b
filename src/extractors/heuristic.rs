//! Heuristic extraction
//!
//! Infers title, summary and main content from structure and text density
//! alone, the way a crawler without semantic hints has to. Explicit markers
//! are never consulted for values.

use tracing::{debug, trace};

use super::markup::markup_present;
use super::meta::{read_meta, MetaTags};
use super::{ExtractionResult, FieldOutcome, Fields, Provenance};
use crate::config::HeuristicConfig;
use crate::document::{truncate_chars, Document, NodeIdx};
use crate::vocabulary::Vocabulary;

/// Block-level elements counted by the summary window
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "nav", "aside", "h1", "h2",
    "h3", "h4", "h5", "h6", "ul", "ol", "li", "table", "blockquote", "pre", "figure", "form",
];

/// Containers that may hold the main content
const CANDIDATE_TAGS: &[&str] = &[
    "div", "section", "article", "main", "td", "blockquote", "pre", "li", "form",
];

pub struct HeuristicExtractor<'a> {
    config: &'a HeuristicConfig,
    vocabulary: &'a Vocabulary,
}

impl<'a> HeuristicExtractor<'a> {
    pub fn new(config: &'a HeuristicConfig, vocabulary: &'a Vocabulary) -> Self {
        Self { config, vocabulary }
    }

    pub fn extract(&self, doc: &Document) -> ExtractionResult {
        let meta = read_meta(doc);

        let fields = Fields {
            title: FieldOutcome::from_option(self.title(doc, &meta), Provenance::Heuristic),
            summary: FieldOutcome::from_option(self.summary(doc, &meta), Provenance::Heuristic),
            main_content: FieldOutcome::from_option(self.main_content(doc), Provenance::Heuristic),
        };
        debug!(
            title = fields.title.found,
            summary = fields.summary.found,
            main_content = fields.main_content.found,
            "heuristic extraction finished"
        );

        ExtractionResult::new(
            fields,
            markup_present(doc, self.vocabulary),
            Vec::new(),
            Vec::new(),
        )
    }

    /// First `<h1>`, then `<title>`, then social titles
    fn title(&self, doc: &Document, meta: &MetaTags) -> Option<String> {
        doc.iter()
            .filter(|(_, node)| node.tag == "h1")
            .map(|(idx, _)| doc.text_of(idx))
            .find(|text| !text.is_empty())
            .or_else(|| meta.title.clone())
            .or_else(|| meta.og("title").map(String::from))
            .or_else(|| meta.twitter("title").map(String::from))
    }

    /// Meta description, else the first substantial paragraph near the top
    fn summary(&self, doc: &Document, meta: &MetaTags) -> Option<String> {
        if let Some(description) = meta
            .description()
            .or_else(|| meta.og("description"))
            .or_else(|| meta.twitter("description"))
        {
            return Some(description.to_string());
        }

        let mut blocks = 0;
        for idx in body_elements(doc) {
            let node = doc.node(idx);
            if !BLOCK_TAGS.contains(&node.tag.as_str()) {
                continue;
            }
            if blocks >= self.config.summary_block_window {
                break;
            }
            blocks += 1;

            if node.tag == "p"
                && doc.text_len(idx) >= self.config.summary_min_chars
                && !doc.in_landmark(idx)
            {
                return Some(doc.text_of(idx));
            }
        }
        None
    }

    /// Densest non-landmark block; ties keep the earlier block
    fn main_content(&self, doc: &Document) -> Option<String> {
        let mut best: Option<(NodeIdx, f64)> = None;

        for idx in body_elements(doc) {
            let node = doc.node(idx);
            if !CANDIDATE_TAGS.contains(&node.tag.as_str())
                || doc.text_len(idx) < self.config.min_candidate_chars
            {
                continue;
            }
            if doc.in_landmark(idx) {
                trace!(idx, tag = %node.tag, "skipping landmark block");
                continue;
            }

            let score = doc.density(idx);
            trace!(idx, tag = %node.tag, score, "scored block");
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }

        best.map(|(idx, _)| truncate_chars(&doc.text_of(idx), self.config.preview_chars))
    }
}

/// Descendants of `<body>` in document order
fn body_elements(doc: &Document) -> impl Iterator<Item = NodeIdx> + '_ {
    let body = doc.body();
    doc.iter()
        .map(|(idx, _)| idx)
        .filter(move |idx| body.is_some_and(|b| doc.contains(b, *idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{vocabulary, Field};

    fn extract(html: &str) -> ExtractionResult {
        let config = HeuristicConfig::default();
        let doc = Document::parse(html).unwrap();
        HeuristicExtractor::new(&config, vocabulary()).extract(&doc)
    }

    fn value(result: &ExtractionResult, field: Field) -> Option<&str> {
        result.field(field).value.as_deref()
    }

    #[test]
    fn test_title_prefers_h1() {
        let html = r#"
        <html><head><title>Site | Page</title></head>
        <body><h1>  Real   Headline </h1></body></html>
        "#;
        assert_eq!(value(&extract(html), Field::Title), Some("Real Headline"));
    }

    #[test]
    fn test_title_falls_back_to_title_tag_then_og() {
        let html = "<html><head><title>Only Title</title></head><body><p>x</p></body></html>";
        assert_eq!(value(&extract(html), Field::Title), Some("Only Title"));

        let html = r#"<html><head><meta property="og:title" content="OG"></head><body></body></html>"#;
        assert_eq!(value(&extract(html), Field::Title), Some("OG"));

        let html = "<html><body><p>nothing</p></body></html>";
        assert!(!extract(html).field(Field::Title).found);
    }

    #[test]
    fn test_summary_prefers_meta_description() {
        let html = r#"
        <html><head>
            <meta property="og:description" content="From OpenGraph">
            <meta name="description" content="From meta">
        </head><body><p>short</p></body></html>
        "#;
        assert_eq!(value(&extract(html), Field::Summary), Some("From meta"));
    }

    #[test]
    fn test_summary_first_long_paragraph() {
        let long = "This paragraph is comfortably longer than the eighty character minimum for summaries.";
        let html = format!(
            r#"<html><body>
                <nav><p>{long} (nav copy)</p></nav>
                <p>Too short.</p>
                <p>{long}</p>
            </body></html>"#
        );
        assert_eq!(value(&extract(&html), Field::Summary), Some(long));
    }

    #[test]
    fn test_summary_window_is_bounded() {
        let long = "x".repeat(120);
        let mut html = String::from("<html><body>");
        for _ in 0..25 {
            html.push_str("<p>short</p>");
        }
        html.push_str(&format!("<p>{long}</p></body></html>"));
        assert!(!extract(&html).field(Field::Summary).found);
    }

    #[test]
    fn test_main_content_picks_densest_block() {
        let html = r#"
        <html><body>
            <div id="links"><a>one</a><a>two</a><a>three</a><a>four</a><a>five</a><a>six</a></div>
            <div id="story">A long run of plain article text with hardly any markup in it at all.</div>
        </body></html>
        "#;
        let content = value(&extract(html), Field::MainContent).unwrap().to_string();
        assert!(content.starts_with("A long run of plain article text"));
    }

    #[test]
    fn test_main_content_never_from_landmark() {
        let nav_text = "n".repeat(2000);
        let html = format!(
            r#"<html><body>
                <nav><div>{nav_text}</div></nav>
                <aside><section>{nav_text}</section></aside>
                <footer><div>{nav_text}</div></footer>
                <div role="navigation"><div>{nav_text}</div></div>
                <div><p>Modest article body text.</p><p>Second paragraph of the article.</p></div>
            </body></html>"#
        );
        let content = value(&extract(&html), Field::MainContent).unwrap().to_string();
        assert!(content.starts_with("Modest article body text."));
        assert!(!content.contains("nnnn"));
    }

    #[test]
    fn test_main_content_preview_truncated() {
        let html = format!("<html><body><article>{}</article></body></html>", "é".repeat(900));
        let content = value(&extract(&html), Field::MainContent).unwrap().to_string();
        assert_eq!(content.chars().count(), 500);
    }

    #[test]
    fn test_scripts_do_not_inflate_density() {
        let script = "var x = 1;".repeat(200);
        let html = format!(
            r#"<html><body>
                <div id="a"><script>{script}</script>tiny text here in div a ok</div>
                <div id="b">Real content that should win the density contest easily.</div>
            </body></html>"#
        );
        let content = value(&extract(&html), Field::MainContent).unwrap().to_string();
        assert!(content.starts_with("Real content"));
    }

    #[test]
    fn test_markers_never_supply_heuristic_values() {
        let html = r#"
        <html><body>
            <span data-ai-title="Marker Title">ignored</span>
            <h1>Heading</h1>
        </body></html>
        "#;
        let result = extract(html);
        assert_eq!(value(&result, Field::Title), Some("Heading"));
        assert!(result.markup_detected);
        assert!(result.markers_found.is_empty());
        assert_eq!(result.resolved_via_markup(), 0);
    }
}
