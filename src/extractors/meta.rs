//! Document metadata: `<title>`, meta description, OpenGraph and Twitter Card
//!
//! Only the keys the heuristic path consults are kept. First occurrence wins
//! so the output does not depend on how often a site repeats its tags.

use std::collections::BTreeMap;

use crate::document::{collapse_whitespace, Document};

/// Metadata read from the document head (and stray meta tags elsewhere)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTags {
    /// Text of the first `<title>`
    pub title: Option<String>,
    /// `<meta name="description">`
    pub meta: BTreeMap<String, String>,
    /// `og:*` properties, prefix stripped
    pub og: BTreeMap<String, String>,
    /// `twitter:*` names, prefix stripped
    pub twitter: BTreeMap<String, String>,
}

impl MetaTags {
    pub fn description(&self) -> Option<&str> {
        self.meta.get("description").map(String::as_str)
    }

    pub fn og(&self, key: &str) -> Option<&str> {
        self.og.get(key).map(String::as_str)
    }

    pub fn twitter(&self, key: &str) -> Option<&str> {
        self.twitter.get(key).map(String::as_str)
    }
}

/// Read metadata from a parsed document
pub fn read_meta(doc: &Document) -> MetaTags {
    let mut tags = MetaTags::default();

    for (idx, node) in doc.iter() {
        if node.tag == "title" && tags.title.is_none() {
            let text = doc.text_of(idx);
            if !text.is_empty() {
                tags.title = Some(text);
            }
            continue;
        }
        if node.tag != "meta" {
            continue;
        }

        let content = match node.attr("content").map(collapse_whitespace) {
            Some(c) if !c.is_empty() => c,
            _ => continue,
        };

        // OpenGraph uses `property`, but plenty of sites put og: keys in `name`
        let key = node
            .attr("property")
            .or_else(|| node.attr("name"))
            .map(|k| k.trim().to_ascii_lowercase());
        let Some(key) = key else { continue };

        if let Some(og_key) = key.strip_prefix("og:") {
            tags.og.entry(og_key.to_string()).or_insert(content);
        } else if let Some(tw_key) = key.strip_prefix("twitter:") {
            tags.twitter.entry(tw_key.to_string()).or_insert(content);
        } else if key == "description" {
            tags.meta.entry(key).or_insert(content);
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_meta() {
        let html = r#"
        <html>
        <head>
            <title>  Test   Page </title>
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="An OG description">
            <meta property="og:title" content="Second OG Title">
            <meta name="twitter:card" content="summary_large_image">
            <meta name="description" content="Page description">
            <meta name="viewport" content="width=device-width">
            <meta name="keywords" content="rust, html">
            <meta name="author" content="Someone">
        </head>
        </html>
        "#;

        let doc = Document::parse(html).unwrap();
        let tags = read_meta(&doc);

        assert_eq!(tags.title.as_deref(), Some("Test Page"));
        assert_eq!(tags.og("title"), Some("OG Title"));
        assert_eq!(tags.og("description"), Some("An OG description"));
        assert_eq!(tags.twitter("card"), Some("summary_large_image"));
        assert_eq!(tags.description(), Some("Page description"));
        assert!(!tags.meta.contains_key("viewport"));
        assert!(!tags.meta.contains_key("keywords"));
        assert!(!tags.meta.contains_key("author"));
        assert_eq!(tags.meta.len(), 1);
    }

    #[test]
    fn test_missing_head() {
        let doc = Document::parse("<p>No head at all</p>").unwrap();
        let tags = read_meta(&doc);
        assert_eq!(tags, MetaTags::default());
    }
}
