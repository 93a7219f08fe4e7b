//! Parsed document arena
//!
//! The HTML is parsed once with `scraper` and flattened into a preorder
//! arena of element nodes. Each node keeps an index back-reference to its
//! parent, so ancestor checks walk the parent chain without any owning
//! cycles. Script-like subtrees are dropped while flattening and therefore
//! never contribute text or tags.

use scraper::{Html, Node};
use tracing::trace;

use crate::error::ExtractError;

/// Index of an element in the arena (document order)
pub type NodeIdx = usize;

/// Elements whose content is never visible text
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Structural regions excluded from main-content candidacy
const LANDMARK_TAGS: &[&str] = &["nav", "header", "footer", "aside"];
const LANDMARK_ROLES: &[&str] = &["navigation", "banner", "contentinfo", "complementary"];

/// Share of control characters above which input is treated as binary
const MAX_CONTROL_RATIO: f64 = 0.10;

#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub parent: Option<NodeIdx>,
    /// Visible characters in the whole subtree
    text_chars: usize,
    /// Element descendants (script-like excluded)
    tag_count: usize,
    /// First text segment recorded at or after this node
    seg_start: usize,
}

impl DomNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_landmark(&self) -> bool {
        LANDMARK_TAGS.contains(&self.tag.as_str())
            || self
                .attr("role")
                .map(|r| LANDMARK_ROLES.iter().any(|l| r.eq_ignore_ascii_case(l)))
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
struct TextSegment {
    owner: NodeIdx,
    text: String,
}

/// Raw HTML plus its flattened element tree. Never mutated after parsing.
#[derive(Debug, Clone)]
pub struct Document {
    raw: String,
    nodes: Vec<DomNode>,
    segments: Vec<TextSegment>,
}

impl Document {
    /// Parse HTML text. Fails only when the text cannot be HTML at all.
    pub fn parse(html: &str) -> Result<Self, ExtractError> {
        check_plausible_html(html)?;

        let parsed = Html::parse_document(html);
        let mut doc = Document {
            raw: html.to_string(),
            nodes: Vec::new(),
            segments: Vec::new(),
        };
        doc.flatten(&parsed);
        doc.aggregate();

        trace!(
            elements = doc.nodes.len(),
            text_segments = doc.segments.len(),
            parse_errors = parsed.errors.len(),
            "parsed document"
        );
        Ok(doc)
    }

    /// Parse raw bytes; invalid UTF-8 counts as malformed input
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        let html = std::str::from_utf8(bytes)
            .map_err(|_| ExtractError::MalformedInput {
            reason: "invalid UTF-8".to_string(),
        })?;
        Self::parse(html)
    }

    fn flatten(&mut self, parsed: &Html) {
        let root = parsed.root_element();
        // (node, parent element)
        let mut stack = vec![(*root, None::<NodeIdx>)];

        while let Some((node, parent)) = stack.pop() {
            match node.value() {
                Node::Element(element) => {
                    let tag = element.name().to_ascii_lowercase();
                    if SKIPPED_TAGS.contains(&tag.as_str()) {
                        continue;
                    }
                    // Sorted so attribute order never depends on the parser
                    let mut attrs: Vec<(String, String)> = element
                        .attrs()
                        .map(|(n, v)| (n.to_string(), v.to_string()))
                        .collect();
                    attrs.sort();

                    let idx = self.nodes.len();
                    self.nodes.push(DomNode {
                        tag,
                        attrs,
                        parent,
                        text_chars: 0,
                        tag_count: 0,
                        seg_start: self.segments.len(),
                    });
                    let children: Vec<_> = node.children().collect();
                    for child in children.into_iter().rev() {
                        stack.push((child, Some(idx)));
                    }
                }
                Node::Text(text) => {
                    let Some(owner) = parent else { continue };
                    let collapsed = collapse_whitespace(text);
                    if collapsed.is_empty() {
                        continue;
                    }
                    self.nodes[owner].text_chars += collapsed.chars().count();
                    self.segments.push(TextSegment {
                        owner,
                        text: collapsed,
                    });
                }
                _ => {}
            }
        }
    }

    // Children always sit after their parent in preorder, so one reverse
    // sweep folds every subtree into its root.
    fn aggregate(&mut self) {
        for idx in (0..self.nodes.len()).rev() {
            if let Some(parent) = self.nodes[idx].parent {
                let (chars, tags) = (self.nodes[idx].text_chars, self.nodes[idx].tag_count);
                self.nodes[parent].text_chars += chars;
                self.nodes[parent].tag_count += tags + 1;
            }
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: NodeIdx) -> &DomNode {
        &self.nodes[idx]
    }

    /// Elements in document order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &DomNode)> {
        self.nodes.iter().enumerate()
    }

    /// One past the last descendant of `idx`
    fn subtree_end(&self, idx: NodeIdx) -> NodeIdx {
        idx + 1 + self.nodes[idx].tag_count
    }

    /// Whether `idx` lies strictly inside the subtree rooted at `ancestor`
    pub fn contains(&self, ancestor: NodeIdx, idx: NodeIdx) -> bool {
        idx > ancestor && idx < self.subtree_end(ancestor)
    }

    /// Parent chain of `idx`, nearest first
    pub fn ancestors(&self, idx: NodeIdx) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.nodes[idx].parent,
        }
    }

    /// Whether the node or any ancestor is a navigation-like landmark
    pub fn in_landmark(&self, idx: NodeIdx) -> bool {
        self.nodes[idx].is_landmark() || self.ancestors(idx).any(|a| self.nodes[a].is_landmark())
    }

    pub fn first_by_tag(&self, tag: &str) -> Option<NodeIdx> {
        self.nodes.iter().position(|n| n.tag == tag)
    }

    pub fn body(&self) -> Option<NodeIdx> {
        self.first_by_tag("body")
    }

    pub fn text_len(&self, idx: NodeIdx) -> usize {
        self.nodes[idx].text_chars
    }

    pub fn tag_count(&self, idx: NodeIdx) -> usize {
        self.nodes[idx].tag_count
    }

    /// Text characters per enclosed tag
    pub fn density(&self, idx: NodeIdx) -> f64 {
        self.text_len(idx) as f64 / self.tag_count(idx).max(1) as f64
    }

    /// Visible text of the subtree, whitespace collapsed, segments joined by
    /// single spaces.
    pub fn text_of(&self, idx: NodeIdx) -> String {
        let end = self.subtree_end(idx);
        let seg_end = if end < self.nodes.len() {
            self.nodes[end].seg_start
        } else {
            self.segments.len()
        };
        let mut out = String::new();
        for seg in &self.segments[self.nodes[idx].seg_start..seg_end] {
            if seg.owner < idx || seg.owner >= end {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&seg.text);
        }
        out
    }
}

pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeIdx>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let current = self.next?;
        self.next = self.doc.nodes[current].parent;
        Some(current)
    }
}

fn check_plausible_html(html: &str) -> Result<(), ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::MalformedInput {
            reason: "empty document".to_string(),
        });
    }

    let mut visible = 0usize;
    let mut control = 0usize;
    for c in html.chars().filter(|c| !c.is_whitespace()) {
        visible += 1;
        // NUL counts here; a stray one is a recoverable parse error
        if c.is_control() || c == char::REPLACEMENT_CHARACTER {
            control += 1;
        }
    }
    if visible > 0 && control as f64 / visible as f64 > MAX_CONTROL_RATIO {
        return Err(ExtractError::MalformedInput {
            reason: format!(
                "binary content ({control} of {visible} characters are control characters)"
            ),
        });
    }
    Ok(())
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `s` to at most `max` characters on a char boundary
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte, _)) => s[..byte].to_string(),
        None => s.to_string(),
    }
}
