//! Explicit marker (`data-ai-*`) extraction
//!
//! One pass over the arena records every marker attribute and collects
//! candidates per field; the mapping rules then pick one candidate each.
//!
//! - title: headline markers, preferring the first one inside the densest
//!   structural container (`main`, `article`, `data-ai-intent="article"`)
//! - summary: the first introductory marker near the top of the document
//! - main content: the body/section marker holding the most text

use tracing::debug;

use super::{ExtractionResult, FieldOutcome, Fields, MarkerRecord, Provenance, SelectionNote};
use crate::config::MarkupConfig;
use crate::document::{truncate_chars, Document, NodeIdx};
use crate::vocabulary::{Field, Marker, Vocabulary};

const CONTAINER_TAGS: &[&str] = &["main", "article"];

#[derive(Debug)]
struct Candidate {
    idx: NodeIdx,
    value: String,
}

/// Whether any recognized marker exists anywhere in the document
pub fn markup_present(doc: &Document, vocabulary: &Vocabulary) -> bool {
    doc.iter().any(|(_, node)| {
        node.attrs
            .iter()
            .any(|(name, value)| vocabulary.classify(name, value).is_some())
    })
}

pub struct MarkupLocator<'a> {
    config: &'a MarkupConfig,
    vocabulary: &'a Vocabulary,
}

impl<'a> MarkupLocator<'a> {
    pub fn new(config: &'a MarkupConfig, vocabulary: &'a Vocabulary) -> Self {
        Self { config, vocabulary }
    }

    pub fn locate(&self, doc: &Document) -> ExtractionResult {
        let mut markers_found = Vec::new();
        let mut markup_detected = false;
        let mut pools: [Vec<Candidate>; 3] = Default::default();
        let mut containers = Vec::new();

        for (idx, node) in doc.iter() {
            // (field, direct value) for every rule this element satisfies
            let mut roles: Vec<(Field, Option<&str>)> = Vec::new();
            let mut is_container = CONTAINER_TAGS.contains(&node.tag.as_str());

            for (name, value) in &node.attrs {
                if !self.vocabulary.is_marker_attr(name) {
                    continue;
                }
                markers_found.push(MarkerRecord {
                    tag: node.tag.clone(),
                    name: name.clone(),
                    value: truncate_chars(value, self.config.marker_value_chars),
                });

                let Some(marker) = self.vocabulary.classify(name, value) else {
                    continue;
                };
                markup_detected = true;
                match marker {
                    Marker::Category(category) => {
                        if let Some(field) = self.vocabulary.field_for(category) {
                            roles.push((field, None));
                        }
                    }
                    Marker::Direct(field) => {
                        let direct = Some(value.trim()).filter(|v| !v.is_empty());
                        roles.push((field, direct));
                    }
                    Marker::Intent(intent) => {
                        is_container |= self.vocabulary.is_scope_intent(intent);
                    }
                    Marker::Confidence(_) | Marker::Importance(_) => {}
                }
            }

            if is_container {
                containers.push(idx);
            }

            for (slot, field) in Field::ALL.iter().enumerate() {
                let mut matching = roles.iter().filter(|(f, _)| f == field).peekable();
                if matching.peek().is_none() {
                    continue;
                }
                let value = match matching.find_map(|(_, direct)| *direct) {
                    Some(direct) => direct.to_string(),
                    None => doc.text_of(idx),
                };
                if !value.is_empty() {
                    pools[slot].push(Candidate { idx, value });
                }
            }
        }

        let [titles, summaries, bodies] = pools;
        let mut notes = Vec::new();

        let title = self.select_title(doc, titles, &containers, &mut notes);
        let summary = self.select_summary(summaries, &mut notes);
        let main_content = self.select_main_content(bodies, &mut notes);

        let fields = Fields {
            title: FieldOutcome::from_option(title, Provenance::Waio),
            summary: FieldOutcome::from_option(summary, Provenance::Waio),
            main_content: FieldOutcome::from_option(main_content, Provenance::Waio),
        };
        debug!(
            markup_detected,
            markers = markers_found.len(),
            resolved = fields.count_found(),
            "markup extraction finished"
        );

        ExtractionResult::new(fields, markup_detected, markers_found, notes)
    }

    fn select_title(
        &self,
        doc: &Document,
        candidates: Vec<Candidate>,
        containers: &[NodeIdx],
        notes: &mut Vec<SelectionNote>,
    ) -> Option<String> {
        // Ties keep the earlier container
        let densest = containers.iter().copied().fold(None, |best, c| match best {
            Some(b) if doc.density(b) >= doc.density(c) => Some(b),
            _ => Some(c),
        });

        let scoped = densest.and_then(|container| {
            candidates
                .iter()
                .position(|cand| cand.idx == container || doc.contains(container, cand.idx))
                .map(|pos| (pos, container))
        });

        let (pos, rule) = match scoped {
            Some((pos, container)) => (
                pos,
                format!(
                    "headline marker inside densest container <{}>",
                    doc.node(container).tag
                ),
            ),
            None if !candidates.is_empty() => (0, "first headline marker in document order".to_string()),
            None => return None,
        };

        notes.push(SelectionNote {
            field: Field::Title,
            rule,
        });
        candidates.into_iter().nth(pos).map(|c| c.value)
    }

    fn select_summary(
        &self,
        candidates: Vec<Candidate>,
        notes: &mut Vec<SelectionNote>,
    ) -> Option<String> {
        let limit = self.config.summary_scan_limit;
        let chosen = candidates.into_iter().find(|c| c.idx < limit)?;
        notes.push(SelectionNote {
            field: Field::Summary,
            rule: "first introductory marker near the top".to_string(),
        });
        Some(chosen.value)
    }

    fn select_main_content(
        &self,
        candidates: Vec<Candidate>,
        notes: &mut Vec<SelectionNote>,
    ) -> Option<String> {
        let mut best: Option<(usize, Candidate)> = None;
        for cand in candidates {
            let len = cand.value.chars().count();
            if best.as_ref().map_or(true, |(top, _)| len > *top) {
                best = Some((len, cand));
            }
        }

        let (len, chosen) = best?;
        notes.push(SelectionNote {
            field: Field::MainContent,
            rule: format!("longest body marker ({len} chars)"),
        });
        Some(truncate_chars(&chosen.value, self.config.preview_chars))
    }
}
