// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Citation extraction from backend replies.
//!
//! Two sources feed one citation list, grounding citations first:
//! 1. structured web grounding chunks on the reply;
//! 2. inline `[Source: label, Context: "excerpt"]` markers in the text,
//!    which are stripped from the displayed answer.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use hive_core::contract::GenerateResponse;
use hive_core::types::Citation;

/// Label used when a grounding chunk has no title.
pub const WEB_SOURCE_LABEL: &str = "Web Source";

/// Context used when an inline marker carries no excerpt.
pub const NO_EXCERPT_LABEL: &str = "Referenced in document";

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[Source:\s*([^,\]]+)(?:,\s*Context:\s*"([^"]+)")?\]"#).unwrap()
});

/// Display text and citations derived from one reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedAnswer {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Post-processes a backend reply. Swappable so the marker grammar can
/// change without touching request assembly.
pub trait CitationExtractor: Send + Sync {
    fn extract(&self, response: &GenerateResponse) -> ExtractedAnswer;
}

/// Extracts grounding citations and bracket-marker citations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerCitationExtractor;

impl MarkerCitationExtractor {
    /// Citations from web grounding chunks, in chunk order.
    pub fn grounding_citations(response: &GenerateResponse) -> Vec<Citation> {
        response
            .grounding_chunks()
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .map(|web| Citation {
                source: web
                    .title
                    .clone()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| WEB_SOURCE_LABEL.to_string()),
                context: web.uri.clone(),
            })
            .collect()
    }

    /// Inline marker citations, deduplicated in first-seen order, and the
    /// text with every marker removed. When no marker matches, the text is
    /// returned untouched.
    pub fn marker_citations(text: &str) -> (String, Vec<Citation>) {
        let mut seen = HashSet::new();
        let mut citations = Vec::new();
        for caps in MARKER.captures_iter(text) {
            let citation = Citation {
                source: caps[1].trim().to_string(),
                context: caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| NO_EXCERPT_LABEL.to_string()),
            };
            if seen.insert(citation.clone()) {
                citations.push(citation);
            }
        }
        if citations.is_empty() {
            return (text.to_string(), citations);
        }
        let cleaned = MARKER.replace_all(text, "").trim().to_string();
        (cleaned, citations)
    }
}

impl CitationExtractor for MarkerCitationExtractor {
    fn extract(&self, response: &GenerateResponse) -> ExtractedAnswer {
        let mut citations = Self::grounding_citations(response);
        let (text, inline) = Self::marker_citations(&response.text);
        citations.extend(inline);
        ExtractedAnswer { text, citations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::contract::{Candidate, GroundingChunk, GroundingMetadata, WebSource};

    #[test]
    fn duplicate_markers_collapse_to_one_citation() {
        let raw = r#"Paris is the capital. [Source: doc1.pdf, Context: "located in France"] More info. [Source: doc1.pdf, Context: "located in France"]"#;
        let answer = MarkerCitationExtractor.extract(&GenerateResponse::from_text(raw));
        assert_eq!(
            answer.citations,
            vec![Citation {
                source: "doc1.pdf".into(),
                context: "located in France".into(),
            }]
        );
        assert!(!answer.text.contains("[Source"));
        assert!(answer.text.starts_with("Paris is the capital."));
        assert!(answer.text.ends_with("More info."));
    }

    #[test]
    fn marker_without_excerpt_uses_default_context() {
        let (_, citations) = MarkerCitationExtractor::marker_citations("See [Source: notes.md].");
        assert_eq!(citations[0].source, "notes.md");
        assert_eq!(citations[0].context, NO_EXCERPT_LABEL);
    }

    #[test]
    fn same_source_with_different_excerpts_is_kept() {
        let raw = r#"[Source: a.pdf, Context: "one"] [Source: a.pdf, Context: "two"] [Source: a.pdf, Context: "one"]"#;
        let (_, citations) = MarkerCitationExtractor::marker_citations(raw);
        let contexts: Vec<&str> = citations.iter().map(|c| c.context.as_str()).collect();
        assert_eq!(contexts, vec!["one", "two"]);
    }

    #[test]
    fn text_without_markers_is_unchanged() {
        let raw = "  plain answer [not a marker]  ";
        let answer = MarkerCitationExtractor.extract(&GenerateResponse::from_text(raw));
        assert_eq!(answer.text, raw);
        assert!(answer.citations.is_empty());
    }

    #[test]
    fn grounding_citations_come_first_with_title_fallback() {
        let response = GenerateResponse {
            text: r#"Answer [Source: kb.txt, Context: "line"]"#.into(),
            candidates: vec![Candidate {
                grounding_metadata: Some(GroundingMetadata {
                    grounding_chunks: vec![
                        GroundingChunk {
                            web: Some(WebSource {
                                uri: "https://example.org/a".into(),
                                title: Some("Example".into()),
                            }),
                        },
                        GroundingChunk { web: None },
                        GroundingChunk {
                            web: Some(WebSource {
                                uri: "https://example.org/b".into(),
                                title: None,
                            }),
                        },
                    ],
                }),
            }],
        };
        let answer = MarkerCitationExtractor.extract(&response);
        let sources: Vec<&str> = answer.citations.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["Example", WEB_SOURCE_LABEL, "kb.txt"]);
        assert_eq!(answer.citations[1].context, "https://example.org/b");
        assert_eq!(answer.text, "Answer");
    }
}
