use crate::glossary::Glossary;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// First occurrence of a glossary term inside a paragraph.
///
/// Offsets are byte offsets into the paragraph and always fall on char
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMatch {
    pub term: String,
    pub matched_text: String,
    pub start: usize,
    pub len: usize,
}

impl TermMatch {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Finds a literal term flanked by word boundaries, ignoring case.
pub struct BoundaryMatcher {
    term: String,
    pattern: Regex,
}

impl BoundaryMatcher {
    /// Compiles a matcher for `term`. Returns `None` for an empty term.
    pub fn new(term: &str) -> Option<Self> {
        if term.trim().is_empty() {
            return None;
        }
        let source = format!(r"\b{}\b", regex::escape(term));
        match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(pattern) => Some(Self {
                term: term.to_string(),
                pattern,
            }),
            Err(err) => {
                warn!(term, error = %err, "failed to compile term matcher");
                None
            }
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn find_first(&self, text: &str) -> Option<TermMatch> {
        self.pattern.find(text).map(|found| TermMatch {
            term: self.term.clone(),
            matched_text: found.as_str().to_string(),
            start: found.start(),
            len: found.len(),
        })
    }
}

/// Convenience wrapper over [`BoundaryMatcher`] for a one-off search.
pub fn find_term(text: &str, term: &str) -> Option<TermMatch> {
    BoundaryMatcher::new(term).and_then(|matcher| matcher.find_first(text))
}

/// Locates the first occurrence of every glossary term in `text`.
///
/// The result is ordered by start offset and never overlaps: a match that
/// begins inside an earlier kept match is dropped. Identical starts keep the
/// lexically smaller key. Keeping the earlier match is deliberate: it is the
/// one the readable cursor reaches first, so dropping it would re-split text.
pub fn locate(text: &str, glossary: &Glossary) -> Vec<TermMatch> {
    let mut matches: Vec<TermMatch> = glossary
        .terms()
        .filter_map(|term| find_term(text, term))
        .collect();
    matches.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.term.cmp(&b.term)));

    let mut ordered: Vec<TermMatch> = Vec::with_capacity(matches.len());
    for candidate in matches {
        if let Some(last) = ordered.last() {
            if candidate.start < last.end() {
                continue;
            }
        }
        ordered.push(candidate);
    }
    ordered
}
