use crate::glossary::same_term;
use crate::locator::{TermMatch, find_term};
use serde::{Deserialize, Serialize};

/// Separator revealed between a looked-up term and its definition.
pub const REVEAL_SEPARATOR: char = '-';

/// One piece of a rendered paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Plain {
        content: String,
    },
    Term {
        term: String,
        text: String,
        is_active: bool,
    },
    /// A single character of the definition reveal. `delay_index` only
    /// orders the reveal; timing is up to the presentation layer.
    RevealChar {
        ch: char,
        delay_index: usize,
    },
}

impl Segment {
    pub fn plain(content: impl Into<String>) -> Self {
        Segment::Plain {
            content: content.into(),
        }
    }

    /// Text this segment contributes to the paragraph itself.
    pub fn paragraph_text(&self) -> Option<&str> {
        match self {
            Segment::Plain { content } => Some(content),
            Segment::Term { text, .. } => Some(text),
            Segment::RevealChar { .. } => None,
        }
    }
}

/// Partitions `text` into plain spans and interactive term spans.
///
/// `matches` must be ordered by start offset, as produced by
/// [`crate::locate`]. Matches that begin behind the cursor are skipped.
pub fn build_readable(text: &str, matches: &[TermMatch], active_term: Option<&str>) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(matches.len() * 2 + 1);
    let mut cursor = 0usize;

    for found in matches {
        if found.start < cursor
            || !text.is_char_boundary(found.start)
            || !text.is_char_boundary(found.end())
        {
            continue;
        }
        if found.start > cursor {
            segments.push(Segment::plain(&text[cursor..found.start]));
        }
        let is_active = active_term.is_some_and(|active| same_term(active, &found.term));
        segments.push(Segment::Term {
            term: found.term.clone(),
            text: text[found.start..found.end()].to_string(),
            is_active,
        });
        cursor = found.end();
    }

    if cursor < text.len() {
        segments.push(Segment::plain(&text[cursor..]));
    }
    segments
}

/// Renders `text` with only `active_term` highlighted and its definition
/// appended as a character-by-character reveal.
///
/// Falls back to a single plain segment when the term cannot be found.
pub fn build_lookup(text: &str, active_term: &str, definition: Option<&str>) -> Vec<Segment> {
    let Some(found) = find_term(text, active_term) else {
        return vec![Segment::plain(text)];
    };

    let definition = definition.unwrap_or_default();
    let mut segments = Vec::with_capacity(definition.chars().count() + 3);
    if found.start > 0 {
        segments.push(Segment::plain(&text[..found.start]));
    }
    segments.push(Segment::Term {
        term: active_term.to_string(),
        text: found.matched_text,
        is_active: true,
    });
    let reveal = std::iter::once(REVEAL_SEPARATOR).chain(definition.chars());
    segments.extend(
        reveal
            .enumerate()
            .map(|(delay_index, ch)| Segment::RevealChar { ch, delay_index }),
    );
    segments
}

/// Concatenates the paragraph text carried by plain and term segments.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().filter_map(Segment::paragraph_text).collect()
}

/// Concatenates the revealed characters, separator included.
pub fn reveal_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::RevealChar { ch, .. } => Some(*ch),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glossary::Glossary;
    use crate::locator::locate;

    const ART_TEXT: &str = "I believe there's something fascinating in art and design.";

    fn art_glossary() -> Glossary {
        Glossary::from_iter([("art", "a skill")])
    }

    #[test]
    fn readable_splits_around_a_single_term() {
        let matches = locate(ART_TEXT, &art_glossary());
        let segments = build_readable(ART_TEXT, &matches, None);
        assert_eq!(
            segments,
            vec![
                Segment::plain("I believe there's something fascinating in "),
                Segment::Term {
                    term: "art".into(),
                    text: "art".into(),
                    is_active: false,
                },
                Segment::plain(" and design."),
            ]
        );
    }

    #[test]
    fn readable_flags_the_active_term() {
        let glossary = Glossary::from_iter([("art", "a"), ("design", "b")]);
        let matches = locate(ART_TEXT, &glossary);
        let segments = build_readable(ART_TEXT, &matches, Some("Design"));
        let flags: Vec<_> = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Term {
                    term, is_active, ..
                } => Some((term.as_str(), *is_active)),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![("art", false), ("design", true)]);
    }

    #[test]
    fn readable_is_lossless() {
        let glossary = Glossary::from_iter([
            ("kitschy", "a"),
            ("maximalism", "b"),
            ("aesthetic", "c"),
            ("art", "d"),
        ]);
        let texts = [
            "",
            "no terms here",
            "Art",
            "Kitschy maximalism, an aesthetic of ART—and art.",
            "“clean design” — aesthetic… art",
        ];
        for text in texts {
            let segments = build_readable(text, &locate(text, &glossary), None);
            assert_eq!(plain_text(&segments), text);
        }
    }

    #[test]
    fn readable_without_terms_is_one_plain_segment() {
        let segments = build_readable("just words", &[], None);
        assert_eq!(segments, vec![Segment::plain("just words")]);
    }

    #[test]
    fn readable_skips_matches_behind_the_cursor() {
        let text = "modern art matters";
        let matches = vec![
            TermMatch {
                term: "modern art".into(),
                matched_text: "modern art".into(),
                start: 0,
                len: 10,
            },
            TermMatch {
                term: "art".into(),
                matched_text: "art".into(),
                start: 7,
                len: 3,
            },
        ];
        let segments = build_readable(text, &matches, None);
        assert_eq!(segments.len(), 2);
        assert_eq!(plain_text(&segments), text);
    }

    #[test]
    fn lookup_appends_indexed_reveal() {
        let segments = build_lookup(ART_TEXT, "art", Some("a skill"));
        assert_eq!(
            segments[0],
            Segment::plain("I believe there's something fascinating in ")
        );
        assert_eq!(
            segments[1],
            Segment::Term {
                term: "art".into(),
                text: "art".into(),
                is_active: true,
            }
        );
        let reveal: Vec<_> = segments[2..]
            .iter()
            .map(|segment| match segment {
                Segment::RevealChar { ch, delay_index } => (*ch, *delay_index),
                other => panic!("unexpected segment {other:?}"),
            })
            .collect();
        let expected: Vec<_> = "-a skill".chars().zip(0..).collect();
        assert_eq!(reveal, expected);
        assert_eq!(reveal_text(&segments), "-a skill");
    }

    #[test]
    fn lookup_keeps_source_casing() {
        let segments = build_lookup("Kitschy decor", "kitschy", Some("x"));
        assert_eq!(
            segments[0],
            Segment::Term {
                term: "kitschy".into(),
                text: "Kitschy".into(),
                is_active: true,
            }
        );
    }

    #[test]
    fn lookup_without_definition_reveals_only_separator() {
        let segments = build_lookup(ART_TEXT, "art", None);
        assert_eq!(reveal_text(&segments), "-");
    }

    #[test]
    fn lookup_without_match_fails_soft() {
        let segments = build_lookup(ART_TEXT, "sculpture", Some("carved"));
        assert_eq!(segments, vec![Segment::plain(ART_TEXT)]);
    }

    #[test]
    fn segments_serialize_with_kind_tag() {
        let json = serde_json::to_value(Segment::RevealChar {
            ch: 'a',
            delay_index: 3,
        })
        .unwrap();
        assert_eq!(json["kind"], "reveal_char");
        assert_eq!(json["delay_index"], 3);
    }
}
