use crate::glossary::Glossary;
use crate::locator::locate;
use crate::lookup::LookupState;
use crate::segment::{Segment, build_lookup, build_readable};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Readable,
    LookUp,
}

/// Everything the presentation layer needs to draw one paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphView {
    pub mode: ViewMode,
    pub active_term: Option<String>,
    pub readable: Vec<Segment>,
    pub lookup: Option<Vec<Segment>>,
}

impl ParagraphView {
    /// Segments for the current mode.
    pub fn segments(&self) -> &[Segment] {
        match (&self.mode, &self.lookup) {
            (ViewMode::LookUp, Some(lookup)) => lookup,
            _ => &self.readable,
        }
    }
}

/// A paragraph of plain text paired with the glossary it is annotated from.
#[derive(Debug, Clone, Copy)]
pub struct Paragraph<'a> {
    pub text: &'a str,
    pub glossary: &'a Glossary,
}

impl<'a> Paragraph<'a> {
    pub fn new(text: &'a str, glossary: &'a Glossary) -> Self {
        Self { text, glossary }
    }

    pub fn readable(&self, active_term: Option<&str>) -> Vec<Segment> {
        build_readable(self.text, &locate(self.text, self.glossary), active_term)
    }

    pub fn lookup(&self, term: &str) -> Vec<Segment> {
        build_lookup(self.text, term, self.glossary.definition(term))
    }

    /// Derives the view for `state`. Nothing is cached between calls.
    pub fn view(&self, state: &LookupState) -> ParagraphView {
        let active_term = state.active_term();
        let lookup = active_term.map(|term| self.lookup(term));
        ParagraphView {
            mode: if lookup.is_some() {
                ViewMode::LookUp
            } else {
                ViewMode::Readable
            },
            active_term: active_term.map(str::to_string),
            readable: self.readable(active_term),
            lookup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::ClickEvent;
    use crate::segment::{plain_text, reveal_text};

    const TEXT: &str = "I believe there's something fascinating in art and design.";

    #[test]
    fn click_cycle_switches_views() {
        let glossary = Glossary::from_iter([("art", "a skill")]);
        let paragraph = Paragraph::new(TEXT, &glossary);
        let mut state = LookupState::new();

        let initial = paragraph.view(&state);
        assert_eq!(initial.mode, ViewMode::Readable);
        assert!(initial.lookup.is_none());

        state.handle(ClickEvent::term("art"));
        let open = paragraph.view(&state);
        assert_eq!(open.mode, ViewMode::LookUp);
        assert_eq!(open.active_term.as_deref(), Some("art"));
        assert_eq!(reveal_text(open.segments()), "-a skill");
        assert_eq!(plain_text(&open.readable), TEXT);

        state.handle(ClickEvent::term("art"));
        assert_eq!(paragraph.view(&state), initial);
    }

    #[test]
    fn missing_definition_still_highlights() {
        let glossary = Glossary::from_iter([("art", "a skill")]);
        let paragraph = Paragraph::new(TEXT, &glossary);
        let view = paragraph.view(&LookupState::active("design"));
        assert_eq!(reveal_text(view.segments()), "-");
        assert!(view.segments().iter().any(|segment| matches!(
            segment,
            Segment::Term { text, is_active: true, .. } if text == "design"
        )));
    }
}
