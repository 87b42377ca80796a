use crate::glossary::same_term;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Input accepted by a paragraph's lookup state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickEvent {
    /// Click on a term span. `word` is missing when the span carried no
    /// term identifier.
    Term { word: Option<String> },
    /// Click on the lookup overlay background or the dimmed filler text.
    Outside,
}

impl ClickEvent {
    pub fn term(word: impl Into<String>) -> Self {
        ClickEvent::Term {
            word: Some(word.into()),
        }
    }
}

/// What a click did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Opened(String),
    Switched { from: String, to: String },
    Closed(String),
    Ignored,
}

/// Per-paragraph lookup state: inactive, or active on one term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupState {
    active_term: Option<String>,
}

impl LookupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(term: impl Into<String>) -> Self {
        Self {
            active_term: Some(term.into()),
        }
    }

    pub fn active_term(&self) -> Option<&str> {
        self.active_term.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active_term.is_some()
    }

    pub fn handle(&mut self, event: ClickEvent) -> Transition {
        let transition = match event {
            ClickEvent::Term { word } => match word.filter(|word| !word.trim().is_empty()) {
                Some(word) => self.click_term(word),
                None => Transition::Ignored,
            },
            ClickEvent::Outside => self.click_outside(),
        };
        if transition != Transition::Ignored {
            debug!(?transition, active = ?self.active_term, "lookup state changed");
        }
        transition
    }

    fn click_term(&mut self, word: String) -> Transition {
        match self.active_term.take() {
            None => {
                self.active_term = Some(word.clone());
                Transition::Opened(word)
            }
            Some(current) if same_term(&current, &word) => Transition::Closed(current),
            Some(current) => {
                self.active_term = Some(word.clone());
                Transition::Switched {
                    from: current,
                    to: word,
                }
            }
        }
    }

    fn click_outside(&mut self) -> Transition {
        match self.active_term.take() {
            Some(current) => Transition::Closed(current),
            None => Transition::Ignored,
        }
    }
}
