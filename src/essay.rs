use crate::glossary::Glossary;
use crate::lookup::{ClickEvent, LookupState, Transition};
use crate::paragraph::{Paragraph, ParagraphView};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

static DEFAULT_ESSAY_JSON: &str = include_str!("../data/essay.json");

static DEFAULT_ESSAY: Lazy<Essay> =
    Lazy::new(|| Essay::from_json_str(DEFAULT_ESSAY_JSON).expect("bundled essay is valid"));

#[derive(Debug)]
pub enum EssayError {
    Io(std::io::Error),
    Json(serde_json::Error),
    EmptyParagraph(usize),
    ParagraphOutOfRange { index: usize, len: usize },
}

impl fmt::Display for EssayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EssayError::Io(err) => write!(f, "io error: {err}"),
            EssayError::Json(err) => write!(f, "invalid essay json: {err}"),
            EssayError::EmptyParagraph(index) => write!(f, "paragraph {index} is empty"),
            EssayError::ParagraphOutOfRange { index, len } => {
                write!(f, "paragraph {index} out of range (essay has {len})")
            }
        }
    }
}

impl std::error::Error for EssayError {}

impl From<std::io::Error> for EssayError {
    fn from(value: std::io::Error) -> Self {
        EssayError::Io(value)
    }
}

impl From<serde_json::Error> for EssayError {
    fn from(value: serde_json::Error) -> Self {
        EssayError::Json(value)
    }
}

/// A short essay: a heading, a glossary, and paragraphs of plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Essay {
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub glossary: Glossary,
    pub paragraphs: Vec<String>,
}

impl Essay {
    /// The bundled "Contrasting Aesthetics" essay.
    pub fn default_essay() -> &'static Essay {
        &DEFAULT_ESSAY
    }

    pub fn from_json_str(json: &str) -> Result<Self, EssayError> {
        let mut essay: Essay = serde_json::from_str(json)?;
        essay.normalize()?;
        Ok(essay)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EssayError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn normalize(&mut self) -> Result<(), EssayError> {
        for (index, paragraph) in self.paragraphs.iter_mut().enumerate() {
            let collapsed = paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed.is_empty() {
                return Err(EssayError::EmptyParagraph(index));
            }
            *paragraph = collapsed;
        }
        for (term, definition) in self.glossary.iter() {
            if definition.trim().is_empty() {
                warn!(term, "glossary entry has no definition");
            }
        }
        Ok(())
    }

    pub fn paragraph(&self, index: usize) -> Result<Paragraph<'_>, EssayError> {
        self.paragraphs
            .get(index)
            .map(|text| Paragraph::new(text, &self.glossary))
            .ok_or(EssayError::ParagraphOutOfRange {
                index,
                len: self.paragraphs.len(),
            })
    }
}

/// Lookup state for every paragraph of one reading of an essay.
///
/// Each paragraph owns its state; a click on one never touches another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reader {
    states: Vec<LookupState>,
}

impl Reader {
    pub fn new(essay: &Essay) -> Self {
        Self {
            states: vec![LookupState::new(); essay.paragraphs.len()],
        }
    }

    pub fn state(&self, index: usize) -> Option<&LookupState> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[LookupState] {
        &self.states
    }

    pub fn click(&mut self, index: usize, event: ClickEvent) -> Result<Transition, EssayError> {
        let len = self.states.len();
        self.states
            .get_mut(index)
            .map(|state| state.handle(event))
            .ok_or(EssayError::ParagraphOutOfRange { index, len })
    }

    pub fn view(&self, essay: &Essay, index: usize) -> Result<ParagraphView, EssayError> {
        let paragraph = essay.paragraph(index)?;
        let state = self.states.get(index).cloned().unwrap_or_default();
        Ok(paragraph.view(&state))
    }

    pub fn views(&self, essay: &Essay) -> Result<Vec<ParagraphView>, EssayError> {
        (0..essay.paragraphs.len())
            .map(|index| self.view(essay, index))
            .collect()
    }
}
