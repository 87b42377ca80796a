//! Interactive glossary prose.
//!
//! A paragraph of plain text is split into plain spans and clickable
//! glossary terms. Clicking a term opens a lookup view of that paragraph
//! which highlights the term and reveals its definition one character at a
//! time; clicking it again, or clicking outside, closes the lookup.

pub mod breakpoint;
pub mod essay;
pub mod glossary;
pub mod locator;
pub mod lookup;
pub mod paragraph;
pub mod segment;
#[cfg(feature = "web")]
pub mod sessions;
#[cfg(feature = "web")]
pub mod web;

pub use breakpoint::{BREAKPOINTS, Breakpoint, BreakpointSelection};
pub use essay::{Essay, EssayError, Reader};
pub use glossary::Glossary;
pub use locator::{BoundaryMatcher, TermMatch, find_term, locate};
pub use lookup::{ClickEvent, LookupState, Transition};
pub use paragraph::{Paragraph, ParagraphView, ViewMode};
pub use segment::{Segment, build_lookup, build_readable, plain_text, reveal_text};
