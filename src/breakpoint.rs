use serde::Serialize;

/// Key the chosen preview width is stored under.
pub const BREAKPOINT_STORAGE_KEY: &str = "breakpoint";
pub const DEFAULT_BREAKPOINT_WIDTH: u32 = 768;
/// Width used by the catch-all "extra large" entry.
pub const FULL_WIDTH: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoint {
    pub name: &'static str,
    pub width: u32,
}

pub const BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint {
        name: "mini",
        width: 475,
    },
    Breakpoint {
        name: "small",
        width: 768,
    },
    Breakpoint {
        name: "medium",
        width: 1024,
    },
    Breakpoint {
        name: "large",
        width: 1440,
    },
    Breakpoint {
        name: "extra large",
        width: FULL_WIDTH,
    },
];

impl Breakpoint {
    pub fn is_full(&self) -> bool {
        self.width == FULL_WIDTH
    }

    /// Caption shown while hovering the picker.
    pub fn label(&self) -> String {
        if self.is_full() {
            format!("{} - full", self.name)
        } else {
            format!("{} - {}px", self.name, self.width)
        }
    }
}

/// Preview width chosen with the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakpointSelection(u32);

impl Default for BreakpointSelection {
    fn default() -> Self {
        Self(DEFAULT_BREAKPOINT_WIDTH)
    }
}

impl BreakpointSelection {
    pub fn new(width: u32) -> Option<Self> {
        (width > 0).then_some(Self(width))
    }

    /// Reads a stored value, falling back to the default when it is absent
    /// or malformed.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .and_then(Self::new)
            .unwrap_or_default()
    }

    pub fn width(&self) -> u32 {
        self.0
    }

    pub fn to_stored(&self) -> String {
        self.0.to_string()
    }

    /// The picker entry with exactly this width, if any.
    pub fn breakpoint(&self) -> Option<&'static Breakpoint> {
        BREAKPOINTS.iter().find(|bp| bp.width == self.0)
    }
}
