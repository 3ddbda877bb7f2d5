use serde::{Deserialize, Serialize};
use std::fmt;

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

/// Opaque color strings handed to the renderer alongside generated series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub volume: String,
    pub volume_border: String,
    /// Bar highlighted by a volume drill-down
    pub selection_highlight: String,
    /// Bars dimmed while a drill-down is open
    pub selection_dimmed: String,
    pub positive: String,
    pub negative: String,
    /// One color per distribution segment
    pub distribution: Vec<String>,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        let dimmed = "rgba(100, 100, 100, 0.15)".to_string();
        match theme {
            Theme::Dark => Self {
                volume: "rgba(101, 178, 255, 0.7)".into(),
                volume_border: "rgba(101, 178, 255, 1)".into(),
                selection_highlight: "rgba(255, 159, 28, 0.8)".into(),
                selection_dimmed: dimmed,
                positive: "#34C77B".into(),
                negative: "#EA3943".into(),
                distribution: vec![
                    "rgba(85, 136, 255, 0.8)".into(),
                    "rgba(101, 178, 255, 0.8)".into(),
                    "rgba(52, 199, 123, 0.8)".into(),
                    "rgba(255, 159, 28, 0.8)".into(),
                    "rgba(234, 57, 67, 0.8)".into(),
                ],
            },
            Theme::Light => Self {
                volume: "rgba(66, 153, 225, 0.7)".into(),
                volume_border: "rgba(66, 153, 225, 1)".into(),
                selection_highlight: "rgba(237, 137, 54, 0.8)".into(),
                selection_dimmed: dimmed,
                positive: "#38A169".into(),
                negative: "#E53E3E".into(),
                distribution: vec![
                    "rgba(49, 130, 206, 0.8)".into(),
                    "rgba(66, 153, 225, 0.8)".into(),
                    "rgba(56, 161, 105, 0.8)".into(),
                    "rgba(237, 137, 54, 0.8)".into(),
                    "rgba(229, 62, 62, 0.8)".into(),
                ],
            },
        }
    }
}

/// Session display settings.
///
/// Created once at session start and read-only afterwards; a theme toggle
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub palette: Palette,
}

impl Settings {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            palette: Palette::for_theme(theme),
        }
    }

    /// A fresh settings value for the opposite theme.
    pub fn toggled(&self) -> Self {
        Self::new(self.theme.toggled())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
