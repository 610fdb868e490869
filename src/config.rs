use crossterm::style::Color;

use crate::error::ConfigError;
use crate::render::layout::SEPARATOR_WIDTH;

pub const DEFAULT_CONTEXT_LINES: usize = 3;
pub const DEFAULT_TAB_WIDTH: usize = 8;
pub const MAX_TAB_WIDTH: usize = 64;
/// Used when the terminal size cannot be detected
pub const FALLBACK_WIDTH: usize = 80;
/// Minimum Dice similarity for a changed line pair to get inline highlighting.
/// Below this, pairs share too little for the common parts to mean anything.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Whether highlights color the text or the cell behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    Foreground,
    #[default]
    Background,
}

/// What to do with lines wider than their pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    #[default]
    Wrap,
    Truncate,
}

/// Requested total output width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalWidth {
    #[default]
    Auto,
    Columns(usize),
}

impl TotalWidth {
    /// Resolve to a column count: explicit value, then the terminal size,
    /// then `$COLUMNS`, then `FALLBACK_WIDTH`
    pub fn resolve(self) -> usize {
        match self {
            Self::Columns(n) => n,
            Self::Auto => {
                if let Ok((cols, _)) = crossterm::terminal::size() {
                    if cols > 0 {
                        return cols as usize;
                    }
                }
                std::env::var("COLUMNS")
                    .ok()
                    .and_then(|c| c.parse::<usize>().ok())
                    .filter(|&c| c > 0)
                    .unwrap_or(FALLBACK_WIDTH)
            }
        }
    }
}

/// When to emit ANSI escapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Output encoding of rendered rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Two colored columns for a terminal
    #[default]
    Ansi,
    /// One JSON object per rendered row
    Json,
}

/// Theme mode, decides the background highlight tints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Detect theme mode from the environment
    pub fn detect() -> Self {
        // 1. Explicit override via PDIFF_THEME
        if let Some(theme) = std::env::var("PDIFF_THEME").ok().and_then(|v| Self::parse(&v)) {
            return theme;
        }

        // 2. COLORFGBG ("fg;bg"), set by xterm, rxvt and others
        if let Some(theme) = std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| Self::from_colorfgbg(&v))
        {
            return theme;
        }

        Self::Dark
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.split(';').last()?.parse().ok()?;
        // ANSI colors 0-6 and 8 are dark backgrounds, 7 and 9+ light
        if bg > 8 || bg == 7 {
            Some(Self::Light)
        } else {
            Some(Self::Dark)
        }
    }
}

/// Color palette - adapts to theme
#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub added: Color,
    pub removed: Color,
    pub added_bg: Color,
    pub removed_bg: Color,
    pub file_header: Color,
    pub hunk_header: Color,
    pub line_number: Color,
}

impl Colors {
    pub fn for_theme(theme: ThemeMode) -> Self {
        match theme {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            added: Color::Green,
            removed: Color::Red,
            added_bg: Color::Rgb { r: 35, g: 85, b: 45 },
            removed_bg: Color::Rgb { r: 95, g: 35, b: 45 },
            file_header: Color::Blue,
            hunk_header: Color::Cyan,
            line_number: Color::DarkGrey,
        }
    }

    pub fn light() -> Self {
        Self {
            added: Color::DarkGreen,
            removed: Color::DarkRed,
            added_bg: Color::Rgb { r: 190, g: 235, b: 190 },
            removed_bg: Color::Rgb { r: 250, g: 200, b: 205 },
            file_header: Color::DarkBlue,
            hunk_header: Color::DarkCyan,
            line_number: Color::Grey,
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::for_theme(ThemeMode::default())
    }
}

/// Options for one side-by-side comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Unchanged lines shown around each change; `usize::MAX` shows the whole file
    pub context_lines: usize,
    /// Tab stop distance, 0 keeps tabs as-is
    pub tab_width: usize,
    /// Total output width in columns, already resolved
    pub width: usize,
    pub line_numbers: bool,
    pub signs: bool,
    pub highlight: HighlightMode,
    pub wrap: WrapMode,
    pub similarity_threshold: f64,
    pub colors: Colors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            tab_width: DEFAULT_TAB_WIDTH,
            width: FALLBACK_WIDTH,
            line_numbers: true,
            signs: true,
            highlight: HighlightMode::default(),
            wrap: WrapMode::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            colors: Colors::default(),
        }
    }
}

impl Config {
    /// Narrowest width that leaves one content column per pane, assuming
    /// single-digit line numbers. The layout tightens this once the largest
    /// line numbers are known.
    pub fn min_width(&self) -> usize {
        let signs = if self.signs { 2 } else { 0 };
        let numbers = if self.line_numbers { 4 } else { 0 };
        SEPARATOR_WIDTH + signs + numbers + 2
    }

    /// Reject option values the layout cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.min_width();
        if self.width < min {
            return Err(ConfigError::WidthTooNarrow {
                width: self.width,
                min,
            });
        }
        if self.tab_width > MAX_TAB_WIDTH {
            return Err(ConfigError::TabWidthTooLarge {
                width: self.tab_width,
                max: MAX_TAB_WIDTH,
            });
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidThreshold(self.similarity_threshold));
        }
        Ok(())
    }
}
