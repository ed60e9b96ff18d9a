//! Syntax highlighting for input documents.
//!
//! Uses syntect with the bundled Sublime Text syntax definitions. When
//! the format has no grammar, or the grammar styles nothing, the regex
//! [`Highlighter`]s registered on the input are applied instead.

use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

use ratatui::style::{Color, Modifier, Style};
use regex::Regex;
use syntect::easy::HighlightLines;
use syntect::highlighting::{self as sh, FontStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::editor::AttrLine;

/// The language of the text being edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TextFormat {
    #[default]
    Plain,
    Sql,
    Json,
    Markdown,
    Rust,
    Shell,
}

impl TextFormat {
    /// Guess the format from a file extension, falling back to plain text.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("sql") => Self::Sql,
            Some("json") => Self::Json,
            Some("md" | "markdown") => Self::Markdown,
            Some("rs") => Self::Rust,
            Some("sh" | "bash" | "zsh") => Self::Shell,
            _ => Self::Plain,
        }
    }

    const fn syntax_token(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Sql => Some("sql"),
            Self::Json => Some("json"),
            Self::Markdown => Some("md"),
            Self::Rust => Some("rs"),
            Self::Shell => Some("sh"),
        }
    }
}

/// Re-highlight every line from scratch.
///
/// Existing spans are dropped first. Returns `true` when the grammar
/// produced at least one span.
pub fn highlight_document(format: TextFormat, lines: &mut [AttrLine]) -> bool {
    for line in lines.iter_mut() {
        line.clear_spans();
    }
    let syntax_set = syntax_set();
    let Some(syntax) = format
        .syntax_token()
        .and_then(|token| syntax_set.find_syntax_by_token(token))
    else {
        return false;
    };

    let mode = background_mode();
    let mut highlighter = HighlightLines::new(syntax, theme());
    let mut styled = false;
    let mut buf = String::new();
    for line in lines.iter_mut() {
        // The newline-aware grammars expect each line terminated.
        buf.clear();
        buf.push_str(line.text());
        buf.push('\n');
        let ranges = match highlighter.highlight_line(&buf, syntax_set) {
            Ok(ranges) => ranges,
            Err(err) => {
                tracing::debug!(?format, %err, "syntax highlighting stopped");
                break;
            }
        };

        let len = line.len();
        let mut offset = 0;
        for (style, text) in ranges {
            let start = offset;
            offset += text.len();
            let end = offset.min(len);
            if start < end {
                line.add_span(start..end, convert_style(style, mode));
                styled = true;
            }
        }
    }
    tracing::trace!(?format, lines = lines.len(), styled, "re-highlighted document");
    styled
}

/// A named regex that styles every match.
///
/// If the pattern has a capture group, only the first group is styled.
#[derive(Debug, Clone)]
pub struct Highlighter {
    name: String,
    pattern: Regex,
    style: Style,
    formats: Vec<TextFormat>,
}

impl Highlighter {
    pub fn new(name: impl Into<String>, pattern: &str, style: Style) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            style,
            formats: Vec::new(),
        })
    }

    /// Restrict the highlighter to some formats. No formats means all.
    #[must_use]
    pub fn for_formats(mut self, formats: impl IntoIterator<Item = TextFormat>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn applies_to_format(&self, format: TextFormat) -> bool {
        self.formats.is_empty() || self.formats.contains(&format)
    }

    /// Add a span for each match in the line.
    pub fn annotate(&self, line: &mut AttrLine) {
        let ranges: Vec<_> = self
            .pattern
            .captures_iter(line.text())
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.range())
            .collect();
        for range in ranges {
            line.add_span(range, self.style);
        }
    }
}

/// Run every applicable highlighter over every line.
pub fn apply_highlighters(highlighters: &[Highlighter], format: TextFormat, lines: &mut [AttrLine]) {
    let active: Vec<_> = highlighters
        .iter()
        .filter(|hl| hl.applies_to_format(format))
        .collect();
    if active.is_empty() {
        return;
    }
    tracing::debug!(count = active.len(), "apply highlights");
    for line in lines.iter_mut() {
        for hl in &active {
            hl.annotate(line);
        }
    }
}

fn convert_style(style: sh::Style, mode: BackgroundMode) -> Style {
    let fg = adjust_fg_for_background(style.foreground, mode);
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _span = tracing::debug_span!("highlight.syntax_set.load_defaults").entered();
        SyntaxSet::load_defaults_newlines()
    })
}

fn theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let _span = tracing::debug_span!("highlight.theme.load_defaults").entered();
        let theme_set = ThemeSet::load_defaults();
        let preferred = match background_mode() {
            BackgroundMode::Dark => [
                "base16-ocean.dark",
                "base16-eighties.dark",
                "base16-mocha.dark",
                "Solarized (dark)",
            ]
            .as_slice(),
            BackgroundMode::Light => [
                "InspiredGitHub",
                "Solarized (light)",
                "base16-ocean.light",
            ]
            .as_slice(),
        };

        for name in preferred {
            if let Some(theme) = theme_set.themes.get(*name) {
                return theme.clone();
            }
        }

        theme_set
            .themes
            .values()
            .next()
            .cloned()
            .unwrap_or_default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackgroundMode {
    Dark,
    Light,
}

/// Terminal background override for picking the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightBackground {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: Mutex<Option<HighlightBackground>> = Mutex::new(None);

/// Force a light or dark theme, or `None` to detect from `COLORFGBG`.
///
/// Must be called before the first document is highlighted; the theme
/// is chosen once per process.
pub fn set_background_mode(mode: Option<HighlightBackground>) {
    *BACKGROUND_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = mode;
}

fn background_mode() -> BackgroundMode {
    let forced = *BACKGROUND_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    match forced {
        Some(HighlightBackground::Light) => BackgroundMode::Light,
        Some(HighlightBackground::Dark) => BackgroundMode::Dark,
        None => background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()),
    }
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    match bg_str.parse::<u8>() {
        Ok(bg) if bg >= 7 => BackgroundMode::Light,
        _ => BackgroundMode::Dark,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn adjust_fg_for_background(color: sh::Color, mode: BackgroundMode) -> sh::Color {
    match mode {
        BackgroundMode::Dark => color,
        BackgroundMode::Light => {
            let luma = 0.0722f32.mul_add(
                f32::from(color.b),
                0.2126f32.mul_add(f32::from(color.r), 0.7152 * f32::from(color.g)),
            );
            if luma < 155.0 {
                return color;
            }
            let darken = |c: u8| (f32::from(c) * 0.42).round() as u8;
            sh::Color {
                r: darken(color.r),
                g: darken(color.g),
                b: darken(color.b),
                a: color.a,
            }
        }
    }
}
