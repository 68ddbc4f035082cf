//! HTML report export.
//!
//! Both reports are standalone HTML pages embedding an inline SVG drawn with
//! the `svg` crate. The surrounding markup is assembled by hand, so every
//! piece of user data placed outside the SVG goes through [`escape_html`].

pub mod graph;
pub mod radar;

use speciesring_core::color::Color;

use crate::{SpeciesRingError, config::StyleConfig};

/// Parsed colors shared by both reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    mismatch: Color,
    background: Color,
    node: Color,
}

impl Palette {
    /// Parses the colors of a style section.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesRingError::Config`] naming the first invalid color.
    pub fn from_style(style: &StyleConfig) -> Result<Self, SpeciesRingError> {
        Ok(Self {
            mismatch: style.mismatch_color().map_err(SpeciesRingError::Config)?,
            background: style.background_color().map_err(SpeciesRingError::Config)?,
            node: style.node_color().map_err(SpeciesRingError::Config)?,
        })
    }

    pub fn mismatch(&self) -> Color {
        self.mismatch
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn node(&self) -> Color {
        self.node
    }
}

/// Escapes the five HTML special characters.
///
/// # Examples
///
/// ```
/// use speciesring::export::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">R&D</a>"#), "&lt;a href=&quot;x&quot;&gt;R&amp;D&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_html("Homo sapiens"), "Homo sapiens");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_html("it's \"x\""), "it&#39;s &quot;x&quot;");
    }

    #[test]
    fn test_palette_defaults() {
        let palette = Palette::from_style(&StyleConfig::default()).unwrap();
        assert_eq!(palette.mismatch().to_string(), "red");
    }
}
