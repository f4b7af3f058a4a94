//! Text style and SGR transitions
//!
//! A [`Style`] is a small immutable value. Cells carry a copy of the style
//! that was active when they were written; SGR sequences never mutate a
//! style in place, they produce a new one via [`Style::color`].

use std::fmt::Write;

/// Color representation supporting indexed and RGB colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Default terminal color (foreground or background)
    #[default]
    Default,
    /// 256-color palette; 0-7 standard, 8-15 bright
    Indexed(u8),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);

    /// Class suffix for this color, e.g. `31`, `91` or `x208`.
    ///
    /// `base` is 30 for foreground and 40 for background. RGB colors have
    /// no class form and return `None`.
    fn class_code(self, base: u16) -> Option<String> {
        match self {
            Color::Default | Color::Rgb(..) => None,
            Color::Indexed(i @ 0..=7) => Some((base + u16::from(i)).to_string()),
            Color::Indexed(i @ 8..=15) => Some((base + 60 + u16::from(i - 8)).to_string()),
            Color::Indexed(i) => Some(format!("x{i}")),
        }
    }

    fn hex(self) -> Option<String> {
        match self {
            Color::Rgb(r, g, b) => Some(format!("#{r:02x}{g:02x}{b:02x}")),
            _ => None,
        }
    }
}

/// Text style: colors plus attribute flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub inverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
}

impl Style {
    /// True if this style renders identically to unstyled text
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }

    /// Apply an SGR parameter list, returning the resulting style.
    ///
    /// Parameters are the raw strings between `;` separators. Unknown or
    /// unparsable parameters are skipped, and a truncated extended color
    /// (`38;5` with no index, say) is dropped.
    pub fn color(&self, params: &[String]) -> Style {
        let mut next = *self;
        let mut iter = params.iter().map(|p| sgr_code(p));

        while let Some(code) = iter.next() {
            let Some(code) = code else {
                continue;
            };
            match code {
                0 => next = Style::default(),
                1 => next.bold = true,
                2 => next.faint = true,
                3 => next.italic = true,
                4 => next.underline = true,
                5 | 6 => next.blink = true,
                7 => next.inverse = true,
                8 => next.hidden = true,
                9 => next.strikethrough = true,
                21 | 22 => {
                    next.bold = false;
                    next.faint = false;
                }
                23 => next.italic = false,
                24 => next.underline = false,
                25 => next.blink = false,
                27 => next.inverse = false,
                28 => next.hidden = false,
                29 => next.strikethrough = false,
                30..=37 => next.fg = Color::Indexed((code - 30) as u8),
                38 => {
                    if let Some(color) = extended_color(&mut iter) {
                        next.fg = color;
                    }
                }
                39 => next.fg = Color::Default,
                40..=47 => next.bg = Color::Indexed((code - 40) as u8),
                48 => {
                    if let Some(color) = extended_color(&mut iter) {
                        next.bg = color;
                    }
                }
                49 => next.bg = Color::Default,
                90..=97 => next.fg = Color::Indexed((code - 90 + 8) as u8),
                100..=107 => next.bg = Color::Indexed((code - 100 + 8) as u8),
                _ => tracing::trace!("ignoring SGR parameter {}", code),
            }
        }

        next
    }

    /// CSS class names for this style, in a stable order
    pub fn classes(&self, prefix: &str) -> Vec<String> {
        let mut classes = Vec::new();

        if let Some(code) = self.fg.class_code(30) {
            classes.push(format!("{prefix}-fg{code}"));
        }
        if let Some(code) = self.bg.class_code(40) {
            classes.push(format!("{prefix}-bg{code}"));
        }

        let flags = [
            (self.bold, 1),
            (self.faint, 2),
            (self.italic, 3),
            (self.underline, 4),
            (self.blink, 5),
            (self.inverse, 7),
            (self.hidden, 8),
            (self.strikethrough, 9),
        ];
        for (set, code) in flags {
            if set {
                classes.push(format!("{prefix}-fg{code}"));
            }
        }

        classes
    }

    /// Inline CSS for colors that have no class form (24-bit RGB)
    pub fn inline_css(&self) -> Option<String> {
        let mut css = String::new();
        if let Some(hex) = self.fg.hex() {
            let _ = write!(css, "color:{hex};");
        }
        if let Some(hex) = self.bg.hex() {
            let _ = write!(css, "background-color:{hex};");
        }
        (!css.is_empty()).then_some(css)
    }
}

/// Parse one SGR parameter. An empty parameter means 0 (reset).
fn sgr_code(param: &str) -> Option<u16> {
    if param.is_empty() {
        return Some(0);
    }
    param.parse().ok()
}

/// Consume a `5;n` or `2;r;g;b` tail following 38/48
fn extended_color(iter: &mut impl Iterator<Item = Option<u16>>) -> Option<Color> {
    match iter.next()?? {
        5 => {
            let index = iter.next()??;
            u8::try_from(index).ok().map(Color::Indexed)
        }
        2 => {
            let r = u8::try_from(iter.next()??).ok()?;
            let g = u8::try_from(iter.next()??).ok()?;
            let b = u8::try_from(iter.next()??).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_style_default_is_plain() {
        assert!(Style::default().is_plain());
        assert!(Style::default().classes("term").is_empty());
    }

    #[test]
    fn test_sgr_basic_colors() {
        let style = Style::default().color(&params(&["31"]));
        assert_eq!(style.fg, Color::RED);

        let style = style.color(&params(&["44"]));
        assert_eq!(style.fg, Color::RED);
        assert_eq!(style.bg, Color::BLUE);
    }

    #[test]
    fn test_sgr_reset() {
        let style = Style::default().color(&params(&["1", "31"]));
        assert!(style.bold);

        assert!(style.color(&params(&["0"])).is_plain());
        assert!(style.color(&params(&[""])).is_plain());
        assert!(style.color(&[]).is_plain());
    }

    #[test]
    fn test_sgr_does_not_mutate_original() {
        let original = Style::default();
        let red = original.color(&params(&["31"]));
        assert!(original.is_plain());
        assert_eq!(red.fg, Color::RED);
    }

    #[test]
    fn test_sgr_bright_colors() {
        let style = Style::default().color(&params(&["91", "102"]));
        assert_eq!(style.fg, Color::Indexed(9));
        assert_eq!(style.bg, Color::Indexed(10));
        assert_eq!(style.classes("term"), vec!["term-fg91", "term-bg102"]);
    }

    #[test]
    fn test_sgr_256_and_truecolor() {
        let style = Style::default().color(&params(&["38", "5", "208"]));
        assert_eq!(style.fg, Color::Indexed(208));
        assert_eq!(style.classes("term"), vec!["term-fgx208"]);

        let style = Style::default().color(&params(&["48", "2", "255", "128", "0"]));
        assert_eq!(style.bg, Color::Rgb(255, 128, 0));
        assert!(style.classes("term").is_empty());
        assert_eq!(style.inline_css().as_deref(), Some("background-color:#ff8000;"));
    }

    #[test]
    fn test_sgr_truncated_extended_color_is_ignored() {
        let style = Style::default().color(&params(&["38", "5"]));
        assert_eq!(style.fg, Color::Default);

        let style = Style::default().color(&params(&["38", "2", "1", "2"]));
        assert_eq!(style.fg, Color::Default);
    }

    #[test]
    fn test_sgr_skips_garbage() {
        let style = Style::default().color(&params(&["x", "1", "9999", "32"]));
        assert!(style.bold);
        assert_eq!(style.fg, Color::GREEN);
    }

    #[test]
    fn test_sgr_attribute_toggles() {
        let style = Style::default().color(&params(&["1", "3", "4", "9"]));
        assert_eq!(
            style.classes("term"),
            vec!["term-fg1", "term-fg3", "term-fg4", "term-fg9"]
        );

        let style = style.color(&params(&["22", "23", "24", "29"]));
        assert!(style.is_plain());
    }
}
