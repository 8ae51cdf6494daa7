//! Block text cleanup.

use unicode_normalization::UnicodeNormalization;

use super::NormalizeOptions;

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Text cleaner applied to every raw block.
///
/// Whitespace runs (including newlines and tabs) collapse to a single
/// space, control characters are removed, and the result is trimmed.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    unicode_nfc: bool,
    fix_ligatures: bool,
    remove_replacement_char: bool,
}

impl TextCleaner {
    /// Create a cleaner from normalize options.
    pub fn new(options: &NormalizeOptions) -> Self {
        Self {
            unicode_nfc: options.unicode_nfc,
            fix_ligatures: options.fix_ligatures,
            remove_replacement_char: options.remove_replacement_char,
        }
    }

    /// Clean a piece of text. Returns an empty string for blank input.
    pub fn clean(&self, text: &str) -> String {
        let composed: String;
        let text = if self.unicode_nfc {
            composed = text.nfc().collect();
            composed.as_str()
        } else {
            text
        };

        let mut out = String::with_capacity(text.len());
        let mut pending_space = false;

        for c in text.chars() {
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }
            if c.is_control() || (self.remove_replacement_char && c == '\u{FFFD}') {
                continue;
            }

            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;

            match self.ligature(c) {
                Some(expanded) => out.push_str(expanded),
                None => out.push(c),
            }
        }

        out
    }

    fn ligature(&self, c: char) -> Option<&'static str> {
        if !self.fix_ligatures {
            return None;
        }
        LIGATURES
            .iter()
            .find(|(lig, _)| *lig == c)
            .map(|(_, expanded)| *expanded)
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(&NormalizeOptions::default())
    }
}

/// Clean text with the default options.
pub fn normalize_text(text: &str) -> String {
    TextCleaner::default().clean(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_and_trim() {
        assert_eq!(normalize_text("  Hello \n\t  world  "), "Hello world");
        assert_eq!(normalize_text("a\r\nb"), "a b");
    }

    #[test]
    fn test_blank_becomes_empty() {
        assert_eq!(normalize_text("   "), "");
        assert_eq!(normalize_text("\n\t\u{00A0}"), "");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_control_chars_stripped() {
        assert_eq!(normalize_text("VBUS\u{0007} level\u{0000}"), "VBUS level");
        assert_eq!(normalize_text("a \u{0001} b"), "a b");
    }

    #[test]
    fn test_ligatures_and_replacement_char() {
        assert_eq!(normalize_text("\u{FB01}eld \u{FB02}ow"), "field flow");
        assert_eq!(normalize_text("bad\u{FFFD}byte"), "badbyte");

        let raw = TextCleaner::new(&NormalizeOptions::minimal());
        assert_eq!(raw.clean("\u{FB01}eld"), "\u{FB01}eld");
        assert_eq!(raw.clean("bad\u{FFFD}"), "bad\u{FFFD}");
    }

    #[test]
    fn test_nfc_composition() {
        // "e" + combining acute accent composes to a single code point.
        assert_eq!(normalize_text("caf\u{0065}\u{0301}"), "caf\u{00E9}");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_text("  Power   Delivery\n Rev 3.1 ");
        assert_eq!(normalize_text(&once), once);
    }
}
