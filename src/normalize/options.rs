//! Normalization options.

/// Options controlling how raw block text is cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub unicode_nfc: bool,

    /// Expand typographic ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Drop blocks whose normalized text is shorter than this many characters
    pub min_text_chars: Option<usize>,
}

impl NormalizeOptions {
    /// Create new normalize options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only collapse whitespace and strip control characters.
    pub fn minimal() -> Self {
        Self {
            unicode_nfc: false,
            fix_ligatures: false,
            remove_replacement_char: false,
            min_text_chars: None,
        }
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_nfc(mut self, enabled: bool) -> Self {
        self.unicode_nfc = enabled;
        self
    }

    /// Enable or disable ligature expansion.
    pub fn with_ligature_fix(mut self, enabled: bool) -> Self {
        self.fix_ligatures = enabled;
        self
    }

    /// Enable or disable U+FFFD removal.
    pub fn with_replacement_char_removal(mut self, enabled: bool) -> Self {
        self.remove_replacement_char = enabled;
        self
    }

    /// Set the minimum normalized text length.
    pub fn with_min_text_chars(mut self, min: usize) -> Self {
        self.min_text_chars = Some(min);
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            unicode_nfc: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            min_text_chars: None,
        }
    }
}
