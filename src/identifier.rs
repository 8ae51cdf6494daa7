//! Stable section and block identifiers.
//!
//! Section ids are dot-separated sibling positions (`"1"`, `"1.2"`,
//! `"1.2.3"`). Block ids combine the page number with the 0-based emission
//! index of the block on that page (`"p12_0"`). Both are pure functions of
//! their inputs.

/// Separator between section id segments.
pub const SECTION_SEPARATOR: char = '.';

/// Build the id of the `position`-th (1-based) child of `parent`.
///
/// # Example
///
/// ```
/// use docstruct::identifier::section_id;
///
/// assert_eq!(section_id(None, 3), "3");
/// assert_eq!(section_id(Some("2.1"), 4), "2.1.4");
/// ```
pub fn section_id(parent: Option<&str>, position: u32) -> String {
    match parent {
        Some(parent) => format!("{}{}{}", parent, SECTION_SEPARATOR, position),
        None => position.to_string(),
    }
}

/// Build the id of the `index`-th (0-based) emitted block on `page`.
///
/// # Example
///
/// ```
/// use docstruct::identifier::block_id;
///
/// assert_eq!(block_id(5, 0), "p5_0");
/// ```
pub fn block_id(page: u32, index: usize) -> String {
    format!("p{}_{}", page, index)
}

/// Number of segments in a section id.
pub fn segment_count(section_id: &str) -> usize {
    if section_id.is_empty() {
        0
    } else {
        section_id.split(SECTION_SEPARATOR).count()
    }
}

/// Id of the parent section, if any.
pub fn parent_of(section_id: &str) -> Option<&str> {
    section_id
        .rsplit_once(SECTION_SEPARATOR)
        .map(|(parent, _)| parent)
}

/// Sibling position encoded in the last segment.
pub fn last_segment(section_id: &str) -> Option<u32> {
    section_id
        .rsplit(SECTION_SEPARATOR)
        .next()
        .and_then(|s| s.parse().ok())
}

/// Split a block id back into `(page, index)`.
pub fn parse_block_id(block_id: &str) -> Option<(u32, usize)> {
    let rest = block_id.strip_prefix('p')?;
    let (page, index) = rest.split_once('_')?;
    Some((page.parse().ok()?, index.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_id_root_and_nested() {
        assert_eq!(section_id(None, 1), "1");
        assert_eq!(section_id(Some("1"), 2), "1.2");
        assert_eq!(section_id(Some("1.2"), 10), "1.2.10");
    }

    #[test]
    fn test_segment_helpers() {
        assert_eq!(segment_count("1.2.3"), 3);
        assert_eq!(segment_count("7"), 1);
        assert_eq!(segment_count(""), 0);

        assert_eq!(parent_of("1.2.3"), Some("1.2"));
        assert_eq!(parent_of("4"), None);

        assert_eq!(last_segment("1.2.13"), Some(13));
        assert_eq!(last_segment("9"), Some(9));
    }

    #[test]
    fn test_block_id_roundtrip() {
        assert_eq!(block_id(120, 7), "p120_7");
        assert_eq!(parse_block_id("p120_7"), Some((120, 7)));
        assert_eq!(parse_block_id("tbl3_1"), None);
        assert_eq!(parse_block_id("p_1"), None);
    }
}
