//! Text patterns recognised in templates

use lazy_static::lazy_static;
use regex::Regex;

/// Characters templates use to draw checkboxes inline
pub const CHECKBOX_GLYPHS: [char; 7] = ['☐', '☑', '✓', '□', '■', '◻', '◼'];
pub const CHECKED_GLYPH: char = '☑';
pub const UNCHECKED_GLYPH: char = '☐';

/// Header words marking a table as a repeatable data-entry grid
pub const DATA_TABLE_HEADER_WORDS: [&str; 6] = ["name", "title", "role", "date", "email", "phone"];

pub const REPEATABLE_MIN_ROWS: usize = 1;
pub const REPEATABLE_MAX_ROWS: usize = 20;

lazy_static! {
    /// `IV. Funding Sources`
    pub static ref SECTION_HEADER: Regex = Regex::new(r"(?i)^([IVXLC]+)\.\s+(.+)$").unwrap();

    /// `Principal Investigator: ______` or a label ending in a colon
    pub static ref FIELD_LABEL: Regex = Regex::new(r"^(.+?):\s*(_+|$)").unwrap();

    pub static ref UNDERSCORE_RUN: Regex = Regex::new(r"_+").unwrap();
}

pub fn has_glyph(text: &str) -> bool {
    text.chars().any(|c| CHECKBOX_GLYPHS.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_header() {
        let caps = SECTION_HEADER.captures("iv. Funding Sources").unwrap();
        assert_eq!(&caps[1], "iv");
        assert_eq!(&caps[2], "Funding Sources");
        assert!(SECTION_HEADER.captures("IV.Funding").is_none());
        assert!(SECTION_HEADER.captures("Section IV. Funding").is_none());
    }

    #[test]
    fn test_field_label() {
        let caps = FIELD_LABEL.captures("Principal Investigator: ______").unwrap();
        assert_eq!(&caps[1], "Principal Investigator");
        assert_eq!(&FIELD_LABEL.captures("Sponsor:").unwrap()[1], "Sponsor");
        assert!(FIELD_LABEL.captures("Note: see attached").is_none());
        assert!(FIELD_LABEL.captures("No colon here").is_none());
    }

    #[test]
    fn test_has_glyph() {
        assert!(has_glyph("☐ Yes ☐ No"));
        assert!(has_glyph("■ Done"));
        assert!(!has_glyph("[ ] Yes"));
    }
}
