use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::grid::Cell;

/// Numbering-scheme prefix ("5.11.00.00"), at least one whitespace, then the label.
static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\d\.]+)\s+(.*)").expect("title pattern is a valid regex")
});

/// Normalized identity of a line item.
///
/// `code` keeps the numbering scheme exactly as written; `label` is trimmed
/// and lowercased. Codes are only compared with codes, labels with labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TitleKey {
    pub code: String,
    pub label: String,
}

/// Classify a cell as a structured title, or reject it.
pub fn normalize_title(cell: &Cell) -> Option<TitleKey> {
    let Cell::Text(text) = cell else {
        return None;
    };
    normalize_title_text(text)
}

/// Same as [`normalize_title`] for text already pulled out of a cell.
pub fn normalize_title_text(text: &str) -> Option<TitleKey> {
    let captures = TITLE_PATTERN.captures(text.trim())?;
    let code = captures.get(1)?.as_str().trim().to_string();
    let label = captures.get(2)?.as_str().trim().to_lowercase();
    Some(TitleKey { code, label })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_and_label_are_split() {
        let key = normalize_title(&Cell::from("5.11.00.00 Total inversiones")).unwrap();
        assert_eq!(key.code, "5.11.00.00");
        assert_eq!(key.label, "total inversiones");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let key = normalize_title(&Cell::from("   1.1   Caja y Bancos  ")).unwrap();
        assert_eq!(key.code, "1.1");
        assert_eq!(key.label, "caja y bancos");
    }

    #[test]
    fn test_code_with_trailing_period() {
        let key = normalize_title(&Cell::from("2. Pasivos")).unwrap();
        assert_eq!(key.code, "2.");
        assert_eq!(key.label, "pasivos");
    }

    #[test]
    fn test_rejects_text_without_numeric_prefix() {
        assert_eq!(normalize_title(&Cell::from("Total inversiones")), None);
        assert_eq!(normalize_title(&Cell::from("A.1 Activos")), None);
    }

    #[test]
    fn test_rejects_prefix_without_separator() {
        // The code must be followed by whitespace
        assert_eq!(normalize_title(&Cell::from("1.1Caja")), None);
        assert_eq!(normalize_title(&Cell::from("1.1")), None);
    }

    #[test]
    fn test_rejects_non_text_cells() {
        assert_eq!(normalize_title(&Cell::Number(511.0)), None);
        assert_eq!(normalize_title(&Cell::Empty), None);
        assert_eq!(normalize_title(&Cell::from("   ")), None);
    }

    #[test]
    fn test_code_punctuation_is_significant() {
        let a = normalize_title(&Cell::from("1.1 Caja")).unwrap();
        let b = normalize_title(&Cell::from("1.10 Caja")).unwrap();
        assert_ne!(a.code, b.code);
        assert_eq!(a.label, b.label);
    }
}
