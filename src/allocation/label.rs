//! Conversion between grid coordinates and seat labels such as `5B`.
//!
//! Rows are printed 1-based in decimal, columns as a single uppercase letter
//! (`A` is column 0). Parsing is lenient about case, surrounding whitespace
//! and the order of the digit and letter parts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{AllocationError, AllocationResult};

/// Number of columns addressable by a single letter.
pub const MAX_COLUMNS: usize = 26;

/// Largest row count a grid may have.
pub const MAX_ROWS: usize = 10_000;

/// Human-readable identifier of a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Coordinates this label points at.
    pub fn position(&self) -> AllocationResult<(usize, usize)> {
        parse(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

/// Letter for a zero-based column. Callers keep `column < MAX_COLUMNS`.
pub fn column_letter(column: usize) -> char {
    debug_assert!(column < MAX_COLUMNS);
    char::from(b'A' + column as u8)
}

/// Builds the label for `(row, column)`.
pub fn encode(row: usize, column: usize) -> Label {
    Label(format!("{}{}", row + 1, column_letter(column)))
}

/// Parses free-form input into `(row, column)`.
///
/// All ASCII digits are collected into the row number and all alphabetic
/// characters into the column letter, each in order of appearance, so `5B`,
/// `b5` and ` 5 b ` are equivalent. Anything that does not leave exactly one
/// letter and a positive row number is rejected.
pub fn parse(input: &str) -> AllocationResult<(usize, usize)> {
    let malformed = || AllocationError::MalformedLabel {
        input: input.to_string(),
    };

    let normalized = input.trim().to_uppercase();
    let mut digits = String::new();
    let mut letters = Vec::new();
    for ch in normalized.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch.is_alphabetic() {
            letters.push(ch);
        }
    }

    let letter = match letters.as_slice() {
        [letter] if letter.is_ascii_uppercase() => *letter,
        _ => return Err(malformed()),
    };
    let row_number: usize = digits.parse().map_err(|_| malformed())?;
    if row_number == 0 {
        return Err(malformed());
    }

    Ok((row_number - 1, (letter as u8 - b'A') as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_row_number_and_letter() {
        assert_eq!(encode(0, 1).as_str(), "1B");
        assert_eq!(encode(9, 0).as_str(), "10A");
        assert_eq!(encode(119, 25).as_str(), "120Z");
    }

    #[test]
    fn parses_either_order_and_case() {
        assert_eq!(parse("5B").unwrap(), (4, 1));
        assert_eq!(parse(" b5 ").unwrap(), (4, 1));
        assert_eq!(parse("B5").unwrap(), (4, 1));
        assert_eq!(parse("12c").unwrap(), (11, 2));
    }

    #[test]
    fn tolerates_separators_between_parts() {
        assert_eq!(parse("5-B").unwrap(), (4, 1));
        assert_eq!(parse("1 0 a").unwrap(), (9, 0));
    }

    #[test]
    fn rejects_missing_or_extra_parts() {
        for input in ["5", "BB", "", "   ", "5BB", "AB5", "-"] {
            assert!(
                matches!(parse(input), Err(AllocationError::MalformedLabel { .. })),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn rejects_row_zero_and_overflow() {
        assert!(matches!(parse("0A"), Err(AllocationError::MalformedLabel { .. })));
        let huge = format!("{}A", "9".repeat(40));
        assert!(matches!(parse(&huge), Err(AllocationError::MalformedLabel { .. })));
    }

    #[test]
    fn rejects_non_ascii_letters() {
        assert!(matches!(parse("5É"), Err(AllocationError::MalformedLabel { .. })));
    }

    #[test]
    fn label_knows_its_position() {
        assert_eq!(encode(3, 4).position().unwrap(), (3, 4));
    }

    proptest! {
        #[test]
        fn encode_then_parse_is_identity(row in 0usize..10_000, column in 0usize..MAX_COLUMNS) {
            let label = encode(row, column);
            prop_assert_eq!(parse(label.as_str()).unwrap(), (row, column));
            prop_assert_eq!(parse(&label.as_str().to_lowercase()).unwrap(), (row, column));
        }

        #[test]
        fn distinct_positions_get_distinct_labels(
            a in (0usize..500, 0usize..MAX_COLUMNS),
            b in (0usize..500, 0usize..MAX_COLUMNS),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(encode(a.0, a.1), encode(b.0, b.1));
        }
    }
}
