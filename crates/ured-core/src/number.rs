//! # Invoice Number Module
//!
//! Invoice display numbers have the form `"<sequence>/<yearSuffix>"`,
//! e.g. `"223/25"` for the 223rd invoice of 2025. Sequences restart each
//! calendar year, so the two-digit year suffix is the partition key.
//!
//! ## Allocation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Number Allocation                            │
//! │                                                                         │
//! │  POST /api/invoices { date: "2025-03-01", ... }                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  YearSuffix::from_date(date)          → "25"                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ured-db: load numbers WHERE year_suffix = "25"                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next_sequence("25", ["223/25", "224/25"], floor) ← THIS MODULE       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceNumber::new(225, "25") → "225/25" → INSERT                     │
//! │                                                                         │
//! │  (UNIQUE index on number + bounded retry closes the read/insert race)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! For a fixed year suffix, every allocated sequence is strictly greater
//! than all previously assigned sequences for that suffix. Partitions are
//! independent: numbers under `"26"` never influence allocation for `"25"`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Failure to parse a stored invoice number string.
///
/// Stored numbers are user-editable through the generic update endpoint,
/// so the allocator must tolerate arbitrary garbage: malformed rows are
/// skipped when computing the running maximum, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberParseError {
    /// The string has no `/` separator.
    #[error("invoice number '{0}' has no '/' separator")]
    MissingSeparator(String),

    /// The part before `/` is not a positive integer.
    #[error("invoice number '{0}' has a non-numeric sequence part")]
    InvalidSequence(String),

    /// The part after `/` is not exactly two digits.
    #[error("invoice number '{0}' has an invalid year suffix")]
    InvalidYearSuffix(String),
}

// =============================================================================
// Year Suffix
// =============================================================================

/// Two-digit year partition key (`2025` → `"25"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearSuffix([u8; 2]);

impl YearSuffix {
    /// Derives the suffix from a full calendar year.
    ///
    /// Uses the last two decimal digits, zero-padded (`2026` → `"26"`,
    /// `2100` → `"00"`).
    pub fn from_year(year: i32) -> Self {
        let rem = year.rem_euclid(100) as u8;
        YearSuffix([b'0' + rem / 10, b'0' + rem % 10])
    }

    /// Derives the suffix from an issuance date.
    pub fn from_date(date: NaiveDate) -> Self {
        YearSuffix::from_year(date.year())
    }
}

impl fmt::Display for YearSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

impl FromStr for YearSuffix {
    type Err = NumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        match bytes {
            [a @ b'0'..=b'9', b @ b'0'..=b'9'] => Ok(YearSuffix([*a, *b])),
            _ => Err(NumberParseError::InvalidYearSuffix(s.to_string())),
        }
    }
}

impl From<YearSuffix> for String {
    fn from(suffix: YearSuffix) -> Self {
        suffix.to_string()
    }
}

impl TryFrom<String> for YearSuffix {
    type Error = NumberParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Invoice Number
// =============================================================================

/// A parsed invoice display number.
///
/// ## Dual-Key Identity Pattern
/// Invoices carry both an opaque `id` (UUID, immutable) and this business
/// number (human-readable, editable through the update endpoint). Only the
/// business number participates in year-scoped sequencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvoiceNumber {
    /// Sequence within the year partition. No fixed width; hand edits can
    /// push it well past anything allocation would ever produce.
    pub sequence: u64,

    /// Two-digit year partition key.
    pub year_suffix: YearSuffix,
}

impl InvoiceNumber {
    /// Creates an invoice number from its parts.
    #[inline]
    pub const fn new(sequence: u64, year_suffix: YearSuffix) -> Self {
        InvoiceNumber {
            sequence,
            year_suffix,
        }
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sequence, self.year_suffix)
    }
}

impl FromStr for InvoiceNumber {
    type Err = NumberParseError;

    /// Parses `"<sequence>/<yearSuffix>"` (pattern `^\d+/\d{2}$`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (seq_part, year_part) = s
            .split_once('/')
            .ok_or_else(|| NumberParseError::MissingSeparator(s.to_string()))?;

        let sequence: u64 = seq_part
            .parse()
            .map_err(|_| NumberParseError::InvalidSequence(s.to_string()))?;

        let year_suffix: YearSuffix = year_part
            .parse()
            .map_err(|_| NumberParseError::InvalidYearSuffix(s.to_string()))?;

        Ok(InvoiceNumber {
            sequence,
            year_suffix,
        })
    }
}

// =============================================================================
// Allocator
// =============================================================================

/// Computes the next unused sequence for a year partition.
///
/// ## Contract
/// - `existing` is the set of stored number strings considered for the
///   partition; entries that don't parse, or whose suffix differs from
///   `target`, are skipped. (The caller owns diagnostics for skipped rows,
///   see [`malformed_numbers`].)
/// - Returns `max + 1` over the surviving sequences (saturating at the
///   type's ceiling), or `floor` when the partition is empty.
///
/// Purely a read: persistence of the resulting number is the caller's job,
/// and the uniqueness guarantee under concurrent allocation comes from the
/// store's UNIQUE index, not from this function.
pub fn next_sequence<'a, I>(target: YearSuffix, existing: I, floor: u64) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    let mut max: Option<u64> = None;

    for raw in existing {
        let Ok(number) = raw.trim().parse::<InvoiceNumber>() else {
            continue;
        };
        if number.year_suffix != target {
            continue;
        }
        max = Some(match max {
            Some(m) => m.max(number.sequence),
            None => number.sequence,
        });
    }

    match max {
        // Saturating: a stored ceiling value yields the ceiling again, and
        // the duplicate surfaces as a uniqueness conflict at insert rather
        // than a wrapped sequence
        Some(m) => m.saturating_add(1),
        None => floor,
    }
}

/// Returns the entries of `existing` that do not parse as invoice numbers.
///
/// Companion to [`next_sequence`]: repositories log these at WARN so a
/// hand-edited number doesn't silently shrink the partition.
pub fn malformed_numbers<'a, I>(existing: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter(|raw| raw.trim().parse::<InvoiceNumber>().is_err())
        .collect()
}

/// Determines the year partition a stored invoice row belongs to.
///
/// The suffix embedded in the number wins; rows whose number carries no
/// parsable suffix (legacy plain-integer numbers, hand edits) fall back to
/// the suffix of the issuance date.
pub fn partition_suffix(number: &str, date: NaiveDate) -> YearSuffix {
    match number.trim().parse::<InvoiceNumber>() {
        Ok(parsed) => parsed.year_suffix,
        Err(_) => YearSuffix::from_date(date),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn suffix(s: &str) -> YearSuffix {
        s.parse().unwrap()
    }

    #[test]
    fn test_year_suffix_from_year() {
        assert_eq!(YearSuffix::from_year(2025).to_string(), "25");
        assert_eq!(YearSuffix::from_year(2026).to_string(), "26");
        assert_eq!(YearSuffix::from_year(2100).to_string(), "00");
        assert_eq!(YearSuffix::from_year(2004).to_string(), "04");
    }

    #[test]
    fn test_year_suffix_parse() {
        assert_eq!(suffix("26"), YearSuffix::from_year(2026));
        assert!("2".parse::<YearSuffix>().is_err());
        assert!("260".parse::<YearSuffix>().is_err());
        assert!("ab".parse::<YearSuffix>().is_err());
    }

    #[test]
    fn test_invoice_number_round_trip() {
        let n: InvoiceNumber = "5/26".parse().unwrap();
        assert_eq!(n.sequence, 5);
        assert_eq!(n.year_suffix.to_string(), "26");
        assert_eq!(n.to_string(), "5/26");

        let formatted = InvoiceNumber::new(5, suffix("26")).to_string();
        assert_eq!(formatted, "5/26");
        assert_eq!(formatted.parse::<InvoiceNumber>().unwrap(), n);
    }

    #[test]
    fn test_invoice_number_rejects_garbage() {
        assert!(matches!(
            "223".parse::<InvoiceNumber>(),
            Err(NumberParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "abc/25".parse::<InvoiceNumber>(),
            Err(NumberParseError::InvalidSequence(_))
        ));
        assert!(matches!(
            "223/2025".parse::<InvoiceNumber>(),
            Err(NumberParseError::InvalidYearSuffix(_))
        ));
        assert!("".parse::<InvoiceNumber>().is_err());
        assert!("/25".parse::<InvoiceNumber>().is_err());
        assert!("223/".parse::<InvoiceNumber>().is_err());
    }

    #[test]
    fn test_next_sequence_empty_partition_returns_floor() {
        let next = next_sequence(suffix("30"), [], 223);
        assert_eq!(next, 223);
    }

    #[test]
    fn test_next_sequence_is_max_plus_one() {
        let stored = ["223/25", "224/25", "10/26"];
        assert_eq!(next_sequence(suffix("25"), stored, 223), 225);
        assert_eq!(next_sequence(suffix("26"), stored, 223), 11);
    }

    #[test]
    fn test_partitions_are_independent() {
        // A large sequence under "26" must not leak into "25"
        let stored = ["900/26", "223/25"];
        assert_eq!(next_sequence(suffix("25"), stored, 223), 224);
        assert_eq!(next_sequence(suffix("26"), stored, 223), 901);
    }

    #[test]
    fn test_next_sequence_skips_malformed() {
        let stored = ["abc/25", "224/25", "999", "/25", "224/2025"];
        assert_eq!(next_sequence(suffix("25"), stored, 223), 225);

        // Only malformed rows for the partition at all -> floor
        let stored = ["abc/25", "nonsense"];
        assert_eq!(next_sequence(suffix("25"), stored, 223), 223);
    }

    #[test]
    fn test_next_sequence_counts_past_wide_sequences() {
        // Numbers are hand-editable; widths past 32 bits still count up
        assert_eq!(
            next_sequence(suffix("25"), ["4294967295/25"], 223),
            4_294_967_296
        );
        assert_eq!(
            next_sequence(suffix("25"), ["99999999999/25"], 223),
            100_000_000_000
        );
    }

    #[test]
    fn test_next_sequence_saturates_at_ceiling() {
        // A stored ceiling sequence must not wrap; the repeated value is
        // rejected by the store's UNIQUE index instead
        assert_eq!(
            next_sequence(suffix("25"), ["18446744073709551615/25"], 223),
            u64::MAX
        );
    }

    #[test]
    fn test_next_sequence_run_is_contiguous() {
        // N allocations against an empty partition yield floor..floor+N-1
        let target = suffix("27");
        let mut stored: Vec<String> = Vec::new();
        for expected in 223..223 + 5 {
            let next = next_sequence(target, stored.iter().map(String::as_str), 223);
            assert_eq!(next, expected);
            stored.push(InvoiceNumber::new(next, target).to_string());
        }
    }

    #[test]
    fn test_next_sequence_honors_configured_floor() {
        assert_eq!(next_sequence(suffix("25"), [], 1), 1);
        assert_eq!(next_sequence(suffix("25"), ["1/25"], 1), 2);
    }

    #[test]
    fn test_malformed_numbers() {
        let stored = ["223/25", "abc/25", "10/26", "oops"];
        assert_eq!(malformed_numbers(stored), vec!["abc/25", "oops"]);
    }

    #[test]
    fn test_partition_suffix_prefers_number() {
        assert_eq!(
            partition_suffix("223/25", date("2026-01-01")),
            suffix("25")
        );
        // No parsable suffix -> fall back to the date's year
        assert_eq!(partition_suffix("223", date("2026-01-01")), suffix("26"));
        assert_eq!(partition_suffix("", date("2025-06-15")), suffix("25"));
    }
}
