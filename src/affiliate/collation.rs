//! Key ordering for signature payloads.
//!
//! The partner computes signatures over values ordered by their keys using a
//! locale-aware sort. [`KeyOrdering::Collated`] reproduces the fixed root
//! collation order for the characters that occur in request keys:
//!
//! 1. primary: whitespace, then punctuation and symbols in collation order,
//!    then digits, then base letters compared without regard to case or
//!    accents;
//! 2. secondary: unaccented letters before accented ones, compared by their
//!    canonical (NFD) combining marks;
//! 3. tertiary: at the first case difference, lowercase sorts first;
//! 4. finally, raw bytes, so distinct keys never compare equal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// How mapping keys are ordered before their values are signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrdering {
    /// Locale collation as used by the partner's reference client.
    #[default]
    Collated,
    /// Plain byte-wise ordering.
    Bytewise,
}

impl KeyOrdering {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Collated => collate(a, b),
            Self::Bytewise => a.cmp(b),
        }
    }
}

/// ASCII punctuation and symbols in root collation order.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Whitespace,
    Punctuation,
    Digit,
    Letter,
}

fn primary_weight(c: char) -> (CharClass, u32) {
    if c.is_whitespace() {
        return (CharClass::Whitespace, c as u32);
    }
    if let Some(digit) = c.to_digit(10) {
        return (CharClass::Digit, digit);
    }
    if c.is_alphabetic() {
        let folded = c.to_lowercase().next().unwrap_or(c);
        return (CharClass::Letter, folded as u32);
    }
    match PUNCTUATION_ORDER.find(c) {
        Some(position) => (CharClass::Punctuation, position as u32),
        // Unlisted symbols sort after the listed ones, by code point.
        None => (CharClass::Punctuation, PUNCTUATION_ORDER.len() as u32 + c as u32),
    }
}

/// Per-level weights of a key after canonical decomposition.
#[derive(Debug, Default)]
struct CollationKey {
    primary: Vec<(CharClass, u32)>,
    /// Combining marks attached to each base character.
    secondary: Vec<Vec<u32>>,
    /// 1 for uppercase base characters, 0 otherwise.
    tertiary: Vec<u8>,
}

impl CollationKey {
    fn new(key: &str) -> Self {
        let mut weights = Self::default();
        for c in key.nfd() {
            if is_combining_mark(c) {
                match weights.secondary.last_mut() {
                    Some(marks) => marks.push(c as u32),
                    None => weights.secondary.push(vec![c as u32]),
                }
                continue;
            }
            weights.primary.push(primary_weight(c));
            weights.secondary.push(Vec::new());
            weights.tertiary.push(u8::from(c.is_uppercase()));
        }
        weights
    }
}

fn collate(a: &str, b: &str) -> Ordering {
    let (ka, kb) = (CollationKey::new(a), CollationKey::new(b));
    ka.primary
        .cmp(&kb.primary)
        .then_with(|| ka.secondary.cmp(&kb.secondary))
        .then_with(|| ka.tertiary.cmp(&kb.tertiary))
        .then_with(|| a.cmp(b))
}
