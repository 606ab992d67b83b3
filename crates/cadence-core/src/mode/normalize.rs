//! Typed-answer normalization
//!
//! Canonical form used for forgiving equality on typed answers:
//! compatibility decomposition, combining marks dropped, lowercased,
//! whitespace trimmed and collapsed to single spaces.
//!
//! Pure and idempotent: `normalize(normalize(x)) == normalize(x)`.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalize a typed answer.
///
/// ```rust
/// use cadence_core::normalize;
///
/// assert_eq!(normalize("  Café   au  LAIT "), "cafe au lait");
/// assert_eq!(normalize(" Café  "), normalize("cafe"));
/// ```
pub fn normalize(input: &str) -> String {
    let folded: String = input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    // lowercase mappings can yield decomposable characters again
    let folded: String = folded.nfkd().filter(|c| !is_combining_mark(*c)).collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compare a typed answer against the expected back of a card
pub fn answers_match(expected: &str, given: &str) -> bool {
    normalize(expected) == normalize(given)
}
