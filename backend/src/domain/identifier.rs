//! Property identifier codec.
//!
//! Listings are addressed in three historical formats:
//!
//! - a canonical short code such as `KTR-482` (three letters, three digits,
//!   drawn from glyphs that cannot be confused with each other);
//! - a share slug such as `sunny-loft-near-the-park-ktr-482`, where only the
//!   trailing code is authoritative;
//! - a legacy 36-character UUID issued before short codes existed.
//!
//! Classification is a pure function over untrusted input and never fails:
//! anything that is not recognisable is reported as
//! [`IncomingIdentifier::Unrecognized`] and callers decide policy.

use std::fmt;
use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use uuid::Uuid;

/// Letters allowed in short codes: `I` and `O` are excluded.
const CODE_LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
/// Digits allowed in short codes: `0` and `1` are excluded.
const CODE_DIGITS: &[u8] = b"23456789";
const CODE_LETTER_COUNT: usize = 3;
const CODE_DIGIT_COUNT: usize = 3;
/// Length of a legacy hyphenated UUID.
pub const LEGACY_ID_LEN: usize = 36;
/// Maximum length of the title fragment embedded in a slug.
pub const SLUG_TITLE_MAX: usize = 60;
/// Inputs longer than this are never classified as anything but unrecognised.
const MAX_INCOMING_LEN: usize = 256;

const CODE_PATTERN: &str = "([A-HJ-NP-Z]{3})-?([2-9]{3})";

static SHORT_CODE_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_SUFFIX_RE: OnceLock<Regex> = OnceLock::new();

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|error| panic!("identifier regex failed to compile: {error}"))
}

fn short_code_regex() -> &'static Regex {
    SHORT_CODE_RE.get_or_init(|| compile(&format!("(?i)^{CODE_PATTERN}$")))
}

fn slug_suffix_regex() -> &'static Regex {
    SLUG_SUFFIX_RE.get_or_init(|| compile(&format!("(?i)^.+-{CODE_PATTERN}$")))
}

/// Error returned when a string is not a short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseShortCodeError;

impl fmt::Display for ParseShortCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("short code must be three letters followed by three digits")
    }
}

impl std::error::Error for ParseShortCodeError {}

/// Canonical short code of a property, rendered as `ABC-234`.
///
/// ## Invariants
/// - Three uppercase letters from the unambiguous alphabet, a hyphen, three
///   digits from `2-9`.
///
/// # Examples
/// ```
/// use listings::domain::ShortCode;
///
/// let code = ShortCode::parse("ktr482").expect("valid code");
/// assert_eq!(code.as_ref(), "KTR-482");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Parse a short code, accepting either case and an optional hyphen.
    pub fn parse(raw: &str) -> Result<Self, ParseShortCodeError> {
        let captures = short_code_regex()
            .captures(raw)
            .ok_or(ParseShortCodeError)?;
        Ok(Self::from_parts(
            captures.get(1).map_or("", |m| m.as_str()),
            captures.get(2).map_or("", |m| m.as_str()),
        ))
    }

    fn from_parts(letters: &str, digits: &str) -> Self {
        Self(format!("{}-{digits}", letters.to_ascii_uppercase()))
    }

    /// Generate a random code using the supplied RNG.
    ///
    /// Format is guaranteed; global uniqueness is not. Callers must retry when
    /// persistence reports a uniqueness violation.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let letters: String = (0..CODE_LETTER_COUNT)
            .map(|_| char::from(CODE_LETTERS[rng.gen_range(0..CODE_LETTERS.len())]))
            .collect();
        let digits: String = (0..CODE_DIGIT_COUNT)
            .map(|_| char::from(CODE_DIGITS[rng.gen_range(0..CODE_DIGITS.len())]))
            .collect();
        Self::from_parts(&letters, &digits)
    }

    /// Lowercase rendering used inside slugs.
    pub fn to_slug_suffix(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

/// Generate a fresh short code from the thread-local RNG.
pub fn generate_short_code() -> ShortCode {
    ShortCode::generate_with(&mut rand::thread_rng())
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for ShortCode {
    type Error = ParseShortCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Identifier issued before short codes existed.
///
/// Recognised only so that endpoints can answer with a permanent "gone"
/// outcome instead of a misleading "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegacyId(Uuid);

impl LegacyId {
    /// Parse the fixed 36-character hyphenated form.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != LEGACY_ID_LEN || raw.chars().filter(|ch| *ch == '-').count() != 4 {
            return None;
        }
        Uuid::try_parse(raw).ok().map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for LegacyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of an inbound property identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingIdentifier {
    /// A short code, given directly or as the suffix of a slug.
    ShortCode(ShortCode),
    /// A retired legacy identifier.
    Legacy(LegacyId),
    /// Anything else.
    Unrecognized,
}

/// Classify an untrusted identifier taken from a request path.
///
/// Legacy ids are checked before slug suffixes so that a UUID can never be
/// misread as a slug.
///
/// # Examples
/// ```
/// use listings::domain::{IncomingIdentifier, ShortCode, resolve_incoming};
///
/// let code = ShortCode::parse("KTR-482").expect("valid code");
/// assert_eq!(
///     resolve_incoming("sunny-loft-ktr-482"),
///     IncomingIdentifier::ShortCode(code),
/// );
/// assert_eq!(resolve_incoming("???"), IncomingIdentifier::Unrecognized);
/// ```
pub fn resolve_incoming(raw: &str) -> IncomingIdentifier {
    if raw.is_empty() || raw.len() > MAX_INCOMING_LEN {
        return IncomingIdentifier::Unrecognized;
    }
    if let Ok(code) = ShortCode::parse(raw) {
        return IncomingIdentifier::ShortCode(code);
    }
    if let Some(legacy) = LegacyId::parse(raw) {
        return IncomingIdentifier::Legacy(legacy);
    }
    slug_suffix_regex()
        .captures(raw)
        .and_then(|captures| {
            let letters = captures.get(1)?.as_str();
            let digits = captures.get(2)?.as_str();
            Some(IncomingIdentifier::ShortCode(ShortCode::from_parts(
                letters, digits,
            )))
        })
        .unwrap_or(IncomingIdentifier::Unrecognized)
}

/// Build the share slug for a listing title and its code.
///
/// Lowercases, strips diacritics, collapses every run of other characters to a
/// single hyphen, trims the fragment to [`SLUG_TITLE_MAX`] characters on a
/// word boundary, then appends `-{code}`.
///
/// # Examples
/// ```
/// use listings::domain::{ShortCode, build_slug};
///
/// let code = ShortCode::parse("KTR-482").expect("valid code");
/// assert_eq!(build_slug("  Café   Déjà Vu! ", &code), "cafe-deja-vu-ktr-482");
/// assert_eq!(build_slug("!!!", &code), "ktr-482");
/// ```
pub fn build_slug(title: &str, code: &ShortCode) -> String {
    let fragment = title_fragment(title);
    let suffix = code.to_slug_suffix();
    if fragment.is_empty() {
        suffix
    } else {
        format!("{fragment}-{suffix}")
    }
}

fn title_fragment(title: &str) -> String {
    let mut fragment = String::with_capacity(title.len());
    let mut pending_separator = false;
    for ch in title.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !fragment.is_empty() {
                fragment.push('-');
            }
            pending_separator = false;
            fragment.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    truncate_on_word_boundary(fragment)
}

fn truncate_on_word_boundary(fragment: String) -> String {
    if fragment.len() <= SLUG_TITLE_MAX {
        return fragment;
    }
    let cut: String = fragment.chars().take(SLUG_TITLE_MAX).collect();
    let next_is_boundary = fragment.chars().nth(SLUG_TITLE_MAX) == Some('-');
    let trimmed = if next_is_boundary {
        cut.as_str()
    } else {
        cut.rsplit_once('-').map_or(cut.as_str(), |(head, _)| head)
    };
    trimmed.trim_end_matches('-').to_owned()
}

#[cfg(test)]
#[path = "identifier_tests.rs"]
mod tests;
