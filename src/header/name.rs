//! Header Name

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};

use bytes::Bytes;
use lazy_static::lazy_static;

lazy_static! {
    /// Maps lowercase header names with an irregular canonical capitalization to that
    /// capitalization. Any name not in this table canonicalizes via [`dash_capitalize`].
    static ref CASE_MAPPINGS: HashMap<&'static [u8], &'static [u8]> = {
        let mut mappings = HashMap::new();
        mappings.insert(&b"content-md5"[..], &b"Content-MD5"[..]);
        mappings.insert(&b"dnt"[..], &b"DNT"[..]);
        mappings.insert(&b"etag"[..], &b"ETag"[..]);
        mappings.insert(&b"p3p"[..], &b"P3P"[..]);
        mappings.insert(&b"te"[..], &b"TE"[..]);
        mappings.insert(&b"www-authenticate"[..], &b"WWW-Authenticate"[..]);
        mappings.insert(&b"x-xss-protection"[..], &b"X-XSS-Protection"[..]);
        mappings
    };
}

/// A header name as given by a caller, either as raw bytes or as text.
///
/// Byte names pass through the store untouched. Text names are encoded using ISO-8859-1 before
/// storage, and operations that return values mirror this distinction: values looked up through a
/// text name come back as text, values looked up through a byte name come back as raw bytes.
///
/// Conversions exist for the common borrowed string and byte types, so call sites can simply pass
/// `"Content-Type"` or `b"content-type"`.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub enum HeaderName<'name> {
    /// A raw byte name, stored as given (modulo ASCII lowercasing).
    Bytes(&'name [u8]),

    /// A text name, encoded using ISO-8859-1 before storage.
    Text(&'name str),
}

impl<'name> HeaderName<'name> {
    /// Returns whether this name was given as text, meaning values read through it are decoded
    /// back into text.
    pub fn is_text(&self) -> bool {
        matches!(self, HeaderName::Text(_))
    }

    /// Encodes this name into its normalized storage form: ISO-8859-1 bytes, ASCII lowercased.
    ///
    /// # Panics
    ///
    /// Panics if a text name contains a character above U+00FF, as such a name has no ISO-8859-1
    /// representation. Byte names cannot panic.
    pub(crate) fn encode(&self) -> NormalizedName {
        let mut bytes = match self {
            HeaderName::Bytes(bytes) => bytes.to_vec(),
            HeaderName::Text(text) => encode_latin1(text),
        };
        bytes.make_ascii_lowercase();
        NormalizedName(Bytes::from(bytes))
    }

    pub(crate) fn display_string(&self) -> String {
        match self {
            HeaderName::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            HeaderName::Text(text) => (*text).to_string(),
        }
    }
}

impl<'name> Debug for HeaderName<'name> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HeaderName::Bytes(bytes) => write!(formatter, "{:?}", Bytes::copy_from_slice(bytes)),
            HeaderName::Text(text) => write!(formatter, "{:?}", text),
        }
    }
}

impl<'name> Display for HeaderName<'name> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.display_string())
    }
}

impl<'name> From<&'name str> for HeaderName<'name> {
    fn from(value: &'name str) -> Self {
        HeaderName::Text(value)
    }
}

impl<'name> From<&'name String> for HeaderName<'name> {
    fn from(value: &'name String) -> Self {
        HeaderName::Text(value.as_str())
    }
}

impl<'name> From<&'name [u8]> for HeaderName<'name> {
    fn from(value: &'name [u8]) -> Self {
        HeaderName::Bytes(value)
    }
}

impl<'name, const N: usize> From<&'name [u8; N]> for HeaderName<'name> {
    fn from(value: &'name [u8; N]) -> Self {
        HeaderName::Bytes(&value[..])
    }
}

impl<'name> From<&'name Vec<u8>> for HeaderName<'name> {
    fn from(value: &'name Vec<u8>) -> Self {
        HeaderName::Bytes(value.as_slice())
    }
}

/// A header name in its normalized storage form: ISO-8859-1 encoded and lowercased.
///
/// This is the key type of the store's internal mapping. No two stored names differ only by case,
/// since every name is normalized through this type before storage.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NormalizedName(Bytes);

impl NormalizedName {
    /// Returns the normalized name as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the canonical display capitalization for this name.
    ///
    /// Names with an irregular capitalization (e.g. `dnt`, `etag`) come from a fixed table;
    /// everything else is capitalized per `-`-separated word. This is purely a display transform
    /// and never affects the stored key.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_headers::HeaderStore;
    ///
    /// let mut headers = HeaderStore::new();
    /// headers.add_raw_header("x-forwarded-for", "203.0.113.9");
    ///
    /// let name = headers.names().next().unwrap().canonical();
    /// assert_eq!(name, "X-Forwarded-For");
    /// ```
    pub fn canonical(&self) -> CanonicalName {
        let canonical = match CASE_MAPPINGS.get(self.as_bytes()) {
            Some(&canonical) => Bytes::from_static(canonical),
            None => dash_capitalize(self.as_bytes()),
        };
        CanonicalName(canonical)
    }
}

impl Debug for NormalizedName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:?}", self.0)
    }
}

impl Display for NormalizedName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", decode_latin1(&self.0))
    }
}

impl PartialEq<[u8]> for NormalizedName {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other)
    }
}

impl<'name> PartialEq<&'name [u8]> for NormalizedName {
    fn eq(&self, other: &&'name [u8]) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other)
    }
}

impl PartialEq<str> for NormalizedName {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other.as_bytes())
    }
}

impl<'name> PartialEq<&'name str> for NormalizedName {
    fn eq(&self, other: &&'name str) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other.as_bytes())
    }
}

/// The canonical display capitalization of a header name, as produced by
/// [`HeaderStore::all_raw_headers`](crate::HeaderStore::all_raw_headers).
///
/// Unlike [`NormalizedName`], comparisons against strings and byte slices are case sensitive: the
/// whole point of this type is that it carries a specific capitalization.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CanonicalName(Bytes);

impl CanonicalName {
    /// Returns the canonical name as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for CanonicalName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:?}", self.0)
    }
}

impl Display for CanonicalName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", decode_latin1(&self.0))
    }
}

impl PartialEq<[u8]> for CanonicalName {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<'name> PartialEq<&'name [u8]> for CanonicalName {
    fn eq(&self, other: &&'name [u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl PartialEq<str> for CanonicalName {
    fn eq(&self, other: &str) -> bool {
        decode_latin1(self.as_bytes()) == *other
    }
}

impl<'name> PartialEq<&'name str> for CanonicalName {
    fn eq(&self, other: &&'name str) -> bool {
        decode_latin1(self.as_bytes()) == **other
    }
}

/// Encodes text into ISO-8859-1 bytes, panicking on any character above U+00FF.
///
/// ISO-8859-1 code points coincide with the first 256 Unicode code points, so encoding is a
/// straight narrowing of each character.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|character| {
            let code_point = character as u32;
            if code_point > 0xFF {
                panic!("header name {:?} cannot be encoded using ISO-8859-1", text);
            }
            code_point as u8
        })
        .collect()
}

/// Decodes ISO-8859-1 bytes into text. Infallible, since every byte is a valid code point.
fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    if bytes.is_ascii() {
        // Unsafe: ASCII is always valid UTF-8.
        Cow::Borrowed(unsafe { std::str::from_utf8_unchecked(bytes) })
    } else {
        Cow::Owned(bytes.iter().map(|&byte| byte as char).collect())
    }
}

/// Capitalizes a lowercase name using `-` as a word separator: the first byte of each segment is
/// uppercased and the rest lowercased.
fn dash_capitalize(name: &[u8]) -> Bytes {
    let mut capitalized = Vec::with_capacity(name.len());

    for (index, segment) in name.split(|&byte| byte == b'-').enumerate() {
        if index > 0 {
            capitalized.push(b'-');
        }

        for (offset, &byte) in segment.iter().enumerate() {
            if offset == 0 {
                capitalized.push(byte.to_ascii_uppercase());
            } else {
                capitalized.push(byte.to_ascii_lowercase());
            }
        }
    }

    Bytes::from(capitalized)
}

#[cfg(test)]
mod test {
    use super::*;

    fn canonical(name: &str) -> CanonicalName {
        HeaderName::from(name).encode().canonical()
    }

    #[test]
    fn test_encode_normalizes_case() {
        assert_eq!(
            HeaderName::from("Content-Type").encode().as_bytes(),
            &b"content-type"[..]
        );
        assert_eq!(
            HeaderName::from(b"CONTENT-TYPE").encode().as_bytes(),
            &b"content-type"[..]
        );
        assert_eq!(
            HeaderName::from("content-type").encode(),
            HeaderName::from(b"Content-Type").encode()
        );
    }

    #[test]
    fn test_canonical_generic_rule() {
        assert_eq!(canonical("content-type"), "Content-Type");
        assert_eq!(canonical("x-forwarded-for"), "X-Forwarded-For");
        assert_eq!(canonical("server"), "Server");
    }

    #[test]
    fn test_canonical_irregular_table() {
        assert_eq!(canonical("dnt"), "DNT");
        assert_eq!(canonical("etag"), "ETag");
        assert_eq!(canonical("content-md5"), "Content-MD5");
        assert_eq!(canonical("www-authenticate"), "WWW-Authenticate");
        assert_eq!(canonical("x-xss-protection"), "X-XSS-Protection");
    }

    #[test]
    fn test_canonical_idempotent() {
        for name in &["content-type", "dnt", "etag", "x-forwarded-for"] {
            let once = canonical(name);
            let twice = HeaderName::from(once.as_bytes()).encode().canonical();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_dash_capitalize_edge_cases() {
        assert_eq!(dash_capitalize(b""), &b""[..]);
        assert_eq!(dash_capitalize(b"-"), &b"-"[..]);
        assert_eq!(dash_capitalize(b"a--b"), &b"A--B"[..]);
        assert_eq!(dash_capitalize(b"x-"), &b"X-"[..]);
    }

    #[test]
    fn test_latin1_round_trip() {
        let name = HeaderName::from("na\u{ef}ve").encode();
        assert_eq!(name.as_bytes(), &b"na\xefve"[..]);
        assert_eq!(name.to_string(), "na\u{ef}ve");
    }

    #[test]
    #[should_panic]
    fn test_encode_rejects_non_latin1() {
        HeaderName::from("sm\u{2603}ll").encode();
    }
}
