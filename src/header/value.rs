//! Header Value

use std::fmt::{self, Debug, Display, Formatter};
use std::str;

use bytes::Bytes;

/// A single header value as given by a caller, either as raw bytes or as text.
///
/// Byte values pass through the store untouched. Text values are encoded using UTF-8 before
/// storage. Names and values are independent: a byte name may be paired with a text value and
/// vice versa, and a single value list may mix both kinds.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub enum HeaderValue<'value> {
    /// A raw byte value, stored as given.
    Bytes(&'value [u8]),

    /// A text value, encoded using UTF-8 before storage.
    Text(&'value str),
}

impl<'value> HeaderValue<'value> {
    /// Encodes this value into its raw storage form.
    ///
    /// Text values are UTF-8 encoded, which for a Rust string is a plain byte copy. Byte values
    /// are copied as given.
    pub(crate) fn encode(&self) -> Bytes {
        match self {
            HeaderValue::Bytes(bytes) => Bytes::copy_from_slice(bytes),
            HeaderValue::Text(text) => Bytes::copy_from_slice(text.as_bytes()),
        }
    }
}

impl<'value> Debug for HeaderValue<'value> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Bytes(bytes) => write!(formatter, "{:?}", Bytes::copy_from_slice(bytes)),
            HeaderValue::Text(text) => write!(formatter, "{:?}", text),
        }
    }
}

impl<'value> From<&'value str> for HeaderValue<'value> {
    fn from(value: &'value str) -> Self {
        HeaderValue::Text(value)
    }
}

impl<'value> From<&'value String> for HeaderValue<'value> {
    fn from(value: &'value String) -> Self {
        HeaderValue::Text(value.as_str())
    }
}

impl<'value> From<&'value [u8]> for HeaderValue<'value> {
    fn from(value: &'value [u8]) -> Self {
        HeaderValue::Bytes(value)
    }
}

impl<'value, const N: usize> From<&'value [u8; N]> for HeaderValue<'value> {
    fn from(value: &'value [u8; N]) -> Self {
        HeaderValue::Bytes(&value[..])
    }
}

impl<'value> From<&'value Vec<u8>> for HeaderValue<'value> {
    fn from(value: &'value Vec<u8>) -> Self {
        HeaderValue::Bytes(value.as_slice())
    }
}

/// The values argument of [`HeaderStore::set_raw_headers`](crate::HeaderStore::set_raw_headers).
///
/// Replacing a header's values requires a proper sequence. A lone value converts into the
/// [`ValueList::Scalar`] variant, which `set_raw_headers` rejects with a
/// [`TypeMismatchError`](crate::TypeMismatchError) instead of silently wrapping it in a
/// single-element sequence. Silent wrapping would mask caller bugs where a single value was passed
/// where a list was intended.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ValueList<'value> {
    /// A proper ordered sequence of values.
    Sequence(Vec<HeaderValue<'value>>),

    /// A single value passed where a sequence was expected. Always a usage error.
    Scalar(HeaderValue<'value>),
}

impl<'value, V> From<Vec<V>> for ValueList<'value>
where
    V: Into<HeaderValue<'value>>,
{
    fn from(values: Vec<V>) -> Self {
        ValueList::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<'value, V, const N: usize> From<[V; N]> for ValueList<'value>
where
    V: Into<HeaderValue<'value>>,
{
    fn from(values: [V; N]) -> Self {
        // Fully qualified so the by-value array iterator is used on the 2018 edition.
        ValueList::Sequence(IntoIterator::into_iter(values).map(Into::into).collect())
    }
}

impl<'value> From<HeaderValue<'value>> for ValueList<'value> {
    fn from(value: HeaderValue<'value>) -> Self {
        ValueList::Scalar(value)
    }
}

impl<'value> From<&'value str> for ValueList<'value> {
    fn from(value: &'value str) -> Self {
        ValueList::Scalar(HeaderValue::Text(value))
    }
}

impl<'value> From<&'value String> for ValueList<'value> {
    fn from(value: &'value String) -> Self {
        ValueList::Scalar(HeaderValue::Text(value.as_str()))
    }
}

impl<'value> From<&'value [u8]> for ValueList<'value> {
    fn from(value: &'value [u8]) -> Self {
        ValueList::Scalar(HeaderValue::Bytes(value))
    }
}

impl<'value, const N: usize> From<&'value [u8; N]> for ValueList<'value> {
    fn from(value: &'value [u8; N]) -> Self {
        ValueList::Scalar(HeaderValue::Bytes(&value[..]))
    }
}

/// The value sequence of one header, as returned by
/// [`HeaderStore::get_raw_headers`](crate::HeaderStore::get_raw_headers).
///
/// The variant mirrors the type of the name the values were looked up with: a byte name yields
/// [`RawValues::Bytes`], a text name yields [`RawValues::Text`] with each stored value UTF-8
/// decoded. Value order is the order in which the values were set or added.
///
/// Comparisons against vectors and arrays of `&str` / `&[u8]` compare content only, so tests and
/// call sites need not match on the variant first.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RawValues {
    /// Raw stored values.
    Bytes(Vec<Bytes>),

    /// Stored values decoded as UTF-8.
    Text(Vec<String>),
}

impl RawValues {
    /// Returns the number of values.
    pub fn len(&self) -> usize {
        match self {
            RawValues::Bytes(values) => values.len(),
            RawValues::Text(values) => values.len(),
        }
    }

    /// Returns whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether these values were decoded into text.
    pub fn is_text(&self) -> bool {
        matches!(self, RawValues::Text(_))
    }

    /// Returns the decoded text values, or [`Option::None`] for the byte variant.
    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            RawValues::Text(values) => Some(values),
            RawValues::Bytes(_) => None,
        }
    }

    /// Returns the raw byte values, or [`Option::None`] for the text variant.
    pub fn as_bytes(&self) -> Option<&[Bytes]> {
        match self {
            RawValues::Bytes(values) => Some(values),
            RawValues::Text(_) => None,
        }
    }

    /// Returns the last value, if any.
    pub(crate) fn into_last(self) -> Option<RawValue> {
        match self {
            RawValues::Bytes(mut values) => values.pop().map(RawValue::Bytes),
            RawValues::Text(mut values) => values.pop().map(RawValue::Text),
        }
    }

    fn eq_text(&self, other: &[&str]) -> bool {
        match self {
            RawValues::Bytes(values) => {
                values.len() == other.len()
                    && values
                        .iter()
                        .zip(other)
                        .all(|(value, expected)| *value == expected.as_bytes())
            }
            RawValues::Text(values) => {
                values.len() == other.len()
                    && values
                        .iter()
                        .zip(other)
                        .all(|(value, expected)| value == expected)
            }
        }
    }

    fn eq_bytes(&self, other: &[&[u8]]) -> bool {
        match self {
            RawValues::Bytes(values) => {
                values.len() == other.len()
                    && values
                        .iter()
                        .zip(other)
                        .all(|(value, expected)| value == expected)
            }
            RawValues::Text(values) => {
                values.len() == other.len()
                    && values
                        .iter()
                        .zip(other)
                        .all(|(value, expected)| value.as_bytes() == *expected)
            }
        }
    }
}

impl<'value> PartialEq<Vec<&'value str>> for RawValues {
    fn eq(&self, other: &Vec<&'value str>) -> bool {
        self.eq_text(other)
    }
}

impl<'value, const N: usize> PartialEq<[&'value str; N]> for RawValues {
    fn eq(&self, other: &[&'value str; N]) -> bool {
        self.eq_text(&other[..])
    }
}

impl<'value> PartialEq<Vec<&'value [u8]>> for RawValues {
    fn eq(&self, other: &Vec<&'value [u8]>) -> bool {
        self.eq_bytes(other)
    }
}

impl<'value, const N: usize> PartialEq<[&'value [u8]; N]> for RawValues {
    fn eq(&self, other: &[&'value [u8]; N]) -> bool {
        self.eq_bytes(&other[..])
    }
}

/// A single owned header value, as returned by
/// [`SingleValueView::get`](crate::SingleValueView::get).
///
/// As with [`RawValues`], the variant mirrors the type of the name the value was looked up with,
/// and comparisons against strings and byte slices compare content only.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RawValue {
    /// A raw stored value.
    Bytes(Bytes),

    /// A stored value decoded as UTF-8.
    Text(String),
}

impl RawValue {
    /// Returns the value as a byte slice, regardless of variant.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawValue::Bytes(value) => value,
            RawValue::Text(value) => value.as_bytes(),
        }
    }

    /// Returns the decoded text value, or [`Option::None`] for the byte variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(value) => Some(value),
            RawValue::Bytes(_) => None,
        }
    }

    /// Returns whether this value was decoded into text.
    pub fn is_text(&self) -> bool {
        matches!(self, RawValue::Text(_))
    }
}

impl Display for RawValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bytes(value) => write!(formatter, "{}", String::from_utf8_lossy(value)),
            RawValue::Text(value) => write!(formatter, "{}", value),
        }
    }
}

impl PartialEq<[u8]> for RawValue {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<'value> PartialEq<&'value [u8]> for RawValue {
    fn eq(&self, other: &&'value [u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl<'value, const N: usize> PartialEq<&'value [u8; N]> for RawValue {
    fn eq(&self, other: &&'value [u8; N]) -> bool {
        self.as_bytes() == &other[..]
    }
}

impl PartialEq<str> for RawValue {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<'value> PartialEq<&'value str> for RawValue {
    fn eq(&self, other: &&'value str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Decodes a raw stored value into text.
///
/// # Panics
///
/// Panics if the stored bytes are not valid UTF-8. Byte values are stored untouched, so a header
/// populated with non-UTF-8 bytes can only be read back through a byte-typed name.
pub(crate) fn decode_value(value: &Bytes) -> String {
    match str::from_utf8(value) {
        Ok(text) => text.to_string(),
        Err(error) => panic!(
            "header value {:?} cannot be decoded using UTF-8: {}",
            value, error
        ),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encode_passes_bytes_through() {
        assert_eq!(HeaderValue::from(b"\xff\xfe").encode(), &b"\xff\xfe"[..]);
        assert_eq!(HeaderValue::from("text").encode(), &b"text"[..]);
    }

    #[test]
    fn test_value_list_from_sequence() {
        assert_eq!(
            ValueList::from(vec!["a", "b"]),
            ValueList::Sequence(vec![HeaderValue::Text("a"), HeaderValue::Text("b")])
        );
        assert_eq!(
            ValueList::from([&b"a"[..], &b"b"[..]]),
            ValueList::Sequence(vec![
                HeaderValue::Bytes(b"a"),
                HeaderValue::Bytes(b"b")
            ])
        );
    }

    #[test]
    fn test_value_list_from_scalar() {
        assert_eq!(
            ValueList::from("a"),
            ValueList::Scalar(HeaderValue::Text("a"))
        );
        assert_eq!(
            ValueList::from(b"a"),
            ValueList::Scalar(HeaderValue::Bytes(b"a"))
        );
    }

    #[test]
    fn test_raw_values_content_equality() {
        let values = RawValues::Text(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(values, ["a", "b"]);
        assert_eq!(values, [&b"a"[..], &b"b"[..]]);
        assert_ne!(values, ["b", "a"]);
        assert_ne!(values, ["a"]);

        let values = RawValues::Bytes(vec![Bytes::from_static(b"a")]);
        assert_eq!(values, ["a"]);
        assert_eq!(values, vec![&b"a"[..]]);
    }

    #[test]
    fn test_decode_value_valid_utf8() {
        assert_eq!(decode_value(&Bytes::from_static(b"caf\xc3\xa9")), "caf\u{e9}");
    }

    #[test]
    #[should_panic]
    fn test_decode_value_invalid_utf8() {
        decode_value(&Bytes::from_static(b"\xff"));
    }
}
