//! Header Store

use std::fmt::{self, Debug, Formatter};

use bytes::Bytes;
use ordered_multimap::ListOrderedMultimap;
use thiserror::Error;

use crate::header::name::{CanonicalName, HeaderName, NormalizedName};
use crate::header::value::{decode_value, HeaderValue, RawValues, ValueList};
use crate::header::view::SingleValueView;

/// Stores protocol headers in a key and multiple value format.
///
/// Header names are case insensitive and normalized to lowercase before storage, while the order
/// of the values stored under one name is significant and preserved: it represents the order of
/// repeated headers (e.g. multiple `Set-Cookie` lines).
///
/// Every operation accepts names and values as either raw bytes or text, interchangeably per
/// call. Internally everything is stored as bytes: text names are encoded using ISO-8859-1 and
/// text values using UTF-8. Operations that return values mirror the type of the name they were
/// given, so callers working purely in bytes never pay any encoding or decoding cost.
///
/// # Examples
///
/// ```
/// use raw_headers::HeaderStore;
///
/// let mut headers = HeaderStore::new();
/// headers.add_raw_header("Set-Cookie", "a=1");
/// headers.add_raw_header(b"set-cookie", b"b=2");
///
/// assert!(headers.has_header("SET-COOKIE"));
/// assert_eq!(headers.get_raw_headers("set-cookie").unwrap(), ["a=1", "b=2"]);
/// ```
pub struct HeaderStore {
    /// Mapping from normalized names to encoded values, insertion ordered at both levels.
    raw: ListOrderedMultimap<NormalizedName, Bytes>,
}

impl HeaderStore {
    /// Constructs an empty store.
    pub fn new() -> Self {
        HeaderStore {
            raw: ListOrderedMultimap::new(),
        }
    }

    /// Constructs a store by bulk-importing a name to values mapping.
    ///
    /// Each entry goes through the [`HeaderStore::set_raw_headers`] path, so every value list is
    /// encoded at import time and a non-sequence value list fails the import.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_headers::HeaderStore;
    ///
    /// let headers = HeaderStore::from_raw_headers(vec![
    ///     ("Content-Type", vec!["text/html"]),
    ///     ("Accept", vec!["text/html", "text/plain"]),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(headers.len(), 2);
    /// ```
    pub fn from_raw_headers<'name, 'value, N, V, I>(headers: I) -> Result<Self, TypeMismatchError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<HeaderName<'name>>,
        V: Into<ValueList<'value>>,
    {
        let mut store = HeaderStore::new();

        for (name, values) in headers {
            store.set_raw_headers(name, values)?;
        }

        Ok(store)
    }

    /// Replaces the full value sequence stored for the given header.
    ///
    /// The values argument must be a proper sequence (a `Vec` or an array); passing a single bare
    /// value is a usage error reported as a [`TypeMismatchError`] rather than silently wrapped,
    /// since wrapping would mask caller bugs where a single value was passed where a list was
    /// intended.
    ///
    /// Setting an empty sequence removes the entry: the store never holds a header without at
    /// least one value.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_headers::HeaderStore;
    ///
    /// let mut headers = HeaderStore::new();
    /// assert!(headers.set_raw_headers("Accept", vec!["text/html"]).is_ok());
    /// assert!(headers.set_raw_headers("Accept", "text/html").is_err());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if a text name contains a character above U+00FF, which has no ISO-8859-1 encoding.
    pub fn set_raw_headers<'name, 'value, N, V>(
        &mut self,
        name: N,
        values: V,
    ) -> Result<(), TypeMismatchError>
    where
        N: Into<HeaderName<'name>>,
        V: Into<ValueList<'value>>,
    {
        let name = name.into();

        match values.into() {
            ValueList::Sequence(values) => {
                let values = values.iter().map(HeaderValue::encode).collect();
                self.set_values(name.encode(), values);
                Ok(())
            }
            ValueList::Scalar(_) => Err(TypeMismatchError::new(&name)),
        }
    }

    /// Appends one value to the end of the sequence stored for the given header, creating the
    /// entry if it is absent. Repeated headers accumulate in call order.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_headers::HeaderStore;
    ///
    /// let mut headers = HeaderStore::new();
    /// headers.add_raw_header("Via", "proxy-a");
    /// headers.add_raw_header("Via", "proxy-b");
    ///
    /// assert_eq!(headers.get_raw_headers("via").unwrap(), ["proxy-a", "proxy-b"]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if a text name contains a character above U+00FF, which has no ISO-8859-1 encoding.
    pub fn add_raw_header<'name, 'value, N, V>(&mut self, name: N, value: V)
    where
        N: Into<HeaderName<'name>>,
        V: Into<HeaderValue<'value>>,
    {
        self.raw.append(name.into().encode(), value.into().encode());
    }

    /// Returns the value sequence stored for the given header, or [`Option::None`] if it is
    /// absent.
    ///
    /// The result mirrors the type of the name: a byte name yields raw byte values, a text name
    /// yields values decoded as UTF-8. The name itself is never canonicalized here.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_headers::HeaderStore;
    ///
    /// let mut headers = HeaderStore::new();
    /// headers.add_raw_header("Content-Type", "text/html");
    ///
    /// assert_eq!(headers.get_raw_headers("CONTENT-TYPE").unwrap(), ["text/html"]);
    /// assert!(headers.get_raw_headers("content-length").is_none());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if a text name contains a character above U+00FF, or if the name was given as text
    /// and a stored value is not valid UTF-8.
    pub fn get_raw_headers<'name, N>(&self, name: N) -> Option<RawValues>
    where
        N: Into<HeaderName<'name>>,
    {
        let name = name.into();
        let key = name.encode();

        if !self.raw.contains_key(&key) {
            return None;
        }

        let values = self.raw.get_all(&key);

        Some(if name.is_text() {
            RawValues::Text(values.map(decode_value).collect())
        } else {
            RawValues::Bytes(values.cloned().collect())
        })
    }

    /// Checks for the existence of the given header, case insensitively.
    pub fn has_header<'name, N>(&self, name: N) -> bool
    where
        N: Into<HeaderName<'name>>,
    {
        self.raw.contains_key(&name.into().encode())
    }

    /// Removes the given header and all of its values. Removing an absent header is a no-op.
    pub fn remove_header<'name, N>(&mut self, name: N)
    where
        N: Into<HeaderName<'name>>,
    {
        self.raw.remove(&name.into().encode());
    }

    /// Returns an iterator of `(canonical display name, raw values)` pairs, one per stored
    /// header, in key insertion order.
    ///
    /// This is the only operation that canonicalizes names; it is intended for serializers that
    /// re-emit `Name: value` lines. The iterator is finite and each call starts a fresh
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_headers::HeaderStore;
    ///
    /// let mut headers = HeaderStore::new();
    /// headers.add_raw_header("etag", "\"xyzzy\"");
    ///
    /// let all: Vec<_> = headers.all_raw_headers().collect();
    /// assert_eq!(all[0].0, "ETag");
    /// assert_eq!(all[0].1, [bytes::Bytes::from_static(b"\"xyzzy\"")]);
    /// ```
    pub fn all_raw_headers(&self) -> impl Iterator<Item = (CanonicalName, Vec<Bytes>)> + '_ {
        self.raw.keys().map(move |name| {
            let values = self.raw.get_all(name).cloned().collect();
            (name.canonical(), values)
        })
    }

    /// Returns an iterator of the distinct normalized header names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &NormalizedName> + '_ {
        self.raw.keys()
    }

    /// Returns the number of distinct header names.
    pub fn len(&self) -> usize {
        self.raw.keys_len()
    }

    /// Returns whether the store holds no headers.
    pub fn is_empty(&self) -> bool {
        self.raw.keys_len() == 0
    }

    /// Returns an independent copy of this store, rebuilt by re-importing every entry. Mutating
    /// the copy never affects the original.
    pub fn copy(&self) -> Self {
        let mut copy = HeaderStore::new();

        for name in self.raw.keys() {
            for value in self.raw.get_all(name) {
                copy.raw.append(name.clone(), value.clone());
            }
        }

        copy
    }

    /// Returns a single-value compatibility view over this store.
    ///
    /// See [`SingleValueView`] for the conventional mapping contract it provides.
    pub fn single_value_view(&mut self) -> SingleValueView<'_> {
        SingleValueView::new(self)
    }

    /// Iterates entries under their normalized names, used by the single-value view's export.
    pub(crate) fn raw_entries(&self) -> impl Iterator<Item = (&NormalizedName, Vec<Bytes>)> + '_ {
        self.raw
            .keys()
            .map(move |name| (name, self.raw.get_all(name).cloned().collect()))
    }

    /// Replaces the stored values for an already normalized name. An empty value list removes the
    /// entry instead, preserving the invariant that present keys hold at least one value.
    pub(crate) fn set_values(&mut self, name: NormalizedName, values: Vec<Bytes>) {
        self.raw.remove(&name);

        for value in values {
            self.raw.append(name.clone(), value);
        }
    }
}

impl Debug for HeaderStore {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "HeaderStore(")?;

        let mut map = formatter.debug_map();
        for name in self.raw.keys() {
            map.entry(&name, &self.raw.get_all(name).collect::<Vec<_>>());
        }
        map.finish()?;

        write!(formatter, ")")
    }
}

impl Default for HeaderStore {
    fn default() -> Self {
        HeaderStore::new()
    }
}

impl Clone for HeaderStore {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/// Two stores are equal iff their name to value-sequence mappings are equal when sorted by
/// normalized name: insensitive to the iteration order of entries, sensitive to the order of
/// values within each sequence.
impl PartialEq for HeaderStore {
    fn eq(&self, other: &HeaderStore) -> bool {
        if self.raw.keys_len() != other.raw.keys_len() {
            return false;
        }

        sorted_entries(self) == sorted_entries(other)
    }
}

impl Eq for HeaderStore {}

fn sorted_entries(store: &HeaderStore) -> Vec<(&NormalizedName, Vec<&Bytes>)> {
    let mut entries: Vec<_> = store
        .raw
        .keys()
        .map(|name| (name, store.raw.get_all(name).collect()))
        .collect();
    entries.sort_by(|left, right| left.0.cmp(right.0));
    entries
}

/// A possible error value when setting the raw values of a header.
///
/// This error indicates that the value list was a single bare value rather than a proper
/// sequence. It is a caller bug and is never retried.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("header entry {name:?} should be a sequence but found a single value instead")]
pub struct TypeMismatchError {
    name: String,
}

impl TypeMismatchError {
    pub(crate) fn new(name: &HeaderName<'_>) -> Self {
        TypeMismatchError {
            name: name.display_string(),
        }
    }

    /// Returns the name of the header whose values were rejected.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_then_get_round_trip() {
        let mut headers = HeaderStore::new();
        headers
            .set_raw_headers("Test", vec!["lemur", "panda"])
            .unwrap();

        assert_eq!(headers.get_raw_headers("test").unwrap(), ["lemur", "panda"]);
        assert_eq!(
            headers.get_raw_headers(b"test").unwrap(),
            [&b"lemur"[..], &b"panda"[..]]
        );
    }

    #[test]
    fn test_get_mirrors_name_type() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header(b"test", b"lemur");

        assert!(!headers.get_raw_headers(b"test").unwrap().is_text());
        assert!(headers.get_raw_headers("test").unwrap().is_text());
    }

    #[test]
    fn test_set_scalar_is_type_mismatch() {
        let mut headers = HeaderStore::new();
        let error = headers.set_raw_headers("test", "lemur").unwrap_err();

        assert_eq!(error.name(), "test");

        let error = headers.set_raw_headers(b"test", b"lemur").unwrap_err();
        assert_eq!(error.name(), "test");
    }

    #[test]
    fn test_set_empty_sequence_removes_entry() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("test", "lemur");
        headers
            .set_raw_headers("test", Vec::<&str>::new())
            .unwrap();

        assert!(!headers.has_header("test"));
        assert_eq!(headers.len(), 0);
    }

    #[test]
    fn test_remove_header_absent_is_noop() {
        let mut headers = HeaderStore::new();
        headers.remove_header("test");

        assert!(headers.is_empty());
    }

    #[test]
    fn test_all_raw_headers_canonicalizes_names() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("test-header", "lemur");
        headers.add_raw_header("dnt", "1");

        let all: Vec<_> = headers.all_raw_headers().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, "Test-Header");
        assert_eq!(all[1].0, "DNT");
    }

    #[test]
    fn test_all_raw_headers_is_restartable() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("test", "lemur");

        assert_eq!(headers.all_raw_headers().count(), 1);
        assert_eq!(headers.all_raw_headers().count(), 1);
    }

    #[test]
    fn test_equality_ignores_entry_order() {
        let mut left = HeaderStore::new();
        left.add_raw_header("foo", "a");
        left.add_raw_header("bar", "b");

        let mut right = HeaderStore::new();
        right.add_raw_header("bar", "b");
        right.add_raw_header("foo", "a");

        assert_eq!(left, right);
    }

    #[test]
    fn test_equality_respects_value_order() {
        let mut left = HeaderStore::new();
        left.add_raw_header("foo", "a");
        left.add_raw_header("foo", "b");

        let mut right = HeaderStore::new();
        right.add_raw_header("foo", "b");
        right.add_raw_header("foo", "a");

        assert_ne!(left, right);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("test", "lemur");

        let mut copy = headers.copy();
        copy.add_raw_header("test", "panda");
        copy.add_raw_header("extra", "tapir");

        assert_eq!(headers.get_raw_headers("test").unwrap(), ["lemur"]);
        assert!(!headers.has_header("extra"));
        assert_eq!(copy.get_raw_headers("test").unwrap(), ["lemur", "panda"]);
    }

    #[test]
    fn test_from_raw_headers_encodes_each_list() {
        let headers = HeaderStore::from_raw_headers(vec![
            ("foo", vec!["a", "b"]),
            ("bar", vec!["c"]),
        ])
        .unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get_raw_headers("foo").unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_debug_lists_raw_mapping() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("test", "lemur");

        let repr = format!("{:?}", headers);
        assert!(repr.starts_with("HeaderStore("));
        assert!(repr.contains("test"));
        assert!(repr.contains("lemur"));
    }
}
