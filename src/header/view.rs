//! Single Value View

use std::collections::HashMap;

use bytes::Bytes;
use thiserror::Error;

use crate::header::name::{HeaderName, NormalizedName};
use crate::header::store::HeaderStore;
use crate::header::value::{HeaderValue, RawValue, ValueList};

/// A compatibility adapter exposing a [`HeaderStore`] through the conventional single-value
/// mapping contract.
///
/// The view holds a live mutable borrow of its backing store and owns no header data of its own:
/// every operation is a projection onto the store's multi-value operations. When a header holds
/// several values, reads expose the *last* one, matching the convention that a later set should
/// visibly override an earlier one when viewed through a single-value lens; writes replace the
/// whole value sequence with a single element.
///
/// # Examples
///
/// ```
/// use raw_headers::HeaderStore;
///
/// let mut headers = HeaderStore::new();
/// headers.add_raw_header("x-count", "1");
/// headers.add_raw_header("x-count", "2");
///
/// let mut view = headers.single_value_view();
/// assert_eq!(view.get("x-count").unwrap(), "2");
///
/// view.set("x-count", "3");
/// drop(view);
///
/// assert_eq!(headers.get_raw_headers("x-count").unwrap(), ["3"]);
/// ```
pub struct SingleValueView<'store> {
    store: &'store mut HeaderStore,
}

impl<'store> SingleValueView<'store> {
    /// Wraps the given store. The view aliases the store for its whole lifetime: mutating through
    /// either side is observable through the other.
    pub fn new(store: &'store mut HeaderStore) -> Self {
        SingleValueView { store }
    }

    /// Returns the last value stored for the given header, type-mirrored to the name.
    ///
    /// Callers needing absence-tolerant reads should use
    /// [`HeaderStore::has_header`] / [`HeaderStore::get_raw_headers`] on the store instead.
    ///
    /// # Panics
    ///
    /// Panics if a text name contains a character above U+00FF, or if the name was given as text
    /// and the stored value is not valid UTF-8.
    pub fn get<'name, N>(&self, name: N) -> Result<RawValue, MissingHeaderError>
    where
        N: Into<HeaderName<'name>>,
    {
        let name = name.into();

        self.store
            .get_raw_headers(name)
            .and_then(|values| values.into_last())
            .ok_or_else(|| MissingHeaderError::new(&name))
    }

    /// Sets the given header to a single value, discarding any previously accumulated values.
    ///
    /// # Panics
    ///
    /// Panics if a text name contains a character above U+00FF, which has no ISO-8859-1 encoding.
    pub fn set<'name, 'value, N, V>(&mut self, name: N, value: V)
    where
        N: Into<HeaderName<'name>>,
        V: Into<HeaderValue<'value>>,
    {
        // A one-element sequence cannot be mismatched, so the result is always `Result::Ok`.
        let values = ValueList::Sequence(vec![value.into()]);
        let _ = self.store.set_raw_headers(name, values);
    }

    /// Removes the given header entirely, failing if it is absent.
    ///
    /// This differs from [`HeaderStore::remove_header`], for which removing an absent header is a
    /// no-op.
    pub fn remove<'name, N>(&mut self, name: N) -> Result<(), MissingHeaderError>
    where
        N: Into<HeaderName<'name>>,
    {
        let name = name.into();

        if self.store.has_header(name) {
            self.store.remove_header(name);
            Ok(())
        } else {
            Err(MissingHeaderError::new(&name))
        }
    }

    /// Checks for the existence of the given header, case insensitively.
    pub fn contains_key<'name, N>(&self, name: N) -> bool
    where
        N: Into<HeaderName<'name>>,
    {
        self.store.has_header(name)
    }

    /// Returns an iterator of every stored header's normalized lowercase name, exactly one entry
    /// per distinct header regardless of how many values it holds.
    pub fn keys(&self) -> impl Iterator<Item = &NormalizedName> + '_ {
        self.store.names()
    }

    /// Returns the number of distinct header names, not the total number of values.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns whether the backing store holds no headers.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Builds a materialized mapping from every header name to its last raw value.
    pub fn to_map(&self) -> HashMap<NormalizedName, Bytes> {
        self.store
            .raw_entries()
            .map(|(name, mut values)| {
                // Present keys always hold at least one value.
                let last = values.pop().expect("stored header with no values");
                (name.clone(), last)
            })
            .collect()
    }
}

/// A possible error value when reading or removing a header through a [`SingleValueView`].
///
/// This error indicates the header was absent from the backing store.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("missing header {name:?}")]
pub struct MissingHeaderError {
    name: String,
}

impl MissingHeaderError {
    pub(crate) fn new(name: &HeaderName<'_>) -> Self {
        MissingHeaderError {
            name: name.display_string(),
        }
    }

    /// Returns the name of the absent header.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_returns_last_value() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("test", "lemur");
        headers.add_raw_header("test", "panda");

        let view = headers.single_value_view();
        assert_eq!(view.get("test").unwrap(), "panda");
        assert_eq!(view.get(b"TEST").unwrap(), &b"panda"[..]);
    }

    #[test]
    fn test_get_absent_is_missing_header() {
        let mut headers = HeaderStore::new();
        let view = headers.single_value_view();

        let error = view.get("test").unwrap_err();
        assert_eq!(error.name(), "test");
    }

    #[test]
    fn test_set_discards_accumulated_values() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("test", "lemur");
        headers.add_raw_header("test", "panda");

        headers.single_value_view().set("TEST", "tapir");

        assert_eq!(headers.get_raw_headers("test").unwrap(), ["tapir"]);
    }

    #[test]
    fn test_remove_absent_is_missing_header() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("present", "here");

        let mut view = headers.single_value_view();
        assert!(view.remove("present").is_ok());
        assert_eq!(view.remove("present").unwrap_err().name(), "present");
    }

    #[test]
    fn test_keys_and_len_count_distinct_names() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("foo", "a");
        headers.add_raw_header("foo", "b");
        headers.add_raw_header("bar", "c");

        let view = headers.single_value_view();
        assert_eq!(view.len(), 2);

        let keys: Vec<_> = view.keys().collect();
        assert_eq!(keys, [&"foo", &"bar"]);
    }

    #[test]
    fn test_to_map_applies_last_wins() {
        let mut headers = HeaderStore::new();
        headers.add_raw_header("foo", "a");
        headers.add_raw_header("foo", "b");
        headers.add_raw_header("bar", "c");

        let map = headers.single_value_view().to_map();
        assert_eq!(map.len(), 2);

        let values: Vec<_> = map.values().cloned().collect();
        assert!(values.contains(&Bytes::from_static(b"b")));
        assert!(values.contains(&Bytes::from_static(b"c")));
    }

    #[test]
    fn test_view_aliases_backing_store() {
        let mut headers = HeaderStore::new();

        let mut view = headers.single_value_view();
        view.set("test", "lemur");
        assert!(view.contains_key("test"));
        drop(view);

        assert!(headers.has_header("test"));

        headers.remove_header("test");
        assert!(!headers.single_value_view().contains_key("test"));
    }
}
