//! Protocol header storage
//!
//! The module provides [`HeaderStore`], an ordered-by-insertion, case-insensitive, multi-valued
//! mapping from header names to header values, and [`SingleValueView`], a backward-compatible
//! single-valued lens over the same storage.
//!
//! # `HeaderStore`
//!
//! The store is a multimap: each header name may hold several values, accumulated in call order
//! the way repeated headers appear on the wire. Names are case insensitive and normalized to
//! lowercase before storage; a canonical display capitalization (`content-type` becomes
//! `Content-Type`, `dnt` becomes `DNT`) is re-derived only when iterating all headers for output.
//!
//! Every operation accepts names and values either as raw bytes or as text, per call. The
//! internal representation is always bytes: text names are encoded using ISO-8859-1 and text
//! values using UTF-8. Read operations mirror the type of the name they were given, so byte-mode
//! callers never pay encode/decode cost or incur charset failures from unrelated code paths,
//! while text-mode callers get ordinary text back.
//!
//! The store itself performs no parsing, wire serialization, or grammar validation; it is a pure
//! in-memory value object populated by a parser and drained by a serializer.
//!
//! # `SingleValueView`
//!
//! The view adapts a store to the conventional get/set/delete/iterate/count mapping contract for
//! consumers that do not need multi-value awareness. Reads expose the last value of a header
//! (last-wins), writes collapse a header down to a single value, and absent keys are reported as
//! [`MissingHeaderError`] rather than tolerated. The view borrows its store mutably and is a
//! transparent lens, not a snapshot.

pub mod name;
pub mod store;
pub mod value;
pub mod view;

pub use self::name::{CanonicalName, HeaderName, NormalizedName};
pub use self::store::{HeaderStore, TypeMismatchError};
pub use self::value::{HeaderValue, RawValue, RawValues, ValueList};
pub use self::view::{MissingHeaderError, SingleValueView};
