//! In-memory storage of protocol headers in a key and multiple value format.
//!
//! See the [`header`] module for the full contract.

pub mod header;

pub use crate::header::{
    CanonicalName, HeaderName, HeaderStore, HeaderValue, MissingHeaderError, NormalizedName,
    RawValue, RawValues, SingleValueView, TypeMismatchError, ValueList,
};
