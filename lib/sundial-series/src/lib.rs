//! Series identity and the series key codec.
//!
//! A series is one logical time series: a measurement name qualified by an ordered set of tags.
//! This crate defines how that identity is flattened into a single compact, comparable byte
//! string -- the series key -- and provides zero-copy decoding of that string back into its
//! components, along with the raw-byte comparator used whenever keys are sorted or merged.
//!
//! The codec sits on the ingest and compaction hot paths, so it avoids copying wherever
//! possible: decoded names and tags are views into the encoded buffer, and bulk generation
//! packs every key into one shared allocation.

pub mod key;
pub mod tags;

pub use self::tags::{Tag, TagSet};
