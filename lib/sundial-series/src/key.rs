//! Series key encoding, decoding, and ordering.
//!
//! A series key flattens one series identity -- measurement name plus ordered tag set -- into a
//! single byte string that can be stored, looked up, and compared without being decoded. All
//! length fields are big-endian `u16`:
//!
//! ```text
//! offset 0              u16    offsets section size (2 + 4 per tag)
//! offset 2              u16    measurement name length
//! offset 4              u16×2  per tag, in order: key length, value length
//! offset 2 + offsets    u16    payload size
//! offset 4 + offsets    bytes  payload: name, then each tag's key and value, no delimiters
//! ```
//!
//! The fixed-width length table up front means decoding is pure slicing: every field of the
//! payload can be located without scanning for delimiters, and the decoded views alias the
//! encoded buffer. It also gives the comparator a shortcut -- the payload is the name and tags
//! concatenated in comparison order, so two keys are ordered by comparing their raw payload
//! byte ranges.

use crate::tags::TagSet;

mod compare;
mod decode;
mod encode;

pub use self::compare::compare;
pub use self::decode::{parse, parse_with, tag_count, DecodeError};
pub use self::encode::{encode, encode_append, encode_many, EncodeError};

/// Maximum length, in bytes, of a measurement name, tag key, or tag value.
///
/// Field lengths are stored as `u16`, so longer fields cannot be represented and are rejected
/// by the encoder.
pub const MAX_FIELD_LEN: usize = u16::MAX as usize;

/// Maximum number of tags a single series key can carry.
///
/// Bounded by the offsets section size fitting its own `u16` header.
pub const MAX_TAG_COUNT: usize = (u16::MAX as usize - 2) / 4;

/// Returns the size, in bytes, of the offsets section for a key with `tag_count` tags.
pub fn offsets_size(tag_count: usize) -> usize {
    // Name length, plus a key/value length pair per tag, all u16.
    2 + 4 * tag_count
}

/// Returns the size, in bytes, of the payload section for the given name and tags.
pub fn payload_size(name: &[u8], tags: &TagSet<'_>) -> usize {
    name.len() + tags.iter().map(|tag| tag.encoded_len()).sum::<usize>()
}

/// Returns the total encoded size, in bytes, of a series key for the given name and tags.
pub fn size(name: &[u8], tags: &TagSet<'_>) -> usize {
    // + 4 covers the offsets section size and payload size headers.
    offsets_size(tags.len()) + payload_size(name, tags) + 4
}

/// Returns the number of bytes required to encode every name/tag-set pair in the given
/// parallel lists.
///
/// The lists are walked pairwise; keeping them the same length is the caller's contract, and is
/// enforced with an error only by [`encode_many`].
pub fn total_size(names: &[&[u8]], tag_sets: &[TagSet<'_>]) -> usize {
    names
        .iter()
        .zip(tag_sets)
        .map(|(name, tags)| size(name, tags))
        .sum()
}
