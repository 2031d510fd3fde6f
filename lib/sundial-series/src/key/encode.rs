use bytes::Bytes;
use snafu::{ensure, Snafu};
use tracing::trace;

use super::{offsets_size, payload_size, size, total_size, MAX_FIELD_LEN, MAX_TAG_COUNT};
use crate::tags::TagSet;

/// Errors produced while encoding a series key.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum EncodeError {
    /// A measurement name, tag key, or tag value was too long for its 16-bit length field.
    #[snafu(display("{} is {} bytes, over the {}-byte field limit", field, len, MAX_FIELD_LEN))]
    FieldTooLong {
        /// Which field was over the limit.
        field: &'static str,

        /// Length of the offending field, in bytes.
        len: usize,
    },

    /// The tag set was too large for the offsets section's 16-bit size header.
    #[snafu(display("{} tags exceed the per-key maximum of {}", count, MAX_TAG_COUNT))]
    TooManyTags {
        /// Number of tags supplied.
        count: usize,
    },

    /// The combined name and tag bytes were too large for the payload's 16-bit size header.
    #[snafu(display("payload is {} bytes, over the {}-byte limit", len, MAX_FIELD_LEN))]
    PayloadTooLarge {
        /// Total payload length, in bytes.
        len: usize,
    },

    /// The bulk name and tag-set lists had different lengths.
    #[snafu(display("got {} names but {} tag sets", names, tag_sets))]
    MismatchedLengths {
        /// Number of names supplied.
        names: usize,

        /// Number of tag sets supplied.
        tag_sets: usize,
    },
}

/// Encodes a measurement name and tag set into a freshly allocated series key.
///
/// Tags are written in exactly the order they appear in `tags`; callers wanting a canonical key
/// sort the set first. Fails with a size-limit error if any field, the tag count, or the total
/// payload overflows its 16-bit header.
pub fn encode(name: &[u8], tags: &TagSet<'_>) -> Result<Vec<u8>, EncodeError> {
    let mut key = Vec::with_capacity(size(name, tags));
    encode_append(&mut key, name, tags)?;
    Ok(key)
}

/// Encodes a measurement name and tag set, appending the key to `dst`.
///
/// Exactly one key is appended per call, so back-to-back calls pack multiple keys into one
/// buffer. Capacity is reserved up front; as with any `Vec` growth, a reallocation moves the
/// bytes, so offsets the caller recorded into `dst` stay valid while raw pointers do not. On
/// error, `dst` is untouched: all validation happens before the first write.
pub fn encode_append(dst: &mut Vec<u8>, name: &[u8], tags: &TagSet<'_>) -> Result<(), EncodeError> {
    check_limits(name, tags)?;

    let offsets_len = offsets_size(tags.len());
    let payload_len = payload_size(name, tags);
    dst.reserve(offsets_len + payload_len + 4);

    // Length table: offsets section size, name length, then a key/value length pair per tag.
    dst.extend_from_slice(&(offsets_len as u16).to_be_bytes());
    dst.extend_from_slice(&(name.len() as u16).to_be_bytes());
    for tag in tags {
        dst.extend_from_slice(&(tag.key().len() as u16).to_be_bytes());
        dst.extend_from_slice(&(tag.value().len() as u16).to_be_bytes());
    }

    // Payload: name, then each tag's key and value, undelimited.
    dst.extend_from_slice(&(payload_len as u16).to_be_bytes());
    dst.extend_from_slice(name);
    for tag in tags {
        dst.extend_from_slice(tag.key());
        dst.extend_from_slice(tag.value());
    }

    Ok(())
}

/// Encodes every name/tag-set pair into series keys backed by a single shared buffer.
///
/// The total size is computed up front and every key is encoded back-to-back into one
/// allocation, so the cost of bulk ingest or an index rebuild is one buffer regardless of key
/// count. The returned keys are cheap slices of that buffer, in input order, and
/// `encode_many(names, tag_sets)?[i]` is byte-identical to `encode(names[i], &tag_sets[i])?`.
pub fn encode_many(names: &[&[u8]], tag_sets: &[TagSet<'_>]) -> Result<Vec<Bytes>, EncodeError> {
    ensure!(
        names.len() == tag_sets.len(),
        MismatchedLengths {
            names: names.len(),
            tag_sets: tag_sets.len(),
        }
    );

    let mut buf = Vec::with_capacity(total_size(names, tag_sets));
    let mut bounds = Vec::with_capacity(names.len());
    for (name, tags) in names.iter().zip(tag_sets) {
        let start = buf.len();
        encode_append(&mut buf, name, tags)?;
        bounds.push(start..buf.len());
    }

    let shared = Bytes::from(buf);
    trace!(keys = names.len(), total_bytes = shared.len(), "bulk-encoded series keys");

    Ok(bounds.into_iter().map(|span| shared.slice(span)).collect())
}

fn check_limits(name: &[u8], tags: &TagSet<'_>) -> Result<(), EncodeError> {
    ensure!(
        name.len() <= MAX_FIELD_LEN,
        FieldTooLong {
            field: "measurement name",
            len: name.len(),
        }
    );
    ensure!(tags.len() <= MAX_TAG_COUNT, TooManyTags { count: tags.len() });

    for tag in tags {
        ensure!(
            tag.key().len() <= MAX_FIELD_LEN,
            FieldTooLong {
                field: "tag key",
                len: tag.key().len(),
            }
        );
        ensure!(
            tag.value().len() <= MAX_FIELD_LEN,
            FieldTooLong {
                field: "tag value",
                len: tag.value().len(),
            }
        );
    }

    let payload_len = payload_size(name, tags);
    ensure!(payload_len <= MAX_FIELD_LEN, PayloadTooLarge { len: payload_len });

    Ok(())
}
