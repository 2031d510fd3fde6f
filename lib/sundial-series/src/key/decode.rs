use snafu::{ensure, Snafu};

use crate::tags::{Tag, TagSet};

/// Errors produced while decoding a series key.
///
/// The encoder never emits a key that fails to decode; these cover buffers damaged in storage
/// or handed over from somewhere that never held a valid key. Decoding checks every read
/// against the buffer bounds, so a malformed key fails with one of these instead of reading
/// out of range.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum DecodeError {
    /// The buffer ended before the bytes its own headers call for.
    #[snafu(display("series key truncated (needed {} bytes, have {})", needed, len))]
    Truncated {
        /// Bytes the headers call for.
        needed: usize,

        /// Bytes actually present.
        len: usize,
    },

    /// The offsets section size was not of the form `2 + 4 * tag_count`.
    #[snafu(display("malformed offsets section ({} bytes)", size))]
    MalformedOffsets {
        /// Declared offsets section size, in bytes.
        size: usize,
    },

    /// A field's declared length ran past the end of the payload.
    #[snafu(display("field ends at payload byte {} but payload is {} bytes", end, payload_len))]
    FieldOutOfBounds {
        /// Byte offset the field would end at.
        end: usize,

        /// Actual payload length, in bytes.
        payload_len: usize,
    },
}

/// Decodes the measurement name and tags from an encoded series key.
///
/// The returned name and every tag key/value are views into `data`; nothing in the payload is
/// copied, so the decoded values live only as long as the buffer they were sliced from.
pub fn parse(data: &[u8]) -> Result<(&[u8], TagSet<'_>), DecodeError> {
    parse_with(data, TagSet::new())
}

/// Decodes the measurement name and tags from an encoded series key, reusing `tags` as the
/// output container.
///
/// Hot loops that decode many keys pass the previous result's set back in via
/// [`TagSet::recycle`], so tag storage is allocated once and grown only when a key carries
/// more tags than any before it. Any prior contents of `tags` are discarded.
pub fn parse_with<'a>(data: &'a [u8], mut tags: TagSet<'a>) -> Result<(&'a [u8], TagSet<'a>), DecodeError> {
    let offsets_len = read_u16(data, 0)?;
    ensure!(
        offsets_len >= 2 && (offsets_len - 2) % 4 == 0,
        MalformedOffsets { size: offsets_len }
    );

    let payload_len = read_u16(data, offsets_len + 2)?;
    let payload_start = offsets_len + 4;
    let payload = match data.get(payload_start..payload_start + payload_len) {
        Some(payload) => payload,
        None => {
            return Truncated {
                needed: payload_start + payload_len,
                len: data.len(),
            }
            .fail()
        }
    };

    let name_len = read_u16(data, 2)?;
    let mut bpos = 0;
    let name = take(payload, &mut bpos, name_len)?;

    let tag_n = (offsets_len - 2) / 4;
    tags.clear();
    tags.reserve(tag_n);

    let mut opos = 4;
    for _ in 0..tag_n {
        let key_len = read_u16(data, opos)?;
        let value_len = read_u16(data, opos + 2)?;
        opos += 4;

        let key = take(payload, &mut bpos, key_len)?;
        let value = take(payload, &mut bpos, value_len)?;
        tags.push(Tag::new(key, value));
    }

    Ok((name, tags))
}

/// Returns the number of tags in an encoded series key, without decoding the payload.
pub fn tag_count(data: &[u8]) -> Result<usize, DecodeError> {
    let offsets_len = read_u16(data, 0)?;
    ensure!(
        offsets_len >= 2 && (offsets_len - 2) % 4 == 0,
        MalformedOffsets { size: offsets_len }
    );

    Ok((offsets_len - 2) / 4)
}

fn read_u16(data: &[u8], pos: usize) -> Result<usize, DecodeError> {
    match data.get(pos..pos + 2) {
        Some(raw) => Ok(u16::from_be_bytes([raw[0], raw[1]]) as usize),
        None => Truncated {
            needed: pos + 2,
            len: data.len(),
        }
        .fail(),
    }
}

fn take<'a>(payload: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8], DecodeError> {
    match payload.get(*pos..*pos + len) {
        Some(field) => {
            *pos += len;
            Ok(field)
        }
        None => FieldOutOfBounds {
            end: *pos + len,
            payload_len: payload.len(),
        }
        .fail(),
    }
}
