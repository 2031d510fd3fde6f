use std::cmp::Ordering;

/// Compares two encoded series keys.
///
/// Keys order by their raw payload bytes: the name, tag keys, and tag values as one
/// concatenated byte string, compared lexicographically with shorter-is-less on a common
/// prefix. That is the order persisted storage is sorted in, so it is authoritative --
/// callers must not re-derive an ordering from the decoded fields, which can disagree with
/// the payload bytes when one field is a strict prefix of its counterpart.
///
/// An empty buffer is the nil key: it sorts before every non-empty key, and two nil keys are
/// equal. The result is a total order -- reflexive, antisymmetric, transitive, and identical
/// across repeated calls -- which sort and merge paths rely on.
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => payload(a).cmp(payload(b)),
    }
}

// Locates the payload from the key's own headers without decoding any field. Reads are
// clamped to the buffer, so a malformed key lands at an arbitrary but stable position
// instead of panicking; well-formed keys get exactly their payload range.
fn payload(data: &[u8]) -> &[u8] {
    let Some(offsets_len) = read_u16(data, 0) else {
        return data;
    };
    let Some(payload_len) = read_u16(data, offsets_len + 2) else {
        return &[];
    };

    let start = offsets_len + 4;
    match data.get(start..start + payload_len) {
        Some(payload) => payload,
        None => &data[start.min(data.len())..],
    }
}

fn read_u16(data: &[u8], pos: usize) -> Option<usize> {
    data.get(pos..pos + 2)
        .map(|raw| u16::from_be_bytes([raw[0], raw[1]]) as usize)
}
