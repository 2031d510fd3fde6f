//! Series tags.

use std::fmt;

/// A single series tag.
///
/// A tag is a key/value pair of byte strings qualifying a series, such as `region=us-west`.
/// Both halves are borrowed, which lets decoded tags alias the encoded key they came from
/// without copying.
///
/// Tags order by key and then by value, so a caller that wants a canonical tag set can simply
/// sort it. The codec itself never reorders tags.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag<'a> {
    key: &'a [u8],
    value: &'a [u8],
}

impl<'a> Tag<'a> {
    /// Creates a new `Tag` from the given key and value.
    pub const fn new(key: &'a [u8], value: &'a [u8]) -> Self {
        Self { key, value }
    }

    /// Returns the tag key.
    pub const fn key(&self) -> &'a [u8] {
        self.key
    }

    /// Returns the tag value.
    pub const fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Returns the number of payload bytes the tag occupies in an encoded key.
    pub(crate) fn encoded_len(&self) -> usize {
        self.key.len() + self.value.len()
    }
}

impl<'a> From<(&'a [u8], &'a [u8])> for Tag<'a> {
    fn from((key, value): (&'a [u8], &'a [u8])) -> Self {
        Self::new(key, value)
    }
}

impl<'a> From<(&'a str, &'a str)> for Tag<'a> {
    fn from((key, value): (&'a str, &'a str)) -> Self {
        Self::new(key.as_bytes(), value.as_bytes())
    }
}

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}",
            String::from_utf8_lossy(self.key),
            String::from_utf8_lossy(self.value)
        )
    }
}

/// An ordered set of tags.
///
/// The set preserves exactly the order tags were added in, and does not deduplicate: callers
/// that need sorted or duplicate-free tags handle that before encoding. Decoding a series key
/// yields the tags in their encoded order.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct TagSet<'a>(Vec<Tag<'a>>);

impl<'a> TagSet<'a> {
    /// Creates a new, empty tag set.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a new, empty tag set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Returns `true` if the tag set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of tags in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Appends a tag to the set.
    pub fn push<T>(&mut self, tag: T)
    where
        T: Into<Tag<'a>>,
    {
        self.0.push(tag.into());
    }

    /// Returns the tag at the given position, if any.
    pub fn get(&self, idx: usize) -> Option<&Tag<'a>> {
        self.0.get(idx)
    }

    /// Returns the tags as a slice.
    pub fn as_slice(&self) -> &[Tag<'a>] {
        &self.0
    }

    /// Returns an iterator over the tags in the set.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag<'a>> {
        self.0.iter()
    }

    /// Removes all tags from the set, keeping the allocation.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.0.reserve(additional);
    }

    /// Clears the set and releases its borrow, keeping the allocation for reuse.
    ///
    /// This is the hot-loop companion to [`key::parse_with`][crate::key::parse_with]: decode a
    /// key, consume the tags, then recycle the set and feed it into the next decode so the
    /// backing storage is allocated once rather than per key.
    pub fn recycle<'b>(self) -> TagSet<'b> {
        let mut tags = self.0;
        tags.clear();
        // Nothing is mapped (the vec was just cleared); collecting rebuilds the vec in place
        // under the new lifetime.
        TagSet(tags.into_iter().map(|_| -> Tag<'b> { unreachable!() }).collect())
    }
}

impl<'a> IntoIterator for TagSet<'a> {
    type Item = Tag<'a>;
    type IntoIter = std::vec::IntoIter<Tag<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, 'b> IntoIterator for &'b TagSet<'a> {
    type Item = &'b Tag<'a>;
    type IntoIter = std::slice::Iter<'b, Tag<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a, T> FromIterator<T> for TagSet<'a>
where
    T: Into<Tag<'a>>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a, T> Extend<T> for TagSet<'a>
where
    T: Into<Tag<'a>>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> From<Tag<'a>> for TagSet<'a> {
    fn from(tag: Tag<'a>) -> Self {
        Self(vec![tag])
    }
}

impl fmt::Display for TagSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }

            write!(f, "{}", tag)?;
        }

        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_order_and_duplicates() {
        let mut tags = TagSet::new();
        tags.push(("zzz", "1"));
        tags.push(("aaa", "2"));
        tags.push(("zzz", "1"));

        assert_eq!(tags.len(), 3);
        assert_eq!(tags.get(0), Some(&Tag::from(("zzz", "1"))));
        assert_eq!(tags.get(1), Some(&Tag::from(("aaa", "2"))));
        assert_eq!(tags.get(2), Some(&Tag::from(("zzz", "1"))));
    }

    #[test]
    fn tag_ordering_is_key_then_value() {
        let mut tags = vec![
            Tag::from(("region", "us-west")),
            Tag::from(("host", "host2")),
            Tag::from(("host", "host1")),
        ];
        tags.sort_unstable();

        assert_eq!(
            tags,
            vec![
                Tag::from(("host", "host1")),
                Tag::from(("host", "host2")),
                Tag::from(("region", "us-west")),
            ]
        );
    }

    #[test]
    fn recycle_keeps_capacity() {
        let mut tags = TagSet::with_capacity(8);
        let key = b"host".to_vec();
        let value = b"host1".to_vec();
        tags.push((&key[..], &value[..]));

        let recycled: TagSet<'static> = tags.recycle();
        assert!(recycled.is_empty());
        assert!(recycled.0.capacity() >= 8);
    }

    #[test]
    fn display_formats_pairs() {
        let tags: TagSet<'_> = [("host", "host1"), ("region", "us-west")]
            .into_iter()
            .collect();
        assert_eq!(tags.to_string(), "[host=host1,region=us-west]");
    }
}
