//! Overflow chunking of party lists.

use std::num::NonZeroUsize;

/// Number of parties per role covered by one document.
pub const PARTIES_PER_DOCUMENT: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(n) => n,
    None => unreachable!(),
};

/// Split `items` into consecutive chunks of `size` and drop the first one.
///
/// The first chunk is already covered by the primary documents, so only the
/// remaining groups need a declaration of their own. Sequences of at most
/// `size` items yield no chunks.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use dealdocs_core::chunking::overflow_chunks;
///
/// let size = NonZeroUsize::new(2).unwrap();
/// assert!(overflow_chunks(&[1, 2], size).is_empty());
/// assert_eq!(overflow_chunks(&[1, 2, 3, 4, 5], size), vec![&[3, 4][..], &[5][..]]);
/// ```
#[must_use]
pub fn overflow_chunks<T>(items: &[T], size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(size.get()).skip(1).collect()
}
