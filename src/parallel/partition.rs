//! Splitting a batch into contiguous chunks, one per worker process.

/// Chunk size when spreading `len` items over `parts` workers (ceiling division).
///
/// A `parts` of zero is treated as one.
pub fn chunk_size(len: usize, parts: usize) -> usize {
    len.div_ceil(parts.max(1)).max(1)
}

/// Partition `items` into at most `parts` contiguous, disjoint chunks.
///
/// Every chunk except possibly the last has [`chunk_size`] items, so fewer than
/// `parts` chunks come back when the items do not stretch that far
/// (4 items over 3 parts gives sizes 2 and 2).
pub fn partition<T: Clone>(items: &[T], parts: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return Vec::new();
    }

    items
        .chunks(chunk_size(items.len(), parts))
        .map(<[T]>::to_vec)
        .collect()
}
