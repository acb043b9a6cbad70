/// Decode a linear value-array index into one coordinate per dimension.
///
/// Mixed-radix decoding with the last dimension varying fastest, which is
/// the JSON-stat row-major layout. `index` must be below the product of
/// `sizes`.
pub fn decode_index(index: usize, sizes: &[usize]) -> Vec<usize> {
    let mut coords = vec![0; sizes.len()];
    let mut remaining = index;
    for d in (0..sizes.len()).rev() {
        coords[d] = remaining % sizes[d];
        remaining /= sizes[d];
    }
    coords
}

/// Inverse of [`decode_index`].
pub fn encode_coords(coords: &[usize], sizes: &[usize]) -> usize {
    coords
        .iter()
        .zip(sizes)
        .fold(0, |acc, (&c, &size)| acc * size + c)
}
