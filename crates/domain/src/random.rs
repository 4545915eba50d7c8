//! Injectable randomness for cell placement.
//!
//! The domain never touches a global generator. Callers hand a `RandomSource`
//! to every operation that repositions a cell; production code adapts its
//! random port, tests script the draws with a closure.

/// A source of uniformly distributed integers.
pub trait RandomSource {
    /// Draw a value in `min..=max`.
    fn gen_range(&mut self, min: u32, max: u32) -> u32;
}

impl<F> RandomSource for F
where
    F: FnMut(u32, u32) -> u32,
{
    fn gen_range(&mut self, min: u32, max: u32) -> u32 {
        self(min, max)
    }
}

/// Draw a cell in `0..size` that differs from `previous`.
///
/// Draws equal to `previous` or outside the board are discarded. With
/// `size > 1` a distinct in-range value always exists, so a uniform source
/// terminates after `size / (size - 1)` draws on average.
pub(crate) fn next_cell_position(
    previous: Option<u32>,
    size: u32,
    rng: &mut dyn RandomSource,
) -> u32 {
    debug_assert!(size > 1);
    loop {
        let candidate = rng.gen_range(0, size - 1);
        if candidate < size && Some(candidate) != previous {
            return candidate;
        }
    }
}
