//! Fallback prompt selection.

use rand::Rng;

/// Picks which of `len` fallback prompts to use.
///
/// Implemented for plain closures so tests can pin the choice.
pub trait FallbackChooser: Send + Sync {
    fn choose(&self, len: usize) -> usize;
}

/// Uniform choice from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomChooser;

impl FallbackChooser for RandomChooser {
    fn choose(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

impl<F> FallbackChooser for F
where
    F: Fn(usize) -> usize + Send + Sync,
{
    fn choose(&self, len: usize) -> usize {
        self(len)
    }
}
