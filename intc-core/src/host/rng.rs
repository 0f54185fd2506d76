/// Largest value `rand()` can return.
pub const RAND_MAX: i32 = 32767;

pub const DEFAULT_SEED: u32 = 1;

/// The linear congruential generator given as the portable `rand`
/// example in ANSI C:
///
/// ```text
/// state = state * 1103515245 + 12345   (mod 2^32)
/// rand  = (state / 65536) % 32768
/// ```
///
/// Without a call to `srand` the sequence starts from seed 1, so the first
/// value is always 16838. `srand(1234)` followed by `rand()` yields 3558.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rng {
    state: u32,
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn seed(&mut self, seed: u32) {
        self.state = seed;
    }

    pub fn rand(&mut self) -> i32 {
        self.state = self.state
            .wrapping_mul(1103515245)
            .wrapping_add(12345);

        ((self.state / 65536) % 32768) as i32
    }
}
