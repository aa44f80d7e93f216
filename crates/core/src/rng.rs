use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform index source used by pack sampling. Tests substitute scripted
/// sequences through this trait.
pub trait RandomSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for RngState {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RngState::from_seed(7);
        let mut b = RngState::from_seed(7);
        let left: Vec<usize> = (0..32).map(|_| a.pick_index(100)).collect();
        let right: Vec<usize> = (0..32).map(|_| b.pick_index(100)).collect();
        assert_eq!(left, right);
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn picks_stay_in_range() {
        let mut rng = RngState::from_seed(99);
        for len in 1..20 {
            assert!(rng.pick_index(len) < len);
        }
    }
}
