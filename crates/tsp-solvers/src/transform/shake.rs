use rand::Rng;

/// Deterministic, reinitialisable additive perturbation table indexed by a [crate::cost::ProblemInfo]
/// position.
///
/// Filled on each [reseed](RandomOffsetTable::reseed) by drawing random integers in a configured
/// range and sorting them, so `get(pos)` is non-decreasing in `pos` — this keeps the perturbation
/// order-preserving across the shake transforms while still breaking ties between edges of equal
/// base cost.
#[derive(Debug, Clone)]
pub struct RandomOffsetTable {
    offsets: Vec<i32>,
    min: i32,
    max: i32,
}

impl RandomOffsetTable {
    pub fn new(len: usize, min: i32, max: i32) -> Self {
        Self {
            offsets: vec![0; len],
            min,
            max,
        }
    }

    pub fn reseed(&mut self, rng: &mut impl Rng) {
        for slot in self.offsets.iter_mut() {
            *slot = rng.random_range(self.min..=self.max);
        }
        self.offsets.sort_unstable();
    }

    pub fn get(&self, pos: usize) -> i32 {
        self.offsets[pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn reseeded_offsets_are_sorted() {
        let mut table = RandomOffsetTable::new(16, 0, 1000);
        let mut rng = StdRng::seed_from_u64(7);
        table.reseed(&mut rng);

        for pos in 1..16 {
            assert!(table.get(pos - 1) <= table.get(pos));
        }
    }
}
