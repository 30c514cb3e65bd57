use rand::Rng;
use rand::seq::SliceRandom;

/// Draws a uniformly random ordering of `pool`, truncated to `count` items.
///
/// Never repeats an item: when `count` exceeds the pool, the whole pool is
/// returned in shuffled order. The caller supplies the RNG, so a seeded
/// generator makes the draw reproducible.
pub fn draw<T: Clone, R: Rng + ?Sized>(pool: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut drawn = pool.to_vec();
    drawn.shuffle(rng);
    drawn.truncate(count);
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn caps_at_pool_size_without_repeats() {
        let pool: Vec<u32> = (0..7).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = draw(&pool, 20, &mut rng);

        assert_eq!(drawn.len(), 7);
        let unique: HashSet<_> = drawn.iter().collect();
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn same_seed_same_draw() {
        let pool: Vec<u32> = (0..50).collect();
        let a = draw(&pool, 10, &mut StdRng::seed_from_u64(42));
        let b = draw(&pool, 10, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_reorder() {
        let pool: Vec<u32> = (0..50).collect();
        let a = draw(&pool, 50, &mut StdRng::seed_from_u64(1));
        let b = draw(&pool, 50, &mut StdRng::seed_from_u64(2));
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
        assert_ne!(a, pool);
    }

    #[test]
    fn empty_pool_draws_nothing() {
        let pool: Vec<u32> = Vec::new();
        assert!(draw(&pool, 5, &mut StdRng::seed_from_u64(0)).is_empty());
    }
}
