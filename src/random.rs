use rand::Rng;

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
const DEFAULT_SEED: i64 = 3819201;

/// Source of randomness for tie-breaks and move sampling.
///
/// Passed explicitly into every search so a seeded generator reproduces a run exactly.
pub trait RandomGenerator {
    fn next(&mut self) -> i32;
    fn next_range(&mut self, from: i32, to: i32) -> i32;

    /// A uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    fn choose<'a, K>(&mut self, items: &'a [K]) -> Option<&'a K> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_range(0, items.len() as i32) as usize)
    }
}

impl<K: RandomGenerator + ?Sized> RandomGenerator for &mut K {
    fn next(&mut self) -> i32 {
        (**self).next()
    }

    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        (**self).next_range(from, to)
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Thread-local `rand` generator. Not reproducible.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next(&mut self) -> i32 {
        rand::random()
    }

    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        rand::rng().random_range(from..to)
    }

    fn next_unit(&mut self) -> f64 {
        rand::rng().random()
    }
}

/// A seedable linear congruential generator, identical on every platform.
#[derive(Debug, Clone)]
pub struct CustomNumberGenerator {
    seed: i64,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn next(&mut self) -> i32 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C) % (i32::MAX as i64);
        self.seed as i32
    }

    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        (self.next() % (to - from)).abs() + from
    }

    fn next_unit(&mut self) -> f64 {
        (self.next() as f64 / i32::MAX as f64).abs()
    }
}

impl CustomNumberGenerator {
    pub const fn new(seed: i64) -> Self {
        Self { seed }
    }
}

#[cfg(test)]
mod tests {
    use crate::random::{CustomNumberGenerator, RandomGenerator};

    #[test]
    fn outputs_same_numbers() {
        let mut crg = CustomNumberGenerator::new(42);
        assert_eq!(crg.next_range(0, 10), 8);
        assert_eq!(crg.next_range(0, 10), 4);
        assert_eq!(crg.next_range(0, 10), 1);
        assert_eq!(crg.next_range(0, 10), 2);
        assert_eq!(crg.next_range(0, 10), 4);
    }

    #[test]
    fn choose_is_reproducible() {
        let items = [432, 6542, 534, 6, 13, 645, 88, 2352, 345, 2667, 8287];
        let mut first = CustomNumberGenerator::new(7);
        let mut second = CustomNumberGenerator::new(7);
        for _ in 0..20 {
            assert_eq!(first.choose(&items), second.choose(&items));
        }
        assert_eq!(first.choose::<i32>(&[]), None);
    }

    #[test]
    fn unit_values_stay_in_range() {
        let mut crg = CustomNumberGenerator::default();
        for _ in 0..1000 {
            let x = crg.next_unit();
            assert!((0.0..1.0).contains(&x), "{x}");
        }
    }

    #[test]
    fn borrowed_generator_advances_the_original() {
        fn advance<R: RandomGenerator>(mut random: R) {
            random.next();
        }

        let mut owned = CustomNumberGenerator::new(42);
        advance(&mut owned);
        let mut fresh = CustomNumberGenerator::new(42);
        fresh.next();
        assert_eq!(owned.next(), fresh.next());
    }
}
