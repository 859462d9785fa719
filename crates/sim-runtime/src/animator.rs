//! Cash particle animation. Cosmetic only; never touches the ledger.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sim_core::{Ledger, Particle, PARTICLE_POOL};

/// Side length of the square the particles wander in.
pub const FIELD: i32 = 20;

/// Fixed pool of particles plus the RNG that drives them.
#[derive(Clone, Debug, PartialEq)]
pub struct Animator {
    particles: [Particle; PARTICLE_POOL],
    rng: ChaCha8Rng,
}

impl Animator {
    /// All particles start at the origin.
    pub fn new(seed: u64) -> Self {
        Self {
            particles: [Particle::default(); PARTICLE_POOL],
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Next frame of the walk.
    pub fn step(&self) -> Self {
        let mut next = self.clone();
        walk(&mut next.particles, &mut next.rng);
        next
    }

    /// The prefix of the pool eligible for display at the ledger's cash rate.
    pub fn visible(&self, ledger: &Ledger) -> &[Particle] {
        let n = sim_econ::visible_particles(ledger.rates.cash_per_second, PARTICLE_POOL);
        &self.particles[..n]
    }
}

/// One random-walk step per particle.
///
/// `x` drifts toward a fresh uniform draw in `[0, FIELD)` and does not move
/// when the draw lands within one column of it. `y` falls by zero or one row
/// and wraps at `FIELD`.
pub fn walk<R: Rng>(particles: &mut [Particle], rng: &mut R) {
    for p in particles.iter_mut() {
        let d20: i32 = rng.gen_range(0..FIELD);
        if d20 < p.x - 1 {
            p.x -= 1;
        }
        if d20 > p.x + 1 {
            p.x += 1;
        }
        p.y = (p.y + rng.gen_range(0..2)) % FIELD;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_seed_same_path() {
        let a = (0..50).fold(Animator::new(7), |a, _| a.step());
        let b = (0..50).fold(Animator::new(7), |a, _| a.step());
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn particles_stay_in_field() {
        let a = (0..500).fold(Animator::new(1), |a, _| a.step());
        for p in a.particles() {
            assert!((0..FIELD).contains(&p.x), "x out of field: {p:?}");
            assert!((0..FIELD).contains(&p.y), "y out of field: {p:?}");
        }
    }

    #[test]
    fn walk_moves_at_most_one_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ps = [Particle { x: 10, y: 19 }; 8];
        let before = ps;
        walk(&mut ps, &mut rng);
        for (b, a) in before.iter().zip(ps.iter()) {
            assert!((a.x - b.x).abs() <= 1);
            assert!(a.y == 19 || a.y == 0);
        }
    }

    #[test]
    fn visible_prefix_tracks_cash_rate() {
        let a = Animator::new(0);
        let mut ledger = Ledger::new();
        assert!(a.visible(&ledger).is_empty());

        ledger.rates.cash_per_second = 16;
        assert_eq!(a.visible(&ledger).len(), 4);

        ledger.rates.cash_per_second = i64::MAX;
        assert_eq!(a.visible(&ledger).len(), PARTICLE_POOL);
        assert_eq!(a.particles().len(), PARTICLE_POOL);
    }

    proptest! {
        #[test]
        fn any_seed_keeps_particles_in_field(seed in any::<u64>(), steps in 0usize..400) {
            let a = (0..steps).fold(Animator::new(seed), |a, _| a.step());
            for p in a.particles() {
                prop_assert!((0..FIELD).contains(&p.x));
                prop_assert!((0..FIELD).contains(&p.y));
            }
        }
    }
}
