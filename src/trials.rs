use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    ActFn, InitStrategy, Result, SimErr, TrialSummary, simulation::propagate, stats::Moments,
};

/// A repeatable experiment whose independent runs can be replayed and averaged.
///
/// Trial `i` always uses a `StdRng` seeded from `seed + i`, so iterating twice yields the
/// same outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trials {
    input_dim: usize,
    num_layers: usize,
    init: InitStrategy,
    act_fn: ActFn,
    seed: u64,
}

impl Trials {
    /// Creates a new `Trials`.
    ///
    /// # Arguments
    /// * `input_dim` - The width of every layer.
    /// * `num_layers` - The depth of each simulated network.
    /// * `init` - How each layer's weights are sampled.
    /// * `act_fn` - The activation applied after each product.
    /// * `seed` - The seed of the first trial.
    pub fn new(
        input_dim: usize,
        num_layers: usize,
        init: InitStrategy,
        act_fn: ActFn,
        seed: u64,
    ) -> Self {
        Self {
            input_dim,
            num_layers,
            init,
            act_fn,
            seed,
        }
    }

    /// Runs the `i`-th trial.
    pub fn run(&self, i: u64) -> Result<Moments> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(i));
        let x = propagate(
            &mut rng,
            self.input_dim,
            self.num_layers,
            self.init,
            self.act_fn,
            |_| {},
        )?;

        Ok(Moments::of(x.view()))
    }

    /// Lazily runs the first `n` trials.
    pub fn iter(&self, n: usize) -> impl Iterator<Item = Result<Moments>> + '_ {
        (0..n as u64).map(move |i| self.run(i))
    }

    /// Runs the first `n` trials and averages their outcomes.
    ///
    /// # Errors
    /// `SimErr::InvalidTrialCount` if `n` is 0, or the first error any trial produced.
    pub fn summarize(&self, n: usize) -> Result<TrialSummary> {
        if n == 0 {
            return Err(SimErr::InvalidTrialCount);
        }

        let outcomes = self.iter(n).collect::<Result<Vec<_>>>()?;
        let summary = TrialSummary::from_moments(outcomes).ok_or(SimErr::InvalidTrialCount)?;
        debug!(
            "{} + {} over {n} trial(s): mean={} rms={}",
            self.init,
            self.act_fn,
            summary.mean(),
            summary.rms()
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_trials() {
        let trials = Trials::new(8, 1, InitStrategy::Kaiming, ActFn::Relu, 0);
        assert_eq!(trials.summarize(0), Err(SimErr::InvalidTrialCount));
    }

    #[test]
    fn restartable() {
        let trials = Trials::new(16, 3, InitStrategy::Xavier, ActFn::Tanh, 42);

        let first = trials.iter(5).collect::<Result<Vec<_>>>().unwrap();
        let second = trials.iter(5).collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(first, second);
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn trial_matches_seeded_simulation() {
        let trials = Trials::new(16, 3, InitStrategy::Kaiming, ActFn::Relu, 10);
        let outcome = trials.run(2).unwrap();

        let stats =
            crate::simulate_seeded(12, 16, 3, InitStrategy::Kaiming, ActFn::Relu).unwrap();
        assert_eq!(outcome.stats(), stats);
    }

    #[test]
    fn errors_surface() {
        let trials = Trials::new(0, 3, InitStrategy::Kaiming, ActFn::Relu, 0);
        assert_eq!(
            trials.summarize(4),
            Err(SimErr::InvalidDimension { got: 0 })
        );
    }

    #[test]
    fn summary_counts_trials() {
        let trials = Trials::new(32, 1, InitStrategy::lecun_scaled(32), ActFn::Identity, 3);
        let summary = trials.summarize(10).unwrap();

        assert_eq!(summary.trials(), 10);
        assert!(summary.rms().is_finite());
    }
}
