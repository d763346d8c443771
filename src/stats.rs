use ndarray::ArrayView1;
use serde::Serialize;

/// Distribution statistics of a layer's activations.
///
/// Infinities and NaNs are valid values: they are how exploding activations show up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    mean: f32,
    std: f32,
}

impl Stats {
    /// Creates a new `Stats`.
    ///
    /// # Arguments
    /// * `mean` - The sample mean.
    /// * `std` - The sample standard deviation.
    pub fn new(mean: f32, std: f32) -> Self {
        Self { mean, std }
    }

    /// Computes the sample mean and the Bessel-corrected sample standard deviation of `x`.
    ///
    /// # Arguments
    /// * `x` - The values to summarize.
    ///
    /// # Returns
    /// The statistics of `x`. Both are NaN when `x` is empty, and the std is NaN when
    /// `x` has a single element.
    pub fn of(x: ArrayView1<f32>) -> Self {
        let mean = x.mean().unwrap_or(f32::NAN);
        let std = if x.len() > 1 { x.std(1.) } else { f32::NAN };

        Self { mean, std }
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn std(&self) -> f32 {
        self.std
    }

    /// Whether both statistics are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.std.is_finite()
    }
}

impl From<Stats> for (f32, f32) {
    fn from(stats: Stats) -> Self {
        (stats.mean, stats.std)
    }
}

/// The outcome of a single trial: its statistics plus the mean of the squared values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    stats: Stats,
    mean_sq: f32,
}

impl Moments {
    pub fn of(x: ArrayView1<f32>) -> Self {
        let mean_sq = match x.len() {
            0 => f32::NAN,
            n => x.fold(0f32, |acc, v| acc + v * v) / n as f32,
        };

        Self {
            stats: Stats::of(x),
            mean_sq,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn mean_sq(&self) -> f32 {
        self.mean_sq
    }
}

/// Statistics averaged over many independent trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialSummary {
    trials: usize,
    mean: f32,
    rms: f32,
    std: f32,
}

impl TrialSummary {
    /// Folds the outcomes of many trials into a single summary.
    ///
    /// # Arguments
    /// * `outcomes` - The per-trial moments.
    ///
    /// # Returns
    /// The average of the per-trial means, the root of the average mean square and the
    /// average per-trial std. `None` if there are no outcomes.
    pub fn from_moments<I>(outcomes: I) -> Option<Self>
    where
        I: IntoIterator<Item = Moments>,
    {
        let (trials, mean, mean_sq, std) = outcomes.into_iter().fold(
            (0usize, 0f32, 0f32, 0f32),
            |(trials, mean, mean_sq, std), m| {
                (
                    trials + 1,
                    mean + m.stats.mean,
                    mean_sq + m.mean_sq,
                    std + m.stats.std,
                )
            },
        );

        if trials == 0 {
            return None;
        }

        let n = trials as f32;
        Some(Self {
            trials,
            mean: mean / n,
            rms: (mean_sq / n).sqrt(),
            std: std / n,
        })
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn rms(&self) -> f32 {
        self.rms
    }

    pub fn std(&self) -> f32 {
        self.std
    }
}
