use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, StandardNormal, Uniform};

use crate::{Result, SimErr};

/// The rule used to sample a fresh weight matrix for every layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitStrategy {
    /// Every weight is drawn from `N(0, 1)`.
    StandardNormal,
    /// Every weight is drawn from `N(0, 1)` and multiplied by the given constant.
    ScaledNormal(f32),
    /// Uniform in `[-1, 1]` scaled by `sqrt(6 / (fan_in + fan_out))`.
    Xavier,
    /// `N(0, 1)` scaled by `sqrt(2 / fan_in)`.
    Kaiming,
}

impl InitStrategy {
    /// A `ScaledNormal` strategy that keeps the variance of a linear layer of width `n`.
    ///
    /// # Arguments
    /// * `n` - The fan-in of the layer.
    pub fn lecun_scaled(n: usize) -> Self {
        Self::ScaledNormal(1. / (n as f32).sqrt())
    }

    /// Returns the factor every unit sample gets multiplied by.
    ///
    /// # Arguments
    /// * `fan_in` - The number of input units in the weight matrix.
    /// * `fan_out` - The number of output units in the weight matrix.
    pub fn scale(&self, fan_in: usize, fan_out: usize) -> f32 {
        match *self {
            Self::StandardNormal => 1.,
            Self::ScaledNormal(s) => s,
            Self::Xavier => (6. / (fan_in + fan_out) as f32).sqrt(),
            Self::Kaiming => (2. / fan_in as f32).sqrt(),
        }
    }

    /// Samples a `fan_in x fan_out` weight matrix.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `fan_in` - The number of input units in the weight matrix.
    /// * `fan_out` - The number of output units in the weight matrix.
    ///
    /// # Returns
    /// The weights or an error if the distribution rejects the computed scale.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        fan_in: usize,
        fan_out: usize,
    ) -> Result<Array2<f32>> {
        let shape = (fan_in, fan_out);
        let scale = self.scale(fan_in, fan_out);
        if !scale.is_finite() {
            return Err(SimErr::InvalidScale(format!("{self} yields a scale of {scale}")));
        }

        let weights = match self {
            Self::StandardNormal => Array2::random_using(shape, StandardNormal, rng),
            Self::ScaledNormal(_) | Self::Kaiming => {
                Array2::random_using(shape, Normal::new(0., scale)?, rng)
            }
            Self::Xavier => {
                Array2::random_using(shape, Uniform::new_inclusive(-scale, scale)?, rng)
            }
        };

        Ok(weights)
    }
}
