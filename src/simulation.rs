use log::debug;
use ndarray::{Array1, ArrayView1};
use ndarray_rand::RandomExt;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

use crate::{ActFn, InitStrategy, Result, SimErr, Stats};

/// Pushes a standard normal vector through `num_layers` freshly sampled layers.
///
/// Every layer draws its own `input_dim x input_dim` weight matrix, multiplies the current
/// activations by it and applies `act_fn`. Only the current vector and matrix are kept alive.
///
/// # Arguments
/// * `rng` - A random number generator.
/// * `input_dim` - The width of every layer.
/// * `num_layers` - The amount of layers to go through.
/// * `init` - How each layer's weights are sampled.
/// * `act_fn` - The activation applied after each product.
/// * `on_layer` - Called with the activations of every layer, in order.
///
/// # Returns
/// The activations of the last layer, or the input itself if `num_layers` is 0.
pub(crate) fn propagate<R, F>(
    rng: &mut R,
    input_dim: usize,
    num_layers: usize,
    init: InitStrategy,
    act_fn: ActFn,
    mut on_layer: F,
) -> Result<Array1<f32>>
where
    R: Rng + ?Sized,
    F: FnMut(ArrayView1<f32>),
{
    if input_dim == 0 {
        return Err(SimErr::InvalidDimension { got: 0 });
    }

    let mut x: Array1<f32> = Array1::random_using(input_dim, StandardNormal, rng);
    let mut overflowed = false;

    for layer in 1..=num_layers {
        let w = init.sample(rng, input_dim, input_dim)?;
        x = x.dot(&w);
        act_fn.apply(&mut x);

        if !overflowed && x.iter().any(|v| !v.is_finite()) {
            overflowed = true;
            debug!("{init} + {act_fn}: activations left the f32 range at layer {layer}");
        }

        on_layer(x.view());
    }

    Ok(x)
}

/// Simulates a forward pass through `num_layers` untrained layers.
///
/// # Arguments
/// * `rng` - A random number generator.
/// * `input_dim` - The width of the input and of every layer.
/// * `num_layers` - The depth of the network.
/// * `init` - How each layer's weights are sampled.
/// * `act_fn` - The activation applied after each product.
///
/// # Returns
/// The mean and std of the final activations. Overflowed runs are not an error: their
/// statistics come back as infinities or NaNs.
///
/// # Errors
/// `SimErr::InvalidDimension` if `input_dim` is 0, `SimErr::InvalidScale` if the
/// strategy's scale is unusable.
pub fn simulate<R: Rng + ?Sized>(
    rng: &mut R,
    input_dim: usize,
    num_layers: usize,
    init: InitStrategy,
    act_fn: ActFn,
) -> Result<Stats> {
    let x = propagate(rng, input_dim, num_layers, init, act_fn, |_| {})?;
    Ok(Stats::of(x.view()))
}

/// Same as `simulate` but with a `StdRng` seeded from `seed`, so equal arguments give
/// equal statistics.
pub fn simulate_seeded(
    seed: u64,
    input_dim: usize,
    num_layers: usize,
    init: InitStrategy,
    act_fn: ActFn,
) -> Result<Stats> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate(&mut rng, input_dim, num_layers, init, act_fn)
}

/// Simulates a forward pass and returns the statistics after every layer.
///
/// # Returns
/// One `Stats` per layer, the last being what `simulate` would have returned.
pub fn simulate_trace<R: Rng + ?Sized>(
    rng: &mut R,
    input_dim: usize,
    num_layers: usize,
    init: InitStrategy,
    act_fn: ActFn,
) -> Result<Vec<Stats>> {
    let mut trace = Vec::with_capacity(num_layers);
    propagate(rng, input_dim, num_layers, init, act_fn, |x| {
        trace.push(Stats::of(x))
    })?;

    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let mut rng = seeded_rng();

        let res = simulate(&mut rng, 0, 10, InitStrategy::Kaiming, ActFn::Relu);
        assert_eq!(res, Err(SimErr::InvalidDimension { got: 0 }));
    }

    #[test]
    fn zero_layers_returns_the_input() {
        let mut rng = seeded_rng();

        let stats = simulate(&mut rng, 512, 0, InitStrategy::StandardNormal, ActFn::Identity)
            .unwrap();

        assert!(stats.mean().abs() < 0.2);
        assert!((stats.std() - 1.).abs() < 0.15);
    }

    #[test]
    fn zero_scale_kills_the_signal() {
        let mut rng = seeded_rng();

        let stats = simulate(&mut rng, 16, 1, InitStrategy::ScaledNormal(0.), ActFn::Identity)
            .unwrap();

        assert_eq!(stats.mean(), 0.);
        assert_eq!(stats.std(), 0.);
    }

    #[test]
    fn single_unit_has_no_std() {
        let mut rng = seeded_rng();

        let stats = simulate(&mut rng, 1, 3, InitStrategy::Kaiming, ActFn::Identity).unwrap();
        assert!(stats.mean().is_finite());
        assert!(stats.std().is_nan());
    }

    #[test]
    fn same_seed_same_stats() {
        let a = simulate_seeded(7, 64, 20, InitStrategy::Xavier, ActFn::Tanh).unwrap();
        let b = simulate_seeded(7, 64, 20, InitStrategy::Xavier, ActFn::Tanh).unwrap();
        assert_eq!(a, b);

        let c = simulate_seeded(8, 64, 20, InitStrategy::Xavier, ActFn::Tanh).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn trace_ends_with_the_simulation_result() {
        let init = InitStrategy::Kaiming;

        let trace = simulate_trace(&mut seeded_rng(), 32, 5, init, ActFn::Relu).unwrap();
        let stats = simulate(&mut seeded_rng(), 32, 5, init, ActFn::Relu).unwrap();

        assert_eq!(trace.len(), 5);
        assert_eq!(trace.last(), Some(&stats));
    }

    #[test]
    fn empty_trace_without_layers() {
        let trace =
            simulate_trace(&mut seeded_rng(), 8, 0, InitStrategy::Xavier, ActFn::Tanh).unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn invalid_scale_is_reported() {
        let res = simulate(
            &mut seeded_rng(),
            8,
            2,
            InitStrategy::ScaledNormal(f32::NAN),
            ActFn::Identity,
        );
        assert!(matches!(res, Err(SimErr::InvalidScale(_))));
    }
}
