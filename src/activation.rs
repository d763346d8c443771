use std::{
    fmt::{self, Display},
    str::FromStr,
};

use ndarray::Array1;

use crate::SimErr;

/// An elementwise activation applied after each layer's product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActFn {
    #[default]
    Identity,
    Tanh,
    Relu,
}
use ActFn::*;

impl ActFn {
    pub fn f(&self, x: f32) -> f32 {
        match self {
            Identity => x,
            Tanh => x.tanh(),
            Relu if x < 0. => 0.,
            Relu => x,
        }
    }

    /// Applies the activation to every element of `x` in place.
    ///
    /// # Arguments
    /// * `x` - The layer's output.
    pub fn apply(&self, x: &mut Array1<f32>) {
        if let Identity = self {
            return;
        }

        x.mapv_inplace(|z| self.f(z));
    }
}

impl FromStr for ActFn {
    type Err = SimErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" | "none" => Ok(Identity),
            "tanh" => Ok(Tanh),
            "relu" => Ok(Relu),
            other => Err(SimErr::Config(format!("unknown activation: {other}"))),
        }
    }
}

impl Display for ActFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Identity => "identity",
            Tanh => "tanh",
            Relu => "relu",
        };

        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keeps_values() {
        let mut x = Array1::from_vec(vec![-2., 0., 3.]);
        ActFn::Identity.apply(&mut x);
        assert_eq!(x.to_vec(), vec![-2., 0., 3.]);
    }

    #[test]
    fn relu_clamps_negatives() {
        let mut x = Array1::from_vec(vec![-2., -0.5, 0., 1., 2.]);
        ActFn::Relu.apply(&mut x);
        assert_eq!(x.to_vec(), vec![0., 0., 0., 1., 2.]);
    }

    #[test]
    fn tanh_is_bounded() {
        let mut x = Array1::from_vec(vec![-1e6, -1., 0., 1., 1e6]);
        ActFn::Tanh.apply(&mut x);

        assert!(x.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert_eq!(x[2], 0.);
        assert!((x[3] - 1f32.tanh()).abs() < 1e-6);
    }

    #[test]
    fn nan_flows_through() {
        for act_fn in [ActFn::Identity, ActFn::Tanh, ActFn::Relu] {
            let mut x = Array1::from_vec(vec![f32::NAN]);
            act_fn.apply(&mut x);
            assert!(x[0].is_nan(), "{act_fn} swallowed a NaN");
        }
    }

    #[test]
    fn parse_round_trip() {
        for act_fn in [ActFn::Identity, ActFn::Tanh, ActFn::Relu] {
            assert_eq!(act_fn.to_string().parse::<ActFn>().unwrap(), act_fn);
        }

        assert!("softmax".parse::<ActFn>().is_err());
    }
}
