use std::{fmt::Display, path::Path};

use rand::{SeedableRng, rngs::StdRng};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::{ActFn, InitStrategy, Result, SimErr, Stats, TrialSummary, Trials, simulate_trace};

const DEFAULT_INPUT_DIM: i64 = 512;
const DEFAULT_NUM_LAYERS: i64 = 100;

/// A named simulation setup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Experiment {
    pub name: String,
    pub input_dim: usize,
    pub num_layers: usize,
    #[serde(serialize_with = "serialize_display")]
    pub init: InitStrategy,
    #[serde(rename = "activation", serialize_with = "serialize_display")]
    pub act_fn: ActFn,
    pub trials: usize,
    pub seed: u64,
}

fn serialize_display<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

impl Experiment {
    /// Creates a single-trial experiment with seed 0.
    pub fn new(
        name: impl Into<String>,
        input_dim: usize,
        num_layers: usize,
        init: InitStrategy,
        act_fn: ActFn,
    ) -> Self {
        Self {
            name: name.into(),
            input_dim,
            num_layers,
            init,
            act_fn,
            trials: 1,
            seed: 0,
        }
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Runs all the trials of this experiment and averages them.
    pub fn run(&self) -> Result<TrialSummary> {
        self.as_trials().summarize(self.trials)
    }

    /// Runs the first trial of this experiment, keeping the statistics of every layer.
    pub fn trace(&self) -> Result<Vec<Stats>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        simulate_trace(
            &mut rng,
            self.input_dim,
            self.num_layers,
            self.init,
            self.act_fn,
        )
    }

    fn as_trials(&self) -> Trials {
        Trials::new(
            self.input_dim,
            self.num_layers,
            self.init,
            self.act_fn,
            self.seed,
        )
    }
}

/// The experiments of the weight initialization notebook.
pub fn default_experiments() -> Vec<Experiment> {
    let n = DEFAULT_INPUT_DIM as usize;
    let depth = DEFAULT_NUM_LAYERS as usize;
    let lecun = InitStrategy::lecun_scaled(n);

    vec![
        Experiment::new(
            "one-layer-standard-normal",
            n,
            1,
            InitStrategy::StandardNormal,
            ActFn::Identity,
        )
        .with_trials(100),
        Experiment::new("one-layer-lecun", n, 1, lecun, ActFn::Identity).with_trials(100),
        Experiment::new(
            "standard-normal",
            n,
            depth,
            InitStrategy::StandardNormal,
            ActFn::Identity,
        ),
        Experiment::new(
            "scaled-normal-0.01",
            n,
            depth,
            InitStrategy::ScaledNormal(0.01),
            ActFn::Identity,
        ),
        Experiment::new("lecun", n, depth, lecun, ActFn::Identity),
        Experiment::new("xavier-tanh", n, depth, InitStrategy::Xavier, ActFn::Tanh),
        Experiment::new("xavier-relu", n, depth, InitStrategy::Xavier, ActFn::Relu),
        Experiment::new("kaiming-relu", n, depth, InitStrategy::Kaiming, ActFn::Relu),
    ]
}

/// Loads the experiments from a JSON file.
///
/// # Errors
/// Returns a `SimErr::Config` if the file cannot be read or parsed, or the validation error
/// of the first invalid experiment.
pub fn load_experiments<P: AsRef<Path>>(path: P) -> Result<Vec<Experiment>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| SimErr::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse_experiments(&content)
}

/// Parses the experiments out of a JSON document of the form
/// `{ "experiments": [ { "init": "kaiming", ... } ] }`.
pub fn parse_experiments(content: &str) -> Result<Vec<Experiment>> {
    let val: Value =
        serde_json::from_str(content).map_err(|e| SimErr::Config(format!("invalid JSON: {e}")))?;

    let experiments = val["experiments"]
        .as_array()
        .ok_or_else(|| SimErr::Config("missing experiments array".into()))?
        .iter()
        .enumerate()
        .map(|(i, e)| parse_experiment(e, i))
        .collect::<Result<Vec<_>>>()?;

    if experiments.is_empty() {
        return Err(SimErr::Config("experiments must not be empty".into()));
    }

    Ok(experiments)
}

fn parse_experiment(val: &Value, idx: usize) -> Result<Experiment> {
    let int = |key: &str, default: i64| -> Result<i64> {
        match &val[key] {
            Value::Null => Ok(default),
            v => v.as_i64().ok_or_else(|| {
                SimErr::Config(format!("experiment {idx}: {key} must be an integer"))
            }),
        }
    };

    let name = val["name"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("experiment-{idx}"));

    let input_dim = int("input_dim", DEFAULT_INPUT_DIM)?;
    if input_dim <= 0 {
        return Err(SimErr::InvalidDimension { got: input_dim });
    }

    let num_layers = int("num_layers", DEFAULT_NUM_LAYERS)?;
    if num_layers < 0 {
        return Err(SimErr::InvalidLayerCount { got: num_layers });
    }

    let init = val["init"]
        .as_str()
        .ok_or_else(|| SimErr::Config(format!("experiment {idx}: missing field init")))?
        .parse::<InitStrategy>()?;

    let act_fn = match val["activation"].as_str() {
        Some(s) => s.parse::<ActFn>()?,
        None => ActFn::default(),
    };

    let trials = int("trials", 1)?;
    if trials <= 0 {
        return Err(SimErr::InvalidTrialCount);
    }

    let seed = match &val["seed"] {
        Value::Null => 0,
        v => v
            .as_u64()
            .ok_or_else(|| SimErr::Config(format!("experiment {idx}: seed must be unsigned")))?,
    };

    Ok(Experiment {
        name,
        input_dim: input_dim as usize,
        num_layers: num_layers as usize,
        init,
        act_fn,
        trials: trials as usize,
        seed,
    })
}
