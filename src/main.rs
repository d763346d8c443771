use std::env;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use serde::Serialize;

use signal_propagation::{
    Stats, TrialSummary,
    config::{self, Experiment},
};

#[derive(Serialize)]
struct Report<'a> {
    experiment: &'a Experiment,
    summary: TrialSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<Stats>>,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut trace = false;
    let mut path = None;
    for arg in env::args().skip(1) {
        if arg == "--trace" {
            trace = true;
        } else if arg.starts_with("--") {
            bail!("unknown flag {arg}, usage: signal-propagation [--trace] [config.json]");
        } else if path.replace(arg).is_some() {
            bail!("expected at most one config file");
        }
    }

    let experiments = match &path {
        Some(path) => config::load_experiments(path)
            .with_context(|| format!("loading experiments from {path}"))?,
        None => {
            info!("no config given, running the default experiments");
            config::default_experiments()
        }
    };

    for experiment in &experiments {
        let summary = experiment
            .run()
            .with_context(|| format!("running experiment {}", experiment.name))?;

        info!(
            "{}: {} + {}, {} layer(s) of width {}: mean={} std={}",
            experiment.name,
            experiment.init,
            experiment.act_fn,
            experiment.num_layers,
            experiment.input_dim,
            summary.mean(),
            summary.std()
        );

        if !summary.std().is_finite() {
            warn!("{}: activations exploded", experiment.name);
        }

        let layers = match trace {
            true => Some(experiment.trace()?),
            false => None,
        };

        let report = Report {
            experiment,
            summary,
            trace: layers,
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}
