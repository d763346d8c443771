//! Signal propagation through deep untrained layers.
//!
//! A standard normal vector is pushed through a stack of freshly sampled random layers and
//! the statistics of the result are reported. Depending on how the weights are initialized
//! the activations explode, vanish or stay stable:
//!
//! ```
//! use signal_propagation::{ActFn, InitStrategy, simulate_seeded};
//!
//! let stats = simulate_seeded(42, 512, 100, InitStrategy::Kaiming, ActFn::Relu).unwrap();
//! assert!(stats.std() > 0.1 && stats.std() < 10.);
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod initialization;
pub mod simulation;
pub mod stats;
pub mod trials;

pub use activation::ActFn;
pub use error::{Result, SimErr};
pub use initialization::InitStrategy;
pub use simulation::{simulate, simulate_seeded, simulate_trace};
pub use stats::{Moments, Stats, TrialSummary};
pub use trials::Trials;
