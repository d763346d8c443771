mod parse;
mod strategy;

pub use strategy::InitStrategy;
