pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod abundances;
pub mod config;
pub mod error;
#[cfg(test)]
mod is_close;
pub mod isotope;
pub mod pipeline;
mod raw_tables;
pub mod reference;
pub mod selection;

pub use config::{AbundanceConfig, DegeneratePolicy, SolarSource, DEFAULT_ELEMENTS};
pub use error::AbundanceError;
pub use pipeline::{
    calc_abundances, Abundances, ChemEvolution, SimulationOutput, SimulationParams,
};
