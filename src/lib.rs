//! Two-port S-parameter sweeps: acquisition from a network analyzer over
//! SCPI, and the dataset, view and range model shared by viewers and
//! exporters.
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod file;
pub mod filter;
pub mod frequency;
pub mod prelude;
pub mod probe;
pub mod scale;
pub mod scpi;
pub mod session;
pub mod trace;
pub mod transport;
pub mod util;
pub mod viewer;
