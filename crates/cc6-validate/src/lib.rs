//! CORDEX-CMIP6 compliance checks for NetCDF file metadata.
//!
//! The host opens the file and exposes it through [`Dataset`]; a [`Checker`]
//! built from the CV and CMOR tables scores it.

#![deny(unsafe_code)]

mod checks;

pub mod checker;
pub mod context;
pub mod dataset;
pub mod logging;

pub use checker::Checker;
pub use context::FileContext;
pub use dataset::{Compression, Dataset, DatasetSnapshot, Variable};
