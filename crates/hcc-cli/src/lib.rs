//! Library side of the `hcc-raf` binary: logging setup, configuration
//! loading and CSV batch I/O.

pub mod config;
pub mod csv_io;
pub mod logging;
