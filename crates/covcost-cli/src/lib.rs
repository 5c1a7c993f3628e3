//! Library side of the `covcost` command: logging setup and pipeline stages.

pub mod logging;
pub mod pipeline;
