//! Synthetic index data for benchmarks, demos and the CLI `generate` command.

pub mod synthetic;
