//! CLI argument definitions for vpd

mod core;

pub use core::{Cli, Commands};
