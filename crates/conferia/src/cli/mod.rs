//! CLI command modules.

pub mod context;
pub mod material;
pub mod output;
pub mod scan;
pub mod sector;
pub mod stats;
