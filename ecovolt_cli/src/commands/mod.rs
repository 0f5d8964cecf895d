//! CLI subcommand implementations.

pub mod categories;
pub mod product;
pub mod products;
