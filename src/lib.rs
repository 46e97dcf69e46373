#[macro_use]
mod patterns;

pub mod cli;
pub mod config;
pub mod consolidation;
pub mod error;
pub mod export;
pub mod quantity;
pub mod recipe;
pub mod scaling;
