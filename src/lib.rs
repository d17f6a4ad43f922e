//! Exact tensor calculus for 4-dimensional metrics.
//!
//! The library builds a metric, inverts it, derives the Christoffel symbols
//! and contracts them into the Ricci tensor, all over an exact rational
//! function engine. The binary in `main.rs` is a thin reporting layer.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
