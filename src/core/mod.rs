//! Core module tree: expression front end, exact algebra, tensor geometry.
//! Only declare modules that exist in the src/core/ directory.

#[macro_use]
pub mod debug; // gated debug logging (CURVATURE_DEBUG=1) provides debug_log! macro

pub mod ast;
pub mod cas;
pub mod compiler;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod lexer;
pub mod lowering;
pub mod parser;
pub mod patterns;
pub mod token;
pub use token::TokenKind;
