//! Core types shared across the crate.
//!
//! Currently this is the error type only; resolution outcomes are modeled as
//! values (`Option`), so the error surface stays small.

pub mod error;

pub use error::TwigpathError;
