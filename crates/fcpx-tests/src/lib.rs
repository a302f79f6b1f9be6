//! Integration test crate for FCPX Studio.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple fcpx crates to verify they work together.

#[cfg(test)]
mod document;

#[cfg(test)]
mod editing;
