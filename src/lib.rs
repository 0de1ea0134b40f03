//! Critter card-battle resolution engine: roster a hand of critters into
//! slots, project the bonus-adjusted score, then run a paced, skippable
//! resolution that rolls each slot and declares the winner.
//!
//! The core is a library; the binary in `src/main.rs` is a thin demo CLI.

pub mod cli;
pub mod data;
pub mod encounter;
pub mod pacing;
pub mod parallel;
