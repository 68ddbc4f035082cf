//! SpeciesRing Core Types and Algorithms
//!
//! This crate provides the pure, I/O-free part of SpeciesRing. It includes:
//!
//! - **Records**: Species metadata and sequence records ([`record`] module)
//! - **Alignment**: Edit distance, Hamming distance, edit scripts and
//!   difference masks ([`alignment`] module)
//! - **Ranking**: Distance-to-reference computation ([`ranking`] module)
//! - **Radial placement**: Concentric ring layout planning ([`radial`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])

pub mod alignment;
pub mod color;
pub mod geometry;
pub mod radial;
pub mod ranking;
pub mod record;

mod error;

pub use error::CoreError;
