//! Core primitives.
//!
//! Geometry and randomness foundations shared by the whole engine.

pub mod rng;
pub mod vec2;

// Re-export core types
pub use rng::DeterministicRng;
pub use vec2::Vec2;
