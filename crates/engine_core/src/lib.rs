//! Core types shared across the openstrike simulation crates.
//!
//! This crate provides the foundations the gameplay systems build on:
//! - Fixed-timestep clock for the physics cadence
//! - Health and countdown-timer primitives
//! - Re-exports of the math and ECS types used at crate boundaries

pub mod components;
pub mod time;

pub use components::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3};
pub use hecs::{Entity, World};
