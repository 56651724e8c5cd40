//! Tilt-to-servo control logic.
//!
//! Reads an accelerometer sample, turns it into a tilt angle, maps the angle
//! onto a continuous-rotation servo pulse (with a dead zone and clamping) and
//! mirrors the result on a small text display. Hardware is reached through
//! the traits in [`drivers`], so everything here runs on the host as well as
//! on the board.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod config;
pub mod controller;
pub mod drivers;
pub mod mpu6050;
pub mod render;
pub mod servo;
pub mod tilt;

#[cfg(test)]
mod testing;

pub use config::{BoardWiring, ConfigError, ControllerConfig};
pub use controller::{TickReport, TiltController};
pub use drivers::{Accelerometer, PulseOutput, TextScale, TextSurface};
pub use mpu6050::Mpu6050;
pub use render::RenderMode;
pub use servo::{ServoCommand, ServoState};
pub use tilt::{tilt_angle_deg, Sample};
