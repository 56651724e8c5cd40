//! Seams between the control loop and the board.
//!
//! The firmware crate implements these over ESP-IDF peripherals; tests
//! implement them with in-memory fakes.

use core::fmt::Debug;

use crate::tilt::Sample;

/// Source of 3-axis acceleration samples.
pub trait Accelerometer {
    type Error: Debug;

    /// Bring the sensor out of reset/sleep.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Read one sample, scaling raw counts by `sensitivity_lsb_per_g`.
    fn read_acceleration(&mut self, sensitivity_lsb_per_g: f32) -> Result<Sample, Self::Error>;
}

/// Servo signal output. Callers pre-clamp `pulse_us` to a safe range.
pub trait PulseOutput {
    type Error: Debug;

    fn set_pulse_width(&mut self, pulse_us: u32) -> Result<(), Self::Error>;
}

/// Text glyph size. `Large` is roughly twice the height of `Small`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextScale {
    Small,
    Large,
}

/// Frame-buffered text display.
pub trait TextSurface {
    type Error: Debug;

    /// Blank the frame buffer.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, x: i32, y: i32, scale: TextScale, text: &str) -> Result<(), Self::Error>;

    /// Push the frame buffer to the panel.
    fn present(&mut self) -> Result<(), Self::Error>;
}
