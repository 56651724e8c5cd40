//! Status screen rendering.

use core::fmt::Write;

use heapless::String;

use crate::config::ControllerConfig;
use crate::drivers::{TextScale, TextSurface};

/// Longest line the status screen formats.
pub const STATUS_TEXT_CAPACITY: usize = 20;

pub type StatusText = String<STATUS_TEXT_CAPACITY>;

pub const ALERT_LABEL: &str = "ALERT!";
pub const NORMAL_LABEL: &str = "Servo control:";

// Top-left corners on a 128x64 panel.
const ALERT_LABEL_POS: (i32, i32) = (25, 16);
const ALERT_VALUE_POS: (i32, i32) = (15, 40);
const NORMAL_LABEL_POS: (i32, i32) = (0, 16);
const NORMAL_VALUE_POS: (i32, i32) = (20, 35);

/// Which screen the display shows this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Tilt beyond the alert threshold: warning plus the angle.
    Alert,
    /// Routine status: the commanded pulse width.
    Normal,
}

/// Alert when `|angle|` strictly exceeds the alert threshold.
pub fn render_mode(angle_deg: f32, config: &ControllerConfig) -> RenderMode {
    if angle_deg.abs() > config.control.alert_threshold_deg {
        RenderMode::Alert
    } else {
        RenderMode::Normal
    }
}

/// Angle to one decimal place, e.g. `46.0°`. Output longer than
/// [`STATUS_TEXT_CAPACITY`] is cut short.
pub fn format_alert_angle(angle_deg: f32) -> StatusText {
    let mut text = StatusText::new();
    let _ = write!(text, "{:.1}°", angle_deg);
    text
}

/// Pulse width in microseconds, e.g. `1205 µs`.
pub fn format_pulse_width(pulse_us: u32) -> StatusText {
    let mut text = StatusText::new();
    let _ = write!(text, "{} µs", pulse_us);
    text
}

/// Redraw the whole status screen for one tick: clear, draw the label and
/// value for the selected mode, then present the frame.
pub fn render_status<D: TextSurface>(
    surface: &mut D,
    angle_deg: f32,
    pulse_us: u32,
    config: &ControllerConfig,
) -> Result<RenderMode, D::Error> {
    let mode = render_mode(angle_deg, config);

    surface.clear()?;
    match mode {
        RenderMode::Alert => {
            let (x, y) = ALERT_LABEL_POS;
            surface.draw_text(x, y, TextScale::Large, ALERT_LABEL)?;
            let (x, y) = ALERT_VALUE_POS;
            surface.draw_text(x, y, TextScale::Small, &format_alert_angle(angle_deg))?;
        }
        RenderMode::Normal => {
            let (x, y) = NORMAL_LABEL_POS;
            surface.draw_text(x, y, TextScale::Small, NORMAL_LABEL)?;
            let (x, y) = NORMAL_VALUE_POS;
            surface.draw_text(x, y, TextScale::Large, &format_pulse_width(pulse_us))?;
        }
    }
    surface.present()?;

    Ok(mode)
}
