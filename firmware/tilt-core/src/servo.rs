use crate::config::ControllerConfig;

/// Linear interpolation of `value` from one range onto another.
///
/// `from_min` and `from_max` must differ; configuration validation
/// guarantees this for the ranges used by the controller.
pub fn map_range(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    (value - from_min) * (to_max - to_min) / (from_max - from_min) + to_min
}

/// Whether the servo is held at neutral or driven by the tilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoState {
    Stopped,
    Actuating,
}

impl ServoState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServoState::Stopped => "STOPPED",
            ServoState::Actuating => "ACTUATING",
        }
    }
}

/// Pulse command for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoCommand {
    pub state: ServoState,
    pub pulse_us: u32,
}

/// Turn a tilt angle into a servo command.
///
/// Inside the dead zone (`|angle| < dead_zone_deg`) the servo is stopped at
/// the neutral pulse. Outside it, the angle range maps inversely onto the
/// pulse range, rounded to the nearest microsecond and clamped to the pulse
/// bounds. A NaN angle is treated as stopped.
pub fn servo_command(angle_deg: f32, config: &ControllerConfig) -> ServoCommand {
    let control = &config.control;
    let servo = &config.servo;

    if angle_deg.is_nan() || angle_deg.abs() < control.dead_zone_deg {
        return ServoCommand {
            state: ServoState::Stopped,
            pulse_us: servo.neutral_pulse_us,
        };
    }

    let mapped = map_range(
        angle_deg,
        control.angle_min_deg,
        control.angle_max_deg,
        servo.max_pulse_us as f32,
        servo.min_pulse_us as f32,
    );

    ServoCommand {
        state: ServoState::Actuating,
        pulse_us: clamp_pulse(mapped, servo.min_pulse_us, servo.max_pulse_us),
    }
}

fn clamp_pulse(pulse_us: f32, min_us: u32, max_us: u32) -> u32 {
    if pulse_us.is_nan() {
        return min_us;
    }
    libm::roundf(pulse_us).clamp(min_us as f32, max_us as f32) as u32
}

/// Duty count that holds the output high for `pulse_us` out of every
/// `period_us`, for a PWM timer whose full scale is `max_duty`.
pub fn duty_for_pulse(pulse_us: u32, period_us: u32, max_duty: u32) -> u32 {
    if period_us == 0 {
        return 0;
    }
    let pulse_us = pulse_us.min(period_us);
    (u64::from(pulse_us) * u64::from(max_duty) / u64::from(period_us)) as u32
}
