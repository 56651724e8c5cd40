use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::config::ControllerConfig;
use crate::drivers::{Accelerometer, PulseOutput, TextSurface};
use crate::render::{render_status, RenderMode};
use crate::servo::{servo_command, ServoCommand, ServoState};
use crate::tilt::tilt_angle_deg;

/// What one pass of the control loop did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickReport {
    /// A sample was read and the servo commanded from it. `mode` is `None`
    /// when the display could not be updated.
    Controlled {
        angle_deg: f32,
        command: ServoCommand,
        mode: Option<RenderMode>,
    },
    /// The sample read failed; the servo was sent the neutral pulse and the
    /// screen left as it was.
    SensorFault,
}

/// Tilt-to-servo control loop. Owns the three drivers for the lifetime of
/// the program.
pub struct TiltController<'c, A, S, D> {
    config: &'c ControllerConfig,
    accel: A,
    servo: S,
    display: D,
}

impl<'c, A, S, D> TiltController<'c, A, S, D>
where
    A: Accelerometer,
    S: PulseOutput,
    D: TextSurface,
{
    pub fn new(config: &'c ControllerConfig, accel: A, servo: S, display: D) -> Self {
        Self {
            config,
            accel,
            servo,
            display,
        }
    }

    /// Read, compute, actuate, render. Driver failures are logged and never
    /// abort the tick.
    pub fn tick(&mut self) -> TickReport {
        let sample = match self
            .accel
            .read_acceleration(self.config.accel.sensitivity_lsb_per_g)
        {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Accelerometer read failed: {:?}", e);
                let neutral = self.config.servo.neutral_pulse_us;
                if let Err(e) = self.servo.set_pulse_width(neutral) {
                    error!("Servo stop failed: {:?}", e);
                }
                return TickReport::SensorFault;
            }
        };

        let angle_deg = tilt_angle_deg(&sample);
        let command = servo_command(angle_deg, self.config);

        if let Err(e) = self.servo.set_pulse_width(command.pulse_us) {
            error!("Servo update failed: {:?}", e);
        }
        info!(
            "Tilt: {:6.2}° | Servo: {} | Pulse: {:4} µs",
            angle_deg,
            command.state.as_str(),
            command.pulse_us
        );

        let mode = match render_status(&mut self.display, angle_deg, command.pulse_us, self.config)
        {
            Ok(mode) => Some(mode),
            Err(e) => {
                warn!("Display update failed: {:?}", e);
                None
            }
        };

        TickReport::Controlled {
            angle_deg,
            command,
            mode,
        }
    }

    /// Tick forever at the configured period.
    pub fn run<T: DelayNs>(&mut self, delay: &mut T) -> ! {
        info!("=== Starting main control loop ===");
        loop {
            self.tick();
            delay.delay_ms(self.config.tick_period_ms);
        }
    }

    pub fn into_parts(self) -> (A, S, D) {
        (self.accel, self.servo, self.display)
    }
}

impl TickReport {
    pub fn servo_state(&self) -> ServoState {
        match self {
            TickReport::Controlled { command, .. } => command.state,
            TickReport::SensorFault => ServoState::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::TextScale;
    use crate::testing::{FakeAccelerometer, FakeError, FakeServo, FakeSurface, SurfaceOp};
    use crate::tilt::Sample;

    fn controller<'a>(
        config: &'a ControllerConfig,
        samples: &[Sample],
    ) -> TiltController<'a, FakeAccelerometer, FakeServo, FakeSurface> {
        TiltController::new(
            config,
            FakeAccelerometer::with_samples(samples),
            FakeServo::default(),
            FakeSurface::default(),
        )
    }

    #[test]
    fn test_half_g_tilt_end_to_end() {
        let config = ControllerConfig::default();
        let mut ctl = controller(&config, &[Sample::new(-0.5, 0.0, 1.0)]);

        let report = ctl.tick();
        let TickReport::Controlled {
            angle_deg,
            command,
            mode,
        } = report
        else {
            panic!("expected a controlled tick, got {report:?}");
        };
        assert!((angle_deg - 26.57).abs() < 0.01);
        assert_eq!(command.state, ServoState::Actuating);
        assert_eq!(command.pulse_us, 1205);
        assert_eq!(mode, Some(RenderMode::Normal));

        let (accel, servo, display) = ctl.into_parts();
        assert_eq!(accel.last_sensitivity, Some(16384.0));
        assert_eq!(servo.pulses, vec![1205]);
        assert_eq!(
            display.ops,
            vec![
                SurfaceOp::Clear,
                SurfaceOp::text(0, 16, TextScale::Small, "Servo control:"),
                SurfaceOp::text(20, 35, TextScale::Large, "1205 µs"),
                SurfaceOp::Present,
            ]
        );
    }

    #[test]
    fn test_level_stops_servo() {
        let config = ControllerConfig::default();
        let mut ctl = controller(&config, &[Sample::new(0.0, 0.0, 1.0)]);

        let report = ctl.tick();
        assert_eq!(report.servo_state(), ServoState::Stopped);

        let (_, servo, _) = ctl.into_parts();
        assert_eq!(servo.pulses, vec![1500]);
    }

    #[test]
    fn test_steep_tilt_alerts() {
        let config = ControllerConfig::default();
        // -x with no y/z component is +90°
        let mut ctl = controller(&config, &[Sample::new(-1.0, 0.0, 0.0)]);

        let report = ctl.tick();
        assert!(matches!(
            report,
            TickReport::Controlled {
                mode: Some(RenderMode::Alert),
                ..
            }
        ));

        let (_, servo, display) = ctl.into_parts();
        assert_eq!(servo.pulses, vec![500]);
        assert_eq!(display.ops[1], SurfaceOp::text(25, 16, TextScale::Large, "ALERT!"));
        assert_eq!(display.ops[2], SurfaceOp::text(15, 40, TextScale::Small, "90.0°"));
    }

    #[test]
    fn test_each_tick_is_independent() {
        let config = ControllerConfig::default();
        let samples = [
            Sample::new(-0.5, 0.0, 1.0),
            Sample::new(0.0, 0.0, 1.0),
            Sample::new(0.5, 0.0, 1.0),
        ];
        let mut ctl = controller(&config, &samples);
        for _ in 0..samples.len() {
            ctl.tick();
        }

        let (_, servo, display) = ctl.into_parts();
        assert_eq!(servo.pulses, vec![1205, 1500, 1795]);
        // Full redraw per tick
        let clears = display.ops.iter().filter(|op| **op == SurfaceOp::Clear).count();
        let presents = display.ops.iter().filter(|op| **op == SurfaceOp::Present).count();
        assert_eq!((clears, presents), (3, 3));
    }

    #[test]
    fn test_sensor_fault_commands_neutral_and_skips_display() {
        let config = ControllerConfig::default();
        let mut ctl = TiltController::new(
            &config,
            FakeAccelerometer {
                samples: [Err(FakeError)].into_iter().collect(),
                ..FakeAccelerometer::default()
            },
            FakeServo::default(),
            FakeSurface::default(),
        );

        assert_eq!(ctl.tick(), TickReport::SensorFault);

        let (_, servo, display) = ctl.into_parts();
        assert_eq!(servo.pulses, vec![1500]);
        assert!(display.ops.is_empty());
    }

    #[test]
    fn test_servo_failure_still_renders() {
        let config = ControllerConfig::default();
        let mut ctl = TiltController::new(
            &config,
            FakeAccelerometer::with_samples(&[Sample::new(-0.5, 0.0, 1.0)]),
            FakeServo {
                fail: true,
                ..FakeServo::default()
            },
            FakeSurface::default(),
        );

        let report = ctl.tick();
        assert!(matches!(
            report,
            TickReport::Controlled {
                mode: Some(RenderMode::Normal),
                ..
            }
        ));
    }

    #[test]
    fn test_display_failure_is_reported_not_fatal() {
        let config = ControllerConfig::default();
        let mut ctl = TiltController::new(
            &config,
            FakeAccelerometer::with_samples(&[Sample::new(-0.5, 0.0, 1.0)]),
            FakeServo::default(),
            FakeSurface {
                fail_present: true,
                ..FakeSurface::default()
            },
        );

        let report = ctl.tick();
        assert!(matches!(report, TickReport::Controlled { mode: None, .. }));

        let (_, servo, _) = ctl.into_parts();
        assert_eq!(servo.pulses, vec![1205]);
    }

    #[test]
    fn test_custom_thresholds_are_honoured() {
        let mut config = ControllerConfig::default();
        config.control.dead_zone_deg = 30.0;
        config.control.alert_threshold_deg = 20.0;
        let mut ctl = controller(&config, &[Sample::new(-0.5, 0.0, 1.0)]);

        // 26.57° is inside the widened dead zone but past the lowered alert threshold
        let report = ctl.tick();
        assert_eq!(report.servo_state(), ServoState::Stopped);
        assert!(matches!(
            report,
            TickReport::Controlled {
                mode: Some(RenderMode::Alert),
                ..
            }
        ));
    }
}
