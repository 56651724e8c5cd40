use esp_idf_hal::ledc::LedcDriver;
use esp_idf_sys::EspError;
use tilt_core::config::ServoConfig;
use tilt_core::servo::duty_for_pulse;
use tilt_core::PulseOutput;

/// Continuous-rotation servo driven from an LEDC channel.
pub struct ServoDriver<'d> {
    ledc: LedcDriver<'d>,
    max_duty: u32,
    period_us: u32,
}

impl<'d> ServoDriver<'d> {
    /// Wrap an LEDC channel whose timer already runs at the servo frequency.
    /// The output starts at the neutral pulse so the servo is stopped.
    pub fn new(ledc: LedcDriver<'d>, config: &ServoConfig) -> Result<Self, EspError> {
        let max_duty = ledc.get_max_duty();
        let mut servo = Self {
            ledc,
            max_duty,
            period_us: config.period_us(),
        };
        servo.set_pulse_width(config.neutral_pulse_us)?;
        Ok(servo)
    }
}

impl PulseOutput for ServoDriver<'_> {
    type Error = EspError;

    fn set_pulse_width(&mut self, pulse_us: u32) -> Result<(), EspError> {
        let duty = duty_for_pulse(pulse_us, self.period_us, self.max_duty);
        self.ledc.set_duty(duty)?;
        Ok(())
    }
}
