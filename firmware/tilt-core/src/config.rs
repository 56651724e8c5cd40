use core::fmt;

/// Servo pulse limits for a continuous-rotation servo.
pub const NEUTRAL_PULSE_US: u32 = 1500;
pub const MIN_PULSE_US: u32 = 500;
pub const MAX_PULSE_US: u32 = 2500;

/// Angular thresholds in degrees.
pub const DEAD_ZONE_DEG: f32 = 5.0;
pub const ALERT_THRESHOLD_DEG: f32 = 45.0;

/// MPU6050 default address and ±2 g sensitivity.
pub const MPU6050_ADDRESS: u8 = 0x68;
pub const ACCEL_SENSITIVITY_LSB_PER_G: f32 = 16384.0;

/// SSD1306 128x64 OLED.
pub const OLED_ADDRESS: u8 = 0x3C;
pub const OLED_WIDTH: u32 = 128;
pub const OLED_HEIGHT: u32 = 64;

pub const I2C_BAUDRATE_HZ: u32 = 400_000;
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
pub const TICK_PERIOD_MS: u32 = 100;
pub const STARTUP_DELAY_MS: u32 = 2000;

/// Wiring and speed of one I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    pub sda_pin: u8,
    pub scl_pin: u8,
    pub baudrate_hz: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelConfig {
    pub bus: BusConfig,
    pub address: u8,
    pub sensitivity_lsb_per_g: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub bus: BusConfig,
    pub address: u8,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoConfig {
    pub pin: u8,
    pub frequency_hz: u32,
    pub neutral_pulse_us: u32,
    pub min_pulse_us: u32,
    pub max_pulse_us: u32,
}

impl ServoConfig {
    /// PWM period in microseconds (20 000 at 50 Hz).
    pub fn period_us(&self) -> u32 {
        1_000_000 / self.frequency_hz.max(1)
    }
}

/// GPIO numbers the firmware actually routed each signal to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardWiring {
    pub accel_sda: u8,
    pub accel_scl: u8,
    pub display_sda: u8,
    pub display_scl: u8,
    pub servo: u8,
}

/// Angle-to-pulse policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlConfig {
    /// Tilt range mapped onto the pulse range. `angle_min_deg` maps to the
    /// maximum pulse, `angle_max_deg` to the minimum.
    pub angle_min_deg: f32,
    pub angle_max_deg: f32,
    pub dead_zone_deg: f32,
    pub alert_threshold_deg: f32,
}

/// Process-wide configuration, built once before the control loop starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub accel: AccelConfig,
    pub display: DisplayConfig,
    pub servo: ServoConfig,
    pub control: ControlConfig,
    pub tick_period_ms: u32,
    /// Time given to the host console to attach before the banner is printed.
    pub startup_delay_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            accel: AccelConfig {
                bus: BusConfig {
                    sda_pin: 0,
                    scl_pin: 1,
                    baudrate_hz: I2C_BAUDRATE_HZ,
                },
                address: MPU6050_ADDRESS,
                sensitivity_lsb_per_g: ACCEL_SENSITIVITY_LSB_PER_G,
            },
            display: DisplayConfig {
                bus: BusConfig {
                    sda_pin: 14,
                    scl_pin: 15,
                    baudrate_hz: I2C_BAUDRATE_HZ,
                },
                address: OLED_ADDRESS,
                width: OLED_WIDTH,
                height: OLED_HEIGHT,
            },
            servo: ServoConfig {
                pin: 2,
                frequency_hz: SERVO_PWM_FREQ_HZ,
                neutral_pulse_us: NEUTRAL_PULSE_US,
                min_pulse_us: MIN_PULSE_US,
                max_pulse_us: MAX_PULSE_US,
            },
            control: ControlConfig {
                angle_min_deg: -90.0,
                angle_max_deg: 90.0,
                dead_zone_deg: DEAD_ZONE_DEG,
                alert_threshold_deg: ALERT_THRESHOLD_DEG,
            },
            tick_period_ms: TICK_PERIOD_MS,
            startup_delay_ms: STARTUP_DELAY_MS,
        }
    }
}

/// Reasons a configuration is rejected at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    DegenerateAngleRange { min_deg: f32, max_deg: f32 },
    InvertedPulseBounds { min_us: u32, max_us: u32 },
    NeutralOutOfBounds { neutral_us: u32 },
    ZeroServoFrequency,
    PulseExceedsPeriod { max_us: u32, period_us: u32 },
    InvalidDeadZone(f32),
    InvalidAlertThreshold(f32),
    InvalidSensitivity(f32),
    ZeroTickPeriod,
    UnsupportedDisplaySize { width: u32, height: u32 },
    PinMismatch {
        signal: &'static str,
        configured: u8,
        wired: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DegenerateAngleRange { min_deg, max_deg } => {
                write!(f, "angle range {}..{} is empty", min_deg, max_deg)
            }
            ConfigError::InvertedPulseBounds { min_us, max_us } => {
                write!(f, "min pulse {}us exceeds max pulse {}us", min_us, max_us)
            }
            ConfigError::NeutralOutOfBounds { neutral_us } => {
                write!(f, "neutral pulse {}us outside pulse bounds", neutral_us)
            }
            ConfigError::ZeroServoFrequency => write!(f, "servo PWM frequency is zero"),
            ConfigError::PulseExceedsPeriod { max_us, period_us } => {
                write!(f, "max pulse {}us does not fit in {}us period", max_us, period_us)
            }
            ConfigError::InvalidDeadZone(v) => write!(f, "invalid dead zone {}", v),
            ConfigError::InvalidAlertThreshold(v) => write!(f, "invalid alert threshold {}", v),
            ConfigError::InvalidSensitivity(v) => write!(f, "invalid sensitivity {}", v),
            ConfigError::ZeroTickPeriod => write!(f, "tick period is zero"),
            ConfigError::UnsupportedDisplaySize { width, height } => write!(
                f,
                "display {}x{} unsupported, panel is {}x{}",
                width, height, OLED_WIDTH, OLED_HEIGHT
            ),
            ConfigError::PinMismatch {
                signal,
                configured,
                wired,
            } => write!(
                f,
                "{} configured on GPIO{} but wired to GPIO{}",
                signal, configured, wired
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

fn is_non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

impl ControllerConfig {
    /// Check the invariants the control math relies on. Called once at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let control = &self.control;
        if !control.angle_min_deg.is_finite()
            || !control.angle_max_deg.is_finite()
            || control.angle_min_deg == control.angle_max_deg
        {
            return Err(ConfigError::DegenerateAngleRange {
                min_deg: control.angle_min_deg,
                max_deg: control.angle_max_deg,
            });
        }

        let servo = &self.servo;
        if servo.min_pulse_us > servo.max_pulse_us {
            return Err(ConfigError::InvertedPulseBounds {
                min_us: servo.min_pulse_us,
                max_us: servo.max_pulse_us,
            });
        }
        if !(servo.min_pulse_us..=servo.max_pulse_us).contains(&servo.neutral_pulse_us) {
            return Err(ConfigError::NeutralOutOfBounds {
                neutral_us: servo.neutral_pulse_us,
            });
        }
        if servo.frequency_hz == 0 {
            return Err(ConfigError::ZeroServoFrequency);
        }
        if servo.max_pulse_us >= servo.period_us() {
            return Err(ConfigError::PulseExceedsPeriod {
                max_us: servo.max_pulse_us,
                period_us: servo.period_us(),
            });
        }

        if !is_non_negative(control.dead_zone_deg) {
            return Err(ConfigError::InvalidDeadZone(control.dead_zone_deg));
        }
        if !is_non_negative(control.alert_threshold_deg) {
            return Err(ConfigError::InvalidAlertThreshold(control.alert_threshold_deg));
        }

        let sensitivity = self.accel.sensitivity_lsb_per_g;
        if !sensitivity.is_finite() || sensitivity <= 0.0 {
            return Err(ConfigError::InvalidSensitivity(sensitivity));
        }

        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }

        // Text positions and the panel driver are fixed to this geometry.
        let display = &self.display;
        if (display.width, display.height) != (OLED_WIDTH, OLED_HEIGHT) {
            return Err(ConfigError::UnsupportedDisplaySize {
                width: display.width,
                height: display.height,
            });
        }
        Ok(())
    }

    /// Compare the configured pins against the GPIOs the board bring-up
    /// actually claimed.
    pub fn check_wiring(&self, wired: &BoardWiring) -> Result<(), ConfigError> {
        let pairs = [
            ("accelerometer SDA", self.accel.bus.sda_pin, wired.accel_sda),
            ("accelerometer SCL", self.accel.bus.scl_pin, wired.accel_scl),
            ("display SDA", self.display.bus.sda_pin, wired.display_sda),
            ("display SCL", self.display.bus.scl_pin, wired.display_scl),
            ("servo", self.servo.pin, wired.servo),
        ];
        for (signal, configured, wired) in pairs {
            if configured != wired {
                return Err(ConfigError::PinMismatch {
                    signal,
                    configured,
                    wired,
                });
            }
        }
        Ok(())
    }
}
