//! In-memory stand-ins for the board drivers.

use std::collections::VecDeque;

use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation};

use crate::drivers::{Accelerometer, PulseOutput, TextScale, TextSurface};
use crate::tilt::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

#[derive(Default)]
pub struct FakeAccelerometer {
    pub samples: VecDeque<Result<Sample, FakeError>>,
    pub last_sensitivity: Option<f32>,
}

impl FakeAccelerometer {
    pub fn with_samples(samples: &[Sample]) -> Self {
        Self {
            samples: samples.iter().copied().map(Ok).collect(),
            ..Self::default()
        }
    }
}

impl Accelerometer for FakeAccelerometer {
    type Error = FakeError;

    fn init(&mut self) -> Result<(), FakeError> {
        Ok(())
    }

    fn read_acceleration(&mut self, sensitivity_lsb_per_g: f32) -> Result<Sample, FakeError> {
        self.last_sensitivity = Some(sensitivity_lsb_per_g);
        self.samples.pop_front().unwrap_or(Err(FakeError))
    }
}

#[derive(Default)]
pub struct FakeServo {
    pub pulses: Vec<u32>,
    pub fail: bool,
}

impl PulseOutput for FakeServo {
    type Error = FakeError;

    fn set_pulse_width(&mut self, pulse_us: u32) -> Result<(), FakeError> {
        if self.fail {
            return Err(FakeError);
        }
        self.pulses.push(pulse_us);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Clear,
    Text {
        x: i32,
        y: i32,
        scale: TextScale,
        text: String,
    },
    Present,
}

impl SurfaceOp {
    pub fn text(x: i32, y: i32, scale: TextScale, text: &str) -> Self {
        SurfaceOp::Text {
            x,
            y,
            scale,
            text: text.into(),
        }
    }
}

#[derive(Default)]
pub struct FakeSurface {
    pub ops: Vec<SurfaceOp>,
    pub fail_draw: bool,
    pub fail_present: bool,
}

impl TextSurface for FakeSurface {
    type Error = FakeError;

    fn clear(&mut self) -> Result<(), FakeError> {
        self.ops.push(SurfaceOp::Clear);
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, scale: TextScale, text: &str) -> Result<(), FakeError> {
        if self.fail_draw {
            return Err(FakeError);
        }
        self.ops.push(SurfaceOp::text(x, y, scale, text));
        Ok(())
    }

    fn present(&mut self) -> Result<(), FakeError> {
        if self.fail_present {
            return Err(FakeError);
        }
        self.ops.push(SurfaceOp::Present);
        Ok(())
    }
}

/// Register-file I2C device answering at a single address. A write sets the
/// register pointer (first byte) and stores any following bytes; a read
/// returns bytes from the pointer onward.
pub struct FakeI2c {
    pub address: u8,
    pub registers: [u8; 128],
    pub writes: Vec<Vec<u8>>,
    pointer: usize,
}

impl FakeI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 128],
            writes: Vec::new(),
            pointer: 0,
        }
    }
}

impl i2c::ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl i2c::I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.writes.push(bytes.to_vec());
                    if let Some((&reg, data)) = bytes.split_first() {
                        self.pointer = reg as usize;
                        for (offset, &b) in data.iter().enumerate() {
                            self.registers[self.pointer + offset] = b;
                        }
                    }
                }
                Operation::Read(buf) => {
                    for (offset, b) in buf.iter_mut().enumerate() {
                        *b = self.registers[self.pointer + offset];
                    }
                    self.pointer += buf.len();
                }
            }
        }
        Ok(())
    }
}
