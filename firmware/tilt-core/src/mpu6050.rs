//! InvenSense MPU6050 accelerometer over I2C (accelerometer registers only).

use embedded_hal::i2c::I2c;

use crate::drivers::Accelerometer;
use crate::tilt::Sample;

// Register map
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;

/// WHO_AM_I reads back the 7-bit address with AD0 low.
pub const MPU6050_WHO_AM_I: u8 = 0x68;

/// Clear SLEEP, internal 8 MHz oscillator.
const PWR_MGMT_1_WAKE: u8 = 0x00;
/// AFS_SEL = 0, ±2 g full scale (16384 LSB/g).
const ACCEL_CONFIG_2G: u8 = 0x00;

pub struct Mpu6050<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Mpu6050<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Leave sleep mode and select the ±2 g range.
    pub fn wake(&mut self) -> Result<(), I::Error> {
        self.write_register(REG_PWR_MGMT_1, PWR_MGMT_1_WAKE)?;
        self.write_register(REG_ACCEL_CONFIG, ACCEL_CONFIG_2G)
    }

    /// Contents of WHO_AM_I, [`MPU6050_WHO_AM_I`] on a genuine part.
    pub fn chip_id(&mut self) -> Result<u8, I::Error> {
        self.read_register(REG_WHO_AM_I)
    }

    /// Raw X/Y/Z accelerometer counts.
    pub fn read_raw_acceleration(&mut self) -> Result<[i16; 3], I::Error> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_ACCEL_XOUT_H], &mut buf)?;
        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }

    pub fn release(self) -> I {
        self.i2c
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), I::Error> {
        self.i2c.write(self.address, &[reg, value])
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, I::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;
        Ok(buf[0])
    }
}

impl<I: I2c> Accelerometer for Mpu6050<I> {
    type Error = I::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.wake()
    }

    fn read_acceleration(&mut self, sensitivity_lsb_per_g: f32) -> Result<Sample, Self::Error> {
        let [x, y, z] = self.read_raw_acceleration()?;
        Ok(Sample {
            x: f32::from(x) / sensitivity_lsb_per_g,
            y: f32::from(y) / sensitivity_lsb_per_g,
            z: f32::from(z) / sensitivity_lsb_per_g,
        })
    }
}
