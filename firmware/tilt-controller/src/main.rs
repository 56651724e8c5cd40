mod display;
mod servo;

use display::OledDisplay;
use servo::ServoDriver;
use tilt_core::mpu6050::MPU6050_WHO_AM_I;
use tilt_core::{Accelerometer, ControllerConfig, Mpu6050, TiltController};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::Pin;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use log::{error, info, warn};
use tilt_core::config::BusConfig;
use tilt_core::BoardWiring;

fn i2c_config(bus: &BusConfig) -> I2cConfig {
    I2cConfig::new()
        .baudrate(bus.baudrate_hz.Hz().into())
        .sda_enable_pullup(true)
        .scl_enable_pullup(true)
}

fn gpio_num(pin: &impl Pin) -> u8 {
    pin.pin() as u8
}

fn main() {
    // Initialize ESP-IDF logging and system
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init().expect("Failed to init logger");

    let config = ControllerConfig::default();

    // Give the USB console time to attach
    FreeRtos::delay_ms(config.startup_delay_ms);

    info!("Tilt controller v{}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return;
    }
    info!("Initializing components...");

    let peripherals = Peripherals::take().expect("Failed to take peripherals");
    let pins = peripherals.pins;

    let wiring = BoardWiring {
        accel_sda: gpio_num(&pins.gpio0),
        accel_scl: gpio_num(&pins.gpio1),
        display_sda: gpio_num(&pins.gpio14),
        display_scl: gpio_num(&pins.gpio15),
        servo: gpio_num(&pins.gpio2),
    };
    if let Err(e) = config.check_wiring(&wiring) {
        error!("Configuration does not match board wiring: {}", e);
        return;
    }

    // Accelerometer bus
    let accel_i2c = I2cDriver::new(
        peripherals.i2c0,
        pins.gpio0,
        pins.gpio1,
        &i2c_config(&config.accel.bus),
    )
    .expect("Failed to init I2C0");
    info!(
        "I2C0 configured for MPU6050 - SDA=GPIO{}, SCL=GPIO{}",
        config.accel.bus.sda_pin, config.accel.bus.scl_pin
    );

    // Display bus
    let display_i2c = I2cDriver::new(
        peripherals.i2c1,
        pins.gpio14,
        pins.gpio15,
        &i2c_config(&config.display.bus),
    )
    .expect("Failed to init I2C1");
    info!(
        "I2C1 configured for OLED - SDA=GPIO{}, SCL=GPIO{}",
        config.display.bus.sda_pin, config.display.bus.scl_pin
    );

    let mut mpu = Mpu6050::new(accel_i2c, config.accel.address);
    if let Err(e) = mpu.init() {
        error!("Failed to wake MPU6050: {:?}", e);
    }
    match mpu.chip_id() {
        Ok(MPU6050_WHO_AM_I) => info!("MPU6050 initialized. Id: 0x{:X}", MPU6050_WHO_AM_I),
        Ok(id) => warn!("MPU6050 answered with unexpected id 0x{:X}", id),
        Err(e) => error!("Failed to read MPU6050 id: {:?}", e),
    }

    // Servo via LEDC PWM
    let timer_config = TimerConfig::default()
        .frequency(config.servo.frequency_hz.Hz().into())
        .resolution(Resolution::Bits14);
    let timer = LedcTimerDriver::new(peripherals.ledc.timer0, &timer_config)
        .expect("Failed to init LEDC timer");
    let ledc_driver = LedcDriver::new(peripherals.ledc.channel0, timer, pins.gpio2)
        .expect("Failed to init LEDC channel");
    let servo = ServoDriver::new(ledc_driver, &config.servo).expect("Failed to init servo");
    info!("Servo configured on GPIO{}", config.servo.pin);

    let mut display = OledDisplay::new(display_i2c, config.display.address);
    match display.init() {
        Ok(()) => info!(
            "SSD1306 {}x{} display ready at 0x{:X}",
            config.display.width, config.display.height, config.display.address
        ),
        Err(e) => error!("Failed to init SSD1306: {:?}", e),
    }

    let mut controller = TiltController::new(&config, mpu, servo, display);
    controller.run(&mut FreeRtos)
}
