use display_interface::DisplayError;
use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use esp_idf_hal::i2c::I2cDriver;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use tilt_core::{TextScale, TextSurface};

type Panel<'d> = Ssd1306<
    I2CInterface<I2cDriver<'d>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// SSD1306 128x64 OLED in buffered mode. Drawing goes to RAM; `present`
/// pushes the whole frame over I2C.
pub struct OledDisplay<'d> {
    panel: Panel<'d>,
}

impl<'d> OledDisplay<'d> {
    pub fn new(i2c: I2cDriver<'d>, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        Self { panel }
    }

    /// Run the controller power-up sequence (internal charge pump).
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.panel.init()
    }
}

// Small fits "Servo control:" on one line; Large is the 2x status value.
fn font_for(scale: TextScale) -> MonoTextStyle<'static, BinaryColor> {
    match scale {
        TextScale::Small => MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        TextScale::Large => MonoTextStyle::new(&FONT_10X20, BinaryColor::On),
    }
}

impl TextSurface for OledDisplay<'_> {
    type Error = DisplayError;

    fn clear(&mut self) -> Result<(), DisplayError> {
        DrawTarget::clear(&mut self.panel, BinaryColor::Off)
    }

    fn draw_text(&mut self, x: i32, y: i32, scale: TextScale, text: &str) -> Result<(), DisplayError> {
        Text::with_baseline(text, Point::new(x, y), font_for(scale), Baseline::Top)
            .draw(&mut self.panel)?;
        Ok(())
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.panel.flush()
    }
}
