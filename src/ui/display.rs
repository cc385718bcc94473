//! SSD1306 OLED display wrapper.
//!
//! Draws one [`Frame`] per call. Shift and ceiling animations are a
//! single offset frame; the next frame snaps back.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};
use heapless::String;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;
use tpdial::magnitude::Shift;
use tpdial::transmit::Phase;
use tpdial::ui::{Coordinates, EditField, Frame, Gauge};
use tpdial::Error;

use core::fmt::Write;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

const CENTER_X: i32 = 64;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(display)
}

fn style(font: &'static MonoFont<'static>) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::On)
        .build()
}

fn centered<I2C>(display: &mut Display<I2C>, text: &str, y: i32, font: &'static MonoFont<'static>)
where
    I2C: embedded_hal::i2c::I2c,
{
    let _ = Text::with_alignment(text, Point::new(CENTER_X, y), style(font), Alignment::Center)
        .draw(display);
}

/// Render `frame` and push it to the panel.
pub fn draw<I2C>(display: &mut Display<I2C>, frame: &Frame) -> Result<(), Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();

    match frame {
        Frame::Gauge(gauge) => draw_gauge(display, gauge),
        Frame::Home(coords) => draw_coords(display, "HOME", coords, None),
        Frame::Settings { coords, field } => {
            draw_coords(display, "Set HOME XYZ", coords, Some(*field))
        }
        Frame::Teleport { from_home, phase } => draw_teleport(display, *from_home, *phase),
        Frame::Done => centered(display, "Done", 38, &FONT_10X20),
    }

    display.flush().map_err(|_| Error::Display)
}

fn draw_gauge<I2C>(display: &mut Display<I2C>, gauge: &Gauge)
where
    I2C: embedded_hal::i2c::I2c,
{
    let y_offset = match (gauge.shift, gauge.ceiling) {
        (Some(Shift::Up), _) => -6,
        (Some(Shift::Down), _) => 6,
        (None, true) => -2,
        (None, false) => 0,
    };

    centered(display, "Teleport", 10, &FONT_6X10);

    let mut value: String<8> = String::new();
    let _ = write!(value, "{}", gauge.value);
    centered(display, value.as_str(), 34 + y_offset, &FONT_10X20);

    centered(display, "Blocks", 46, &FONT_6X10);

    // One segment per completed decade, then the partially-filled one.
    let outline = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);
    let segment_w = 23;
    for ring in 0..gauge.rings as i32 {
        let x = 4 + ring * (segment_w + 1);
        let _ = Rectangle::new(Point::new(x, 54), Size::new(segment_w as u32, 8))
            .into_styled(outline)
            .draw(display);
        let filled = if ring == gauge.rings as i32 - 1 {
            segment_w * gauge.progress_percent as i32 / 100
        } else {
            segment_w
        };
        if filled > 0 {
            let _ = Rectangle::new(Point::new(x, 54), Size::new(filled as u32, 8))
                .into_styled(fill)
                .draw(display);
        }
    }
}

fn draw_coords<I2C>(
    display: &mut Display<I2C>,
    title: &str,
    coords: &Coordinates,
    editing: Option<EditField>,
) where
    I2C: embedded_hal::i2c::I2c,
{
    centered(display, title, 10, &FONT_6X10);

    let rows = [
        ('X', coords.x, EditField::X),
        ('Y', coords.y, EditField::Y),
        ('Z', coords.z, EditField::Z),
    ];
    for (row, (axis, value, field)) in rows.iter().enumerate() {
        let marker = if editing == Some(*field) { '>' } else { ' ' };
        let mut line: String<20> = String::new();
        let _ = write!(line, "{} {}: {}", marker, axis, value);
        let y = 28 + (row as i32 * 12);
        let _ = Text::new(line.as_str(), Point::new(24, y), style(&FONT_6X10)).draw(display);
    }

    if editing == Some(EditField::Done) {
        centered(display, "press to save", 62, &FONT_6X10);
    }
}

fn draw_teleport<I2C>(display: &mut Display<I2C>, from_home: bool, phase: Phase)
where
    I2C: embedded_hal::i2c::I2c,
{
    centered(display, "Teleport", 30, &FONT_10X20);

    let target = if from_home { "to HOME" } else { "forward" };
    centered(display, target, 44, &FONT_6X10);

    let status = match phase {
        Phase::SendingSlash => "opening chat...",
        Phase::SendingBody => "typing...",
        Phase::Idle | Phase::Done => "",
    };
    centered(display, status, 58, &FONT_6X10);
}
