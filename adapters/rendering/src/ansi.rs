//! Terminal rendering of pixel frames with half-height block glyphs.
//!
//! Every terminal cell covers two pixel rows: the upper pixel becomes the
//! background colour and the lower one the foreground colour of `▄`.

use std::io::Write;

use anyhow::Result as AnyResult;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use travels_core::{Grid, GridError, Pixel, Point};

/// Glyph filling the lower half of a terminal cell.
pub const LOWER_HALF_BLOCK: char = '▄';

/// Shades used without colour support, darkest first.
const RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Queues `frame` as 24-bit colour half blocks on `out`.
///
/// Translucent pixels are blended over `clear`. An odd last row is paired with
/// `clear`. Nothing is flushed.
pub fn render<W: Write>(out: &mut W, frame: &Grid<Pixel>, clear: Pixel) -> AnyResult<()> {
    for (upper, lower) in row_pairs(frame, clear)? {
        for (top, bottom) in upper.into_iter().zip(lower) {
            queue!(
                out,
                SetBackgroundColor(rgb(top)),
                SetForegroundColor(rgb(bottom)),
                Print(LOWER_HALF_BLOCK)
            )?;
        }
        queue!(out, ResetColor, Print('\n'))?;
    }
    Ok(())
}

/// Queues `frame` on `out` with one shade character per pair of pixel rows.
pub fn render_monochrome<W: Write>(
    out: &mut W,
    frame: &Grid<Pixel>,
    clear: Pixel,
) -> AnyResult<()> {
    for (upper, lower) in row_pairs(frame, clear)? {
        let line: String = upper
            .into_iter()
            .zip(lower)
            .map(|(top, bottom)| shade((luminance(top) + luminance(bottom)) / 2.0))
            .collect();
        queue!(out, Print(line), Print('\n'))?;
    }
    Ok(())
}

fn rgb(pixel: Pixel) -> Color {
    Color::Rgb {
        r: pixel.red,
        g: pixel.green,
        b: pixel.blue,
    }
}

fn row_pairs(
    frame: &Grid<Pixel>,
    clear: Pixel,
) -> Result<Vec<(Vec<Pixel>, Vec<Pixel>)>, GridError> {
    let size = frame.size();
    let mut pairs = Vec::with_capacity(size.height.div_ceil(2));
    for y in (0..size.height).step_by(2) {
        let mut upper = Vec::with_capacity(size.width);
        let mut lower = Vec::with_capacity(size.width);
        for x in 0..size.width {
            upper.push(flatten(*frame.at(Point::new(x, y))?, clear));
            lower.push(if y + 1 < size.height {
                flatten(*frame.at(Point::new(x, y + 1))?, clear)
            } else {
                clear
            });
        }
        pairs.push((upper, lower));
    }
    Ok(pairs)
}

fn flatten(pixel: Pixel, clear: Pixel) -> Pixel {
    let mut base = clear;
    base += pixel;
    base
}

fn luminance(pixel: Pixel) -> f64 {
    (0.2126 * f64::from(pixel.red) + 0.7152 * f64::from(pixel.green) + 0.0722 * f64::from(pixel.blue))
        / 255.0
}

fn shade(luminance: f64) -> char {
    let last = RAMP.len() - 1;
    let index = (luminance.clamp(0.0, 1.0) * last as f64).round() as usize;
    RAMP[index.min(last)]
}
