#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Camera windowing: turns a look-at cell into the block of map cells that
//! fits on screen, and maps each of them to a pixel window.
//!
//! On each axis the camera keeps the look-at cell centred until it would
//! reveal space past the map edge; from there the window sticks to the edge.
//! Maps narrower than the screen are anchored at the top-left.

use thiserror::Error;
use travels_core::{Point, Size};

/// Errors raised while computing a camera window.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ViewportError {
    /// Tiles without area cannot be laid out.
    #[error("tile size {tile_size} has a zero extent")]
    ZeroTileSize {
        /// The rejected tile size.
        tile_size: Size,
    },
}

/// Block of map cells visible through the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    top_left: Point,
    tiles: Size,
    tile_size: Size,
}

impl Window {
    /// Map cell drawn in the top-left screen cell.
    #[must_use]
    pub const fn top_left(&self) -> Point {
        self.top_left
    }

    /// Number of map cells drawn along each axis.
    #[must_use]
    pub const fn tiles(&self) -> Size {
        self.tiles
    }

    /// Pixel extents of a single cell.
    #[must_use]
    pub const fn tile_size(&self) -> Size {
        self.tile_size
    }

    /// Map cell drawn in the bottom-right screen cell, if anything is visible.
    #[must_use]
    pub fn bottom_right(&self) -> Option<Point> {
        let x = self.tiles.width.checked_sub(1)?;
        let y = self.tiles.height.checked_sub(1)?;
        Some(self.top_left + Point::new(x, y))
    }

    /// Screen cell that shows `world`, if it is inside the window.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Option<Point> {
        world
            .checked_sub(self.top_left)
            .filter(|screen| self.tiles.contains(*screen))
    }

    /// Top-left pixel of a screen cell.
    #[must_use]
    pub const fn pixel_origin(&self, screen: Point) -> Point {
        Point::new(
            screen.x * self.tile_size.width,
            screen.y * self.tile_size.height,
        )
    }

    /// Every visible cell in row-major screen order.
    pub fn cells(&self) -> impl Iterator<Item = VisibleCell> + '_ {
        (0..self.tiles.height).flat_map(move |y| {
            (0..self.tiles.width).map(move |x| {
                let screen = Point::new(x, y);
                VisibleCell {
                    screen,
                    world: self.top_left + screen,
                    pixel_origin: self.pixel_origin(screen),
                }
            })
        })
    }
}

/// One cell of the window expressed in every coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleCell {
    /// Position in screen cells.
    pub screen: Point,
    /// Position on the map.
    pub world: Point,
    /// Top-left pixel of the cell's window in the frame.
    pub pixel_origin: Point,
}

/// Computes the window a camera looking at `center` shows.
///
/// `viewport` is measured in pixels, `map_size` in cells.
pub fn compute_window(
    tile_size: Size,
    viewport: Size,
    map_size: Size,
    center: Point,
) -> Result<Window, ViewportError> {
    if tile_size.width == 0 || tile_size.height == 0 {
        return Err(ViewportError::ZeroTileSize { tile_size });
    }

    let (left, columns) = axis(
        viewport.width / tile_size.width,
        map_size.width,
        center.x,
    );
    let (top, rows) = axis(
        viewport.height / tile_size.height,
        map_size.height,
        center.y,
    );

    Ok(Window {
        top_left: Point::new(left, top),
        tiles: Size::new(columns, rows),
        tile_size,
    })
}

/// Returns the first visible index and the number of visible cells on one axis.
fn axis(visible: usize, extent: usize, center: usize) -> (usize, usize) {
    if visible > extent {
        return (0, extent);
    }

    let offset = visible / 2;
    let upper = extent - offset - visible % 2;
    let clamped = center.clamp(offset, upper);
    (clamped - offset, visible)
}
