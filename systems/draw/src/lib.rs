#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame composition for the current map.
//!
//! Every visible cell is drawn twice: once for the background pass before the
//! character and once for the foreground pass after it. Cells own their
//! compositing; the dispatcher only hands each of them a tile-sized window.

use thiserror::Error;
use tracing::debug;
use travels_core::{Grid, GridError, Layer, Pixel};
use travels_system_viewport::{compute_window, ViewportError, Window};
use travels_world::{GameState, WorldMap};

/// Failures raised while drawing a frame.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    /// A draw callback addressed a pixel outside its window.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The camera window could not be computed.
    #[error(transparent)]
    Viewport(#[from] ViewportError),
}

/// Redraws `frame` from scratch for the current state.
///
/// The frame is cleared to transparent first and stays blank when the current
/// map does not exist.
pub fn draw_frame(frame: &mut Grid<Pixel>, state: &GameState) -> Result<(), DrawError> {
    frame.clear();

    let Ok(map) = state.current_map() else {
        debug!(map = state.current_map_name(), "no current map to draw");
        return Ok(());
    };

    let character = state.character();
    let window = compute_window(
        state.tile_size(),
        frame.size(),
        map.size(),
        character.position(),
    )?;

    draw_layer(frame, &window, map, state, Layer::Background)?;
    if let Some(screen) = window.world_to_screen(character.position()) {
        let mut tile = frame.span_mut(window.pixel_origin(screen), window.tile_size())?;
        character.draw(&mut tile, state)?;
    }
    draw_layer(frame, &window, map, state, Layer::Foreground)?;

    Ok(())
}

fn draw_layer(
    frame: &mut Grid<Pixel>,
    window: &Window,
    map: &WorldMap,
    state: &GameState,
    layer: Layer,
) -> Result<(), DrawError> {
    for cell in window.cells() {
        let mut tile = frame.span_mut(cell.pixel_origin, window.tile_size())?;
        map.location(cell.world)?
            .draw(&mut tile, state, cell.world, layer)?;
    }
    Ok(())
}
