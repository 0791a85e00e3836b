#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that assembles the built-in Travels lesson.
//!
//! The lesson is a small garden surrounded by water with a house to the south
//! west. Pulling the lever in the house drains the sluice on the east side of
//! the garden, which is the only way into the secret room.

mod ascii;
mod lesson;

use tracing::info;
use travels_core::{Destination, Direction, Size};
use travels_system_session::Session;
use travels_world::{GameState, WorldError};

pub use ascii::AsciiMapLoader;

/// Name of the garden map the lesson starts on.
pub const MAIN_MAP: &str = "main";
/// Name of the house map behind the garden door.
pub const HOUSE_MAP: &str = "house";
/// Display variable describing what the player should do next.
pub const TASK: &str = "Task";
/// Display variable recording how many distinct colours had been drawn.
pub const COLOURS_SEEN: &str = "Colours seen";
/// Flag raised by the lever that drains the sluice.
pub const SLUICE_OPEN: &str = "sluice_open";

/// Prepares the game state for a new play session.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Builds the lesson with every map registered and the character at the start.
    pub fn lesson(&self, tile_size: Size) -> Result<GameState, WorldError> {
        let mut state = GameState::new(tile_size);
        state.add_map(MAIN_MAP, lesson::main_map()?);
        state.add_map(HOUSE_MAP, lesson::house_map()?);

        state.set_character_draw(lesson::draw_player);

        state.set_variable(TASK, "Find the secret room");
        state.add_display_variable(TASK);
        let start = state.teleport(
            MAIN_MAP,
            &Destination::from("start"),
            Some(Direction::South),
        )?;
        state.set_popup_message(lesson::WELCOME);

        info!(map = MAIN_MAP, %start, "lesson ready");
        Ok(state)
    }

    /// Wraps the lesson in a session that can load ASCII maps.
    pub fn session(&self, tile_size: Size) -> Result<Session, WorldError> {
        Ok(Session::new(self.lesson(tile_size)?).with_loader(AsciiMapLoader))
    }
}
