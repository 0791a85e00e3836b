#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Step driver for a play session.
//!
//! A [`Session`] owns the [`GameState`], buffers player [`Input`]s and turns
//! them into world commands one step at a time. Whatever overlay is showing
//! decides where an input goes: the log first, then a popup, then a menu, and
//! only then the character. A failure while handling one input is shown to the
//! player and ends the step instead of ending the session.

use std::{
    any::Any,
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::Duration,
};

use thiserror::Error;
use tracing::{error, info, trace};
use travels_core::{Command, Destination, Direction, Event, Grid, Pixel, Point};
use travels_system_draw::{draw_frame, DrawError};
use travels_world::{
    self as world, GameState, Menu, MenuItem, TransitionAction, Variable, WorldError, WorldMap,
};

/// Discrete player intent fed into a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Directional key.
    Move(Direction),
    /// Accept the highlighted menu item or dismiss an overlay.
    Confirm,
    /// Dismiss an overlay, or a menu that has no visible items.
    Cancel,
    /// Open or close the event log.
    ToggleLog,
    /// Anything the session does not understand.
    Unrecognized,
}

/// Builds maps from an authoring format.
pub trait MapLoader {
    /// Parses `source` into a fully populated map.
    fn load(&self, source: &str) -> anyhow::Result<WorldMap>;
}

/// Failures raised by the host-facing session API.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The game state rejected the request.
    #[error(transparent)]
    World(#[from] WorldError),
    /// A map was requested but no loader was installed.
    #[error("no map loader is configured")]
    MissingLoader,
    /// The loader could not build the map.
    #[error("failed to load map `{name}`: {reason}")]
    Load {
        /// Name the map would have been registered under.
        name: String,
        /// Loader diagnostic.
        reason: String,
    },
}

/// Outcome of a single [`Session::step`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Number of inputs taken from the queue, including a failed one.
    pub processed: usize,
    /// Events reported by the game state in order.
    pub events: Vec<Event>,
    /// Message of the failure that ended the step early, if any.
    pub failure: Option<String>,
}

/// Owns the game state and drives it from queued inputs.
pub struct Session {
    state: GameState,
    inputs: VecDeque<Input>,
    menu_cursor: usize,
    show_log: bool,
    loader: Option<Box<dyn MapLoader>>,
}

impl Session {
    /// Starts a session over a fully built game state.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            inputs: VecDeque::new(),
            menu_cursor: 0,
            show_log: false,
            loader: None,
        }
    }

    /// Installs the loader used by [`Session::load_map`].
    #[must_use]
    pub fn with_loader(mut self, loader: impl MapLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Read-only view of the game state between steps.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Queues an input for the next step.
    pub fn push_input(&mut self, input: Input) {
        self.inputs.push_back(input);
    }

    /// Number of inputs waiting for a step.
    #[must_use]
    pub fn pending_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Highlighted row among the visible menu items.
    #[must_use]
    pub const fn menu_cursor(&self) -> usize {
        self.menu_cursor
    }

    /// Whether the event log overlay is open.
    #[must_use]
    pub const fn show_log(&self) -> bool {
        self.show_log
    }

    /// Whether an action asked the session to end.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.state.exit_requested()
    }

    /// Advances the clock by `elapsed` and handles queued inputs in arrival order.
    ///
    /// Handling stops after the first input whose handling fails or panics; its
    /// message becomes the popup and later inputs stay queued. Handling also
    /// stops once an exit has been requested.
    pub fn step(&mut self, elapsed: Duration) -> StepReport {
        let mut report = StepReport::default();
        if let Err(error) = world::apply(
            &mut self.state,
            Command::AdvanceClock { elapsed },
            &mut report.events,
        ) {
            self.contain(error.to_string(), None, &mut report);
            return report;
        }

        while !self.state.exit_requested() {
            let Some(input) = self.inputs.pop_front() else {
                break;
            };
            report.processed += 1;

            let events = &mut report.events;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.route(input, events)));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(error)) => Some(error.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };
            if let Some(message) = failure {
                self.contain(message, Some(input), &mut report);
                break;
            }
        }

        report
    }

    /// Draws the current state into `frame`.
    pub fn render(&self, frame: &mut Grid<Pixel>) -> Result<(), DrawError> {
        draw_frame(frame, &self.state)
    }

    /// Builds a map with the installed loader and registers it under `name`.
    pub fn load_map(&mut self, name: &str, source: &str) -> Result<(), SessionError> {
        let loader = self.loader.as_ref().ok_or(SessionError::MissingLoader)?;
        let map = loader.load(source).map_err(|error| SessionError::Load {
            name: name.to_owned(),
            reason: format!("{error:#}"),
        })?;
        info!(map = name, size = %map.size(), "map loaded");
        self.state.add_map(name, map);
        Ok(())
    }

    /// Places the character on `map` at a named position or literal point.
    pub fn teleport(
        &mut self,
        map: &str,
        destination: impl Into<Destination>,
        facing: Option<Direction>,
    ) -> Result<Point, SessionError> {
        Ok(self.state.teleport(map, &destination.into(), facing)?)
    }

    /// Runs `action` whenever the character enters the named position on `map`.
    pub fn set_location_action(
        &mut self,
        map: &str,
        location: &str,
        action: impl Fn(&mut GameState) -> Result<(), WorldError> + Send + Sync + 'static,
    ) -> Result<(), SessionError> {
        let target = self
            .state
            .map_mut(map)
            .ok_or_else(|| WorldError::MapNotFound(map.to_owned()))?;
        let point = target
            .named_position(location)
            .ok_or_else(|| WorldError::LocationNotFound {
                map: map.to_owned(),
                location: location.to_owned(),
            })?;
        let enter: TransitionAction =
            Arc::new(move |state: &mut GameState, _: Point, _: Direction| action(state));
        target
            .location_mut(point)
            .map_err(WorldError::from)?
            .set_enter_action(enter);
        Ok(())
    }

    /// Shows a menu built from `items`.
    pub fn present_menu(&mut self, items: Vec<MenuItem>) {
        self.state.present_menu(Menu::new(items));
    }

    /// Current value of a variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.state.variable(name)
    }

    /// Stores a variable.
    pub fn set_variable(&mut self, name: &str, value: impl Into<Variable>) {
        self.state.set_variable(name, value);
    }

    fn route(&mut self, input: Input, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        trace!(?input, "routing input");
        if self.state.acknowledge_menu() {
            self.menu_cursor = 0;
        }

        if self.show_log {
            if matches!(input, Input::Confirm | Input::Cancel | Input::ToggleLog) {
                self.show_log = false;
            }
            return Ok(());
        }
        if input == Input::ToggleLog {
            self.show_log = true;
            return Ok(());
        }

        if !self.state.popup_message().is_empty() {
            if matches!(input, Input::Confirm | Input::Cancel) {
                world::apply(&mut self.state, Command::DismissPopup, out_events)?;
            }
            return Ok(());
        }

        let visible = self
            .state
            .menu()
            .map(|menu| menu.visible_items(&self.state).len());
        if let Some(visible) = visible {
            self.menu_cursor = self.menu_cursor.min(visible.saturating_sub(1));
            match input {
                Input::Move(Direction::North) => {
                    self.menu_cursor = self.menu_cursor.saturating_sub(1);
                }
                Input::Move(Direction::South) if self.menu_cursor + 1 < visible => {
                    self.menu_cursor += 1;
                }
                Input::Confirm => world::apply(
                    &mut self.state,
                    Command::SelectMenuItem {
                        index: self.menu_cursor,
                    },
                    out_events,
                )?,
                Input::Cancel if visible == 0 => {
                    world::apply(&mut self.state, Command::ClearMenu, out_events)?;
                }
                _ => {}
            }
            return Ok(());
        }

        match input {
            Input::Move(direction) => {
                world::apply(&mut self.state, Command::Step { direction }, out_events)
            }
            Input::Confirm | Input::Cancel | Input::ToggleLog | Input::Unrecognized => Ok(()),
        }
    }

    fn contain(&mut self, message: String, input: Option<Input>, report: &mut StepReport) {
        error!(%message, ?input, "step failed");
        self.state.set_popup_message(message.clone());
        report.failure = Some(message);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("inputs", &self.inputs)
            .field("menu_cursor", &self.menu_cursor)
            .field("show_log", &self.show_log)
            .field("loader", &self.loader.is_some())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "an action panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_messages_are_recovered_from_common_payloads() {
        let text: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(text.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "an action panicked");
    }
}
