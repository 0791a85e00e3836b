#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Travels.
//!
//! The [`GameState`] owns every [`WorldMap`], the variable table, the
//! character and the menu/message surface that authored actions mutate. All
//! player-driven mutation flows through [`apply`], which reports what happened
//! as [`Event`]s; read-only snapshots for adapters live in [`query`].

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tracing::debug;
use travels_core::{
    Command, Destination, Direction, Event, GridError, Pixel, Point, Size, SubSpanMut,
};

mod error;
mod location;
mod map;
mod menu;
mod transition;
mod variable;

pub use error::WorldError;
pub use location::{EnterCheck, Location, SpriteDraw, TileDraw, TransitionAction};
pub use map::WorldMap;
pub use menu::{check_flag, exit_menu, set_flag, Menu, MenuAction, MenuItem};
pub use variable::{variable, Gate, Variable, VariableRef};

/// The player's avatar: where it stands, which way it faces and how it looks.
#[derive(Clone)]
pub struct Character {
    position: Point,
    facing: Direction,
    draw: Option<SpriteDraw>,
}

impl Character {
    /// Cell the character occupies on the current map.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Direction of the last completed move or teleport facing.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Renders the character into its tile window. Characters without a sprite draw nothing.
    pub fn draw(
        &self,
        pixels: &mut SubSpanMut<'_, Pixel>,
        state: &GameState,
    ) -> Result<(), GridError> {
        match &self.draw {
            Some(draw) => draw(pixels, state, self.position),
            None => Ok(()),
        }
    }
}

impl Default for Character {
    fn default() -> Self {
        Self {
            position: Point::default(),
            facing: Direction::South,
            draw: None,
        }
    }
}

impl std::fmt::Debug for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Character")
            .field("position", &self.position)
            .field("facing", &self.facing)
            .field("draw", &self.draw.is_some())
            .finish()
    }
}

/// Complete mutable state of a play session.
#[derive(Debug)]
pub struct GameState {
    maps: BTreeMap<String, WorldMap>,
    variables: BTreeMap<String, Variable>,
    display_variables: Vec<String>,
    current_map: String,
    character: Character,
    menu: Option<Menu>,
    menu_is_new: bool,
    last_message: String,
    popup_message: String,
    exit_requested: bool,
    clock: Duration,
    tile_size: Size,
    colors_seen: Mutex<BTreeSet<Pixel>>,
}

impl GameState {
    /// Creates an empty state whose maps will be drawn with the provided tile size.
    #[must_use]
    pub fn new(tile_size: Size) -> Self {
        Self {
            maps: BTreeMap::new(),
            variables: BTreeMap::new(),
            display_variables: Vec::new(),
            current_map: String::new(),
            character: Character::default(),
            menu: None,
            menu_is_new: false,
            last_message: String::new(),
            popup_message: String::new(),
            exit_requested: false,
            clock: Duration::ZERO,
            tile_size,
            colors_seen: Mutex::new(BTreeSet::new()),
        }
    }

    /// Registers a map under `name`, replacing any previous map of that name.
    pub fn add_map(&mut self, name: impl Into<String>, map: WorldMap) {
        let name = name.into();
        debug!(map = %name, size = %map.size(), "map registered");
        let _ = self.maps.insert(name, map);
    }

    /// Looks up a registered map.
    #[must_use]
    pub fn map(&self, name: &str) -> Option<&WorldMap> {
        self.maps.get(name)
    }

    /// Looks up a registered map for authoring.
    #[must_use]
    pub fn map_mut(&mut self, name: &str) -> Option<&mut WorldMap> {
        self.maps.get_mut(name)
    }

    /// Names of every registered map.
    pub fn map_names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }

    /// Name of the map the character is on.
    #[must_use]
    pub fn current_map_name(&self) -> &str {
        &self.current_map
    }

    /// The map the character is on.
    pub fn current_map(&self) -> Result<&WorldMap, WorldError> {
        self.maps
            .get(&self.current_map)
            .ok_or_else(|| WorldError::MapNotFound(self.current_map.clone()))
    }

    /// The player's avatar.
    #[must_use]
    pub const fn character(&self) -> &Character {
        &self.character
    }

    /// Installs the character sprite.
    pub fn set_character_draw(
        &mut self,
        draw: impl Fn(&mut SubSpanMut<'_, Pixel>, &GameState, Point) -> Result<(), GridError>
            + Send
            + Sync
            + 'static,
    ) {
        self.character.draw = Some(Arc::new(draw));
    }

    /// Places the character on `map` without consulting passability or running actions.
    ///
    /// Returns the cell the character landed on.
    pub fn teleport(
        &mut self,
        map: &str,
        destination: &Destination,
        facing: Option<Direction>,
    ) -> Result<Point, WorldError> {
        let target = self
            .maps
            .get(map)
            .ok_or_else(|| WorldError::MapNotFound(map.to_owned()))?;
        let position = match destination {
            Destination::Named(name) => {
                target
                    .named_position(name)
                    .ok_or_else(|| WorldError::LocationNotFound {
                        map: map.to_owned(),
                        location: name.clone(),
                    })?
            }
            Destination::Point(point) => {
                if !target.size().contains(*point) {
                    return Err(GridError::OutOfRange {
                        point: *point,
                        size: target.size(),
                    }
                    .into());
                }
                *point
            }
        };

        self.current_map = map.to_owned();
        self.character.position = position;
        if let Some(facing) = facing {
            self.character.facing = facing;
        }
        debug!(map, %position, "character teleported");
        Ok(position)
    }

    /// Current value of a variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Stores a variable, replacing any previous value.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Variable>) {
        let _ = self.variables.insert(name.into(), value.into());
    }

    /// Every variable in name order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Names of the variables the status panel shows, in display order.
    #[must_use]
    pub fn display_variables(&self) -> &[String] {
        &self.display_variables
    }

    /// Adds a variable to the status panel if it is not shown already.
    pub fn add_display_variable(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.display_variables.contains(&name) {
            self.display_variables.push(name);
        }
    }

    /// The menu currently showing, if any.
    #[must_use]
    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    /// Shows `menu`, replacing any active one, and marks it as newly presented.
    pub fn present_menu(&mut self, menu: Menu) {
        self.menu = Some(menu);
        self.menu_is_new = true;
    }

    /// Removes the active menu.
    pub fn clear_menu(&mut self) {
        self.menu = None;
        self.menu_is_new = false;
    }

    /// Reports whether the active menu was (re)presented since it was last acknowledged.
    #[must_use]
    pub const fn menu_is_new(&self) -> bool {
        self.menu_is_new
    }

    /// Marks the active menu as seen, returning whether it was new.
    pub fn acknowledge_menu(&mut self) -> bool {
        std::mem::replace(&mut self.menu_is_new, false)
    }

    /// Status line text.
    #[must_use]
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Replaces the status line text.
    pub fn set_last_message(&mut self, message: impl Into<String>) {
        self.last_message = message.into();
    }

    /// Popup text awaiting dismissal; empty when there is none.
    #[must_use]
    pub fn popup_message(&self) -> &str {
        &self.popup_message
    }

    /// Replaces the popup text.
    pub fn set_popup_message(&mut self, message: impl Into<String>) {
        self.popup_message = message.into();
    }

    /// Discards the popup, returning whether one was showing.
    pub fn dismiss_popup(&mut self) -> bool {
        !std::mem::take(&mut self.popup_message).is_empty()
    }

    /// Asks the session to end.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Whether an action asked the session to end.
    #[must_use]
    pub const fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Game time accumulated since the session started.
    #[must_use]
    pub const fn clock(&self) -> Duration {
        self.clock
    }

    /// Pixel extents of one map cell.
    #[must_use]
    pub const fn tile_size(&self) -> Size {
        self.tile_size
    }

    /// Notes a colour produced while drawing.
    ///
    /// Draw callbacks only receive `&GameState`, so the ledger is interior mutable.
    pub fn record_color(&self, color: Pixel) {
        let mut seen = self
            .colors_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _ = seen.insert(color);
    }

    /// Number of distinct colours recorded so far.
    #[must_use]
    pub fn distinct_colors(&self) -> usize {
        self.colors_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Applies the provided command to the game state.
///
/// Errors raised by authored actions are returned after any events that were
/// already produced by the command.
pub fn apply(
    state: &mut GameState,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::Step { direction } => transition::step(state, direction, out_events),
        Command::Teleport {
            map,
            destination,
            facing,
        } => {
            let to = state.teleport(&map, &destination, facing)?;
            out_events.push(Event::Teleported { map, to });
            Ok(())
        }
        Command::SelectMenuItem { index } => {
            let item = state
                .menu()
                .and_then(|menu| menu.visible_items(state).get(index).map(|item| (*item).clone()));
            let Some(item) = item else {
                debug!(index, "ignoring selection outside the visible menu");
                return Ok(());
            };
            let label = item.label().to_owned();
            item.run(state)?;
            out_events.push(Event::MenuItemSelected { label });
            Ok(())
        }
        Command::ClearMenu => {
            if state.menu.is_some() {
                state.clear_menu();
                out_events.push(Event::MenuCleared);
            }
            Ok(())
        }
        Command::DismissPopup => {
            if state.dismiss_popup() {
                out_events.push(Event::PopupDismissed);
            }
            Ok(())
        }
        Command::AdvanceClock { elapsed } => {
            state.clock = state.clock.saturating_add(elapsed);
            out_events.push(Event::ClockAdvanced { elapsed });
            Ok(())
        }
    }
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use std::time::Duration;

    use travels_core::{Direction, Point};

    use super::{GameState, Variable};

    /// Captures the values shown by the status panel.
    #[must_use]
    pub fn status(state: &GameState) -> StatusView {
        StatusView {
            map: state.current_map_name().to_owned(),
            position: state.character().position(),
            facing: state.character().facing(),
            clock: state.clock(),
            display_variables: state
                .display_variables()
                .iter()
                .map(|name| (name.clone(), state.variable(name).cloned()))
                .collect(),
            last_message: state.last_message().to_owned(),
        }
    }

    /// Captures the labels of the visible menu items, if a menu is showing.
    #[must_use]
    pub fn menu_view(state: &GameState) -> Option<MenuView> {
        state.menu().map(|menu| MenuView {
            labels: menu
                .visible_items(state)
                .iter()
                .map(|item| item.label().to_owned())
                .collect(),
            fresh: state.menu_is_new(),
        })
    }

    /// Read-only snapshot of the status panel contents.
    #[derive(Clone, Debug, PartialEq)]
    pub struct StatusView {
        /// Name of the current map.
        pub map: String,
        /// Cell the character occupies.
        pub position: Point,
        /// Direction the character faces.
        pub facing: Direction,
        /// Accumulated game time.
        pub clock: Duration,
        /// Display variables with their current values, unset ones included.
        pub display_variables: Vec<(String, Option<Variable>)>,
        /// Status line text.
        pub last_message: String,
    }

    /// Read-only snapshot of the active menu.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct MenuView {
        /// Labels of the items visible right now, in display order.
        pub labels: Vec<String>,
        /// Whether the menu was (re)presented since it was last acknowledged.
        pub fresh: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_room() -> GameState {
        let mut state = GameState::new(Size::new(8, 8));
        state.add_map("room", WorldMap::new(Size::new(2, 2)));
        let _ = state
            .teleport("room", &Destination::Point(Point::new(0, 0)), None)
            .expect("room exists");
        state
    }

    #[test]
    fn advancing_the_clock_accumulates_time() {
        let mut state = single_room();
        let mut events = Vec::new();
        for _ in 0..3 {
            apply(
                &mut state,
                Command::AdvanceClock {
                    elapsed: Duration::from_millis(250),
                },
                &mut events,
            )
            .expect("clock advance cannot fail");
        }
        assert_eq!(state.clock(), Duration::from_millis(750));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn dismissing_reports_only_a_showing_popup() {
        let mut state = single_room();
        let mut events = Vec::new();
        apply(&mut state, Command::DismissPopup, &mut events).expect("dismiss");
        assert!(events.is_empty(), "nothing to dismiss yet");

        state.set_popup_message("Welcome");
        apply(&mut state, Command::DismissPopup, &mut events).expect("dismiss");
        assert_eq!(events, vec![Event::PopupDismissed]);
        assert_eq!(state.popup_message(), "");
    }

    #[test]
    fn acknowledging_a_menu_clears_its_freshness_once() {
        let mut state = single_room();
        state.present_menu(Menu::new(vec![exit_menu()]));
        assert!(state.menu_is_new());
        assert!(state.acknowledge_menu());
        assert!(!state.acknowledge_menu());
        assert!(state.menu().is_some());
    }

    #[test]
    fn colour_ledger_counts_each_colour_once() {
        let state = single_room();
        state.record_color(Pixel::opaque(1, 2, 3));
        state.record_color(Pixel::opaque(1, 2, 3));
        state.record_color(Pixel::opaque(3, 2, 1));
        assert_eq!(state.distinct_colors(), 2);
    }

    #[test]
    fn status_lists_display_variables_in_order_even_when_unset() {
        let mut state = single_room();
        state.add_display_variable("Task");
        state.add_display_variable("Score");
        state.add_display_variable("Task");
        state.set_variable("Task", "Find the secret room");

        let status = query::status(&state);
        assert_eq!(status.map, "room");
        assert_eq!(
            status.display_variables,
            vec![
                (
                    "Task".to_owned(),
                    Some(Variable::from("Find the secret room"))
                ),
                ("Score".to_owned(), None),
            ]
        );
    }
}
