//! Cells of a map and the callbacks that give them behaviour.
//!
//! A [`Location`] decides whether it may be entered from a given side, how it
//! draws on each layer, and what runs when the character arrives or leaves.

use std::{fmt, sync::Arc};

use travels_core::{Direction, GridError, Layer, Pixel, Point, SubSpanMut};

use crate::{GameState, WorldError};

/// Side effect run when the character leaves or enters a cell.
///
/// Receives the cell's own position and the direction of travel.
pub type TransitionAction =
    Arc<dyn Fn(&mut GameState, Point, Direction) -> Result<(), WorldError> + Send + Sync>;

/// Passability rule evaluated with the side the cell is being entered from.
pub type EnterCheck = Arc<dyn Fn(&GameState, Point, Direction) -> bool + Send + Sync>;

/// Renders one pass of a cell into its tile-sized pixel window.
pub type TileDraw = Arc<
    dyn Fn(&mut SubSpanMut<'_, Pixel>, &GameState, Point, Layer) -> Result<(), GridError>
        + Send
        + Sync,
>;

/// Renders the character into its tile-sized pixel window.
pub type SpriteDraw = Arc<
    dyn Fn(&mut SubSpanMut<'_, Pixel>, &GameState, Point) -> Result<(), GridError> + Send + Sync,
>;

/// Single cell of a world map carrying up to four independent behaviours.
///
/// A missing passability rule means the cell can always be entered; the other
/// missing handlers do nothing.
#[derive(Clone, Default)]
pub struct Location {
    enter_action: Option<TransitionAction>,
    exit_action: Option<TransitionAction>,
    draw: Option<TileDraw>,
    can_enter: Option<EnterCheck>,
}

impl Location {
    /// Creates a location without any behaviour attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a location that refuses entry from every side.
    #[must_use]
    pub fn blocked() -> Self {
        Self::new().with_can_enter(|_, _, _| false)
    }

    /// Attaches the action run after the character arrives on the cell.
    #[must_use]
    pub fn with_enter_action(
        mut self,
        action: impl Fn(&mut GameState, Point, Direction) -> Result<(), WorldError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.enter_action = Some(Arc::new(action));
        self
    }

    /// Attaches the action run before the character leaves the cell.
    #[must_use]
    pub fn with_exit_action(
        mut self,
        action: impl Fn(&mut GameState, Point, Direction) -> Result<(), WorldError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.exit_action = Some(Arc::new(action));
        self
    }

    /// Attaches the per-layer renderer.
    #[must_use]
    pub fn with_draw(
        mut self,
        draw: impl Fn(&mut SubSpanMut<'_, Pixel>, &GameState, Point, Layer) -> Result<(), GridError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.draw = Some(Arc::new(draw));
        self
    }

    /// Attaches the passability rule.
    #[must_use]
    pub fn with_can_enter(
        mut self,
        check: impl Fn(&GameState, Point, Direction) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.can_enter = Some(Arc::new(check));
        self
    }

    /// Replaces the enter action while authoring a map.
    pub fn set_enter_action(&mut self, action: TransitionAction) {
        self.enter_action = Some(action);
    }

    /// Replaces the exit action while authoring a map.
    pub fn set_exit_action(&mut self, action: TransitionAction) {
        self.exit_action = Some(action);
    }

    /// Action run after arrival, if any.
    #[must_use]
    pub fn enter_action(&self) -> Option<&TransitionAction> {
        self.enter_action.as_ref()
    }

    /// Action run before departure, if any.
    #[must_use]
    pub fn exit_action(&self) -> Option<&TransitionAction> {
        self.exit_action.as_ref()
    }

    /// Evaluates the passability rule, defaulting to enterable.
    #[must_use]
    pub fn can_enter(&self, state: &GameState, position: Point, from: Direction) -> bool {
        self.can_enter
            .as_ref()
            .map_or(true, |check| check(state, position, from))
    }

    /// Renders one layer of the cell. Cells without a renderer draw nothing.
    pub fn draw(
        &self,
        pixels: &mut SubSpanMut<'_, Pixel>,
        state: &GameState,
        position: Point,
        layer: Layer,
    ) -> Result<(), GridError> {
        match &self.draw {
            Some(draw) => draw(pixels, state, position, layer),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("enter_action", &self.enter_action.is_some())
            .field("exit_action", &self.exit_action.is_some())
            .field("draw", &self.draw.is_some())
            .field("can_enter", &self.can_enter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travels_core::{Grid, Size};

    #[test]
    fn locations_without_a_rule_are_enterable_from_every_side() {
        let state = GameState::new(Size::new(1, 1));
        let location = Location::new();
        for direction in Direction::ALL {
            assert!(location.can_enter(&state, Point::new(0, 0), direction));
        }
    }

    #[test]
    fn directional_rules_see_the_entry_side() {
        let state = GameState::new(Size::new(1, 1));
        let location = Location::new().with_can_enter(|_, _, from| {
            matches!(from, Direction::South | Direction::East)
        });
        assert!(location.can_enter(&state, Point::new(0, 0), Direction::South));
        assert!(!location.can_enter(&state, Point::new(0, 0), Direction::West));
        assert!(!Location::blocked().can_enter(&state, Point::new(0, 0), Direction::North));
    }

    #[test]
    fn locations_without_a_renderer_leave_pixels_alone() {
        let state = GameState::new(Size::new(2, 2));
        let mut frame: Grid<Pixel> = Grid::from_fn(Size::new(2, 2), |_| Pixel::opaque(1, 2, 3));
        let mut tile = frame
            .span_mut(Point::new(0, 0), Size::new(2, 2))
            .expect("tile fits");
        Location::new()
            .draw(&mut tile, &state, Point::new(0, 0), Layer::Background)
            .expect("nothing to draw");
        assert_eq!(frame.at(Point::new(1, 1)), Ok(&Pixel::opaque(1, 2, 3)));
    }
}
