//! Named maps: a grid of locations plus registered positions.

use std::collections::BTreeMap;

use travels_core::{Direction, Grid, GridError, Point, Size};

use crate::{GameState, Location};

/// Grid of behaviour-bearing cells plus the names authored onto it.
#[derive(Clone, Debug)]
pub struct WorldMap {
    locations: Grid<Location>,
    named_positions: BTreeMap<String, Point>,
}

impl WorldMap {
    /// Creates a map of the provided size whose cells carry no behaviour.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            locations: Grid::new(size),
            named_positions: BTreeMap::new(),
        }
    }

    /// Extents of the map measured in cells.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.locations.size()
    }

    /// Every cell of the map.
    #[must_use]
    pub const fn locations(&self) -> &Grid<Location> {
        &self.locations
    }

    /// Every cell of the map for bulk authoring with the grid fill helpers.
    pub fn locations_mut(&mut self) -> &mut Grid<Location> {
        &mut self.locations
    }

    /// Retrieves the cell at the provided point.
    pub fn location(&self, point: Point) -> Result<&Location, GridError> {
        self.locations.at(point)
    }

    /// Retrieves the cell at the provided point for authoring.
    pub fn location_mut(&mut self, point: Point) -> Result<&mut Location, GridError> {
        self.locations.at_mut(point)
    }

    /// Replaces the cell at the provided point.
    pub fn set_location(&mut self, point: Point, location: Location) -> Result<(), GridError> {
        self.locations.set(point, location)
    }

    /// Registers a human readable name for a cell of the map.
    pub fn name_position(&mut self, name: impl Into<String>, point: Point) -> Result<(), GridError> {
        if !self.size().contains(point) {
            return Err(GridError::OutOfRange {
                point,
                size: self.size(),
            });
        }
        let _ = self.named_positions.insert(name.into(), point);
        Ok(())
    }

    /// Resolves a named position.
    #[must_use]
    pub fn named_position(&self, name: &str) -> Option<Point> {
        self.named_positions.get(name).copied()
    }

    /// Iterates over every named position in name order.
    pub fn named_positions(&self) -> impl Iterator<Item = (&str, Point)> {
        self.named_positions
            .iter()
            .map(|(name, point)| (name.as_str(), *point))
    }

    /// Reports whether the cell at `point` accepts a character arriving from `from`.
    pub fn can_enter_from(
        &self,
        state: &GameState,
        point: Point,
        from: Direction,
    ) -> Result<bool, GridError> {
        Ok(self.location(point)?.can_enter(state, point, from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_positions_must_lie_on_the_map() {
        let mut map = WorldMap::new(Size::new(3, 3));
        map.name_position("door", Point::new(2, 2))
            .expect("door lies on the map");
        assert_eq!(map.named_position("door"), Some(Point::new(2, 2)));
        assert!(map.name_position("outside", Point::new(3, 0)).is_err());
        assert_eq!(map.named_position("outside"), None);
    }

    #[test]
    fn can_enter_from_defaults_to_permissive_and_checks_bounds() {
        let state = GameState::new(Size::new(1, 1));
        let mut map = WorldMap::new(Size::new(2, 1));
        map.set_location(Point::new(1, 0), Location::blocked())
            .expect("in bounds");

        assert_eq!(
            map.can_enter_from(&state, Point::new(0, 0), Direction::West),
            Ok(true)
        );
        assert_eq!(
            map.can_enter_from(&state, Point::new(1, 0), Direction::West),
            Ok(false)
        );
        assert!(map
            .can_enter_from(&state, Point::new(2, 0), Direction::West)
            .is_err());
    }
}
