#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core value types shared across the Travels engine.
//!
//! This crate defines the coordinate vocabulary ([`Point`], [`Size`],
//! [`Direction`], [`Layer`]), the bounds-checked dense [`Grid`] together with
//! its borrowing [`SubSpan`] windows, and the [`Color`] compositor used to
//! blend layered tile output. It also defines the [`Command`] and [`Event`]
//! vocabulary through which systems talk to the world. Nothing in here knows
//! how maps, menus or players behave; those live in the world crate.

use std::{
    fmt,
    ops::{Add, Sub},
    time::Duration,
};

use serde::{Deserialize, Serialize};

mod color;
mod grid;

pub use color::{color_cast, copy, overlay, Channel, Color, Pixel};
pub use grid::{
    fill, fill_border, fill_line, Grid, GridError, GridView, GridViewMut, SubSpan, SubSpanMut,
};

/// Location of a single cell or pixel expressed as unsigned coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    /// Zero-based column index.
    pub x: usize,
    /// Zero-based row index.
    pub y: usize,
}

impl Point {
    /// Creates a new point from column and row indices.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring point one cell away in the provided direction.
    ///
    /// Yields `None` when the step would leave the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::North => self.y.checked_sub(1).map(|y| Self::new(self.x, y)),
            Direction::South => self.y.checked_add(1).map(|y| Self::new(self.x, y)),
            Direction::East => self.x.checked_add(1).map(|x| Self::new(x, self.y)),
            Direction::West => self.x.checked_sub(1).map(|x| Self::new(x, self.y)),
        }
    }

    /// Component-wise subtraction that reports underflow instead of panicking.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.x.checked_sub(other.x)?,
            self.y.checked_sub(other.y)?,
        ))
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.x, self.y)
    }
}

/// Unsigned extents of a grid, window or tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Size {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of cells covered by the extents.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    /// Reports whether the point lies inside an area of this size anchored at the origin.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Cardinal directions used for movement and passability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing row indices.
    South,
    /// Toward increasing column indices.
    East,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// Draw pass a cell is asked to render.
///
/// Every visible cell is drawn twice per frame so that the character, drawn
/// in between, ends up above ground tiles but below overhanging decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Ground tiles drawn before the character.
    Background,
    /// Decoration drawn after the character.
    Foreground,
}

/// Target of a teleport expressed either by name or by coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// Named position registered on the destination map.
    Named(String),
    /// Literal cell on the destination map.
    Point(Point),
}

impl From<Point> for Destination {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

impl From<&str> for Destination {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Named(name) => f.write_str(name),
            Destination::Point(point) => write!(f, "{point}"),
        }
    }
}

/// Commands that express all permissible game state mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Attempts to move the character one cell.
    Step {
        /// Direction of travel for the attempted move.
        direction: Direction,
    },
    /// Places the character on a map without consulting passability.
    Teleport {
        /// Name of the map that becomes current.
        map: String,
        /// Cell on that map the character lands on.
        destination: Destination,
        /// Facing to assume after landing, if it should change.
        facing: Option<Direction>,
    },
    /// Runs the action of a currently visible menu item.
    SelectMenuItem {
        /// Position of the item among the visible items.
        index: usize,
    },
    /// Removes the active menu.
    ClearMenu,
    /// Discards the pending popup message.
    DismissPopup,
    /// Advances the game clock.
    AdvanceClock {
        /// Duration that elapsed since the previous advance.
        elapsed: Duration,
    },
}

/// Events reported after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The character completed a move between two cells.
    CharacterMoved {
        /// Cell the character left.
        from: Point,
        /// Cell the character now occupies.
        to: Point,
        /// Direction the character travelled.
        direction: Direction,
    },
    /// A move was refused because the destination could not be entered.
    MoveRejected {
        /// Cell the character remains on.
        at: Point,
        /// Direction of the refused move.
        direction: Direction,
    },
    /// The character was placed directly on a map.
    Teleported {
        /// Map that is now current.
        map: String,
        /// Cell the character now occupies.
        to: Point,
    },
    /// The game clock advanced.
    ClockAdvanced {
        /// Duration added to the clock.
        elapsed: Duration,
    },
    /// A menu item's action ran.
    MenuItemSelected {
        /// Label of the selected item.
        label: String,
    },
    /// The active menu was removed.
    MenuCleared,
    /// The pending popup message was discarded.
    PopupDismissed,
}

#[cfg(test)]
mod tests {
    use super::{Destination, Direction, Point, Size};

    #[test]
    fn step_moves_one_cell_in_each_direction() {
        let origin = Point::new(3, 3);
        assert_eq!(origin.step(Direction::North), Some(Point::new(3, 2)));
        assert_eq!(origin.step(Direction::South), Some(Point::new(3, 4)));
        assert_eq!(origin.step(Direction::East), Some(Point::new(4, 3)));
        assert_eq!(origin.step(Direction::West), Some(Point::new(2, 3)));
    }

    #[test]
    fn step_off_the_top_left_edge_yields_none() {
        assert_eq!(Point::new(0, 5).step(Direction::West), None);
        assert_eq!(Point::new(5, 0).step(Direction::North), None);
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn points_order_row_major_by_x_then_y() {
        assert!(Point::new(0, 9) < Point::new(1, 0));
        assert!(Point::new(1, 0) < Point::new(1, 1));
    }

    #[test]
    fn point_arithmetic_is_component_wise() {
        assert_eq!(Point::new(2, 3) + Point::new(4, 5), Point::new(6, 8));
        assert_eq!(Point::new(6, 8) - Point::new(4, 5), Point::new(2, 3));
        assert_eq!(Point::new(1, 8).checked_sub(Point::new(2, 0)), None);
    }

    #[test]
    fn size_contains_only_points_below_both_extents() {
        let size = Size::new(4, 2);
        assert!(size.contains(Point::new(3, 1)));
        assert!(!size.contains(Point::new(4, 0)));
        assert!(!size.contains(Point::new(0, 2)));
        assert_eq!(size.area(), 8);
    }

    #[test]
    fn sizes_deserialize_from_toml_tables() {
        let size: Size = toml::from_str("width = 80\nheight = 56\n").expect("valid size table");
        assert_eq!(size, Size::new(80, 56));
    }

    #[test]
    fn destinations_display_their_name_or_coordinates() {
        assert_eq!(Destination::from("spawn").to_string(), "spawn");
        assert_eq!(Destination::from(Point::new(2, 7)).to_string(), "{2,7}");
    }
}
