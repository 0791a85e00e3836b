use anyhow::{bail, Context};
use travels_core::{Point, Size};
use travels_system_session::MapLoader;
use travels_world::{Location, WorldMap};

use crate::lesson::{solid, wall, FLOOR, HOUSE_WALL, WATER};

/// Builds maps from rows of characters.
///
/// `.` is open floor, `#` a wall and `~` water. Any ASCII letter is open floor
/// whose position is registered under that letter. Blank lines around the map
/// are ignored; every remaining row must have the same width.
#[derive(Clone, Copy, Debug, Default)]
pub struct AsciiMapLoader;

impl MapLoader for AsciiMapLoader {
    fn load(&self, source: &str) -> anyhow::Result<WorldMap> {
        let rows: Vec<&str> = source
            .trim_matches('\n')
            .lines()
            .map(str::trim_end)
            .collect();
        let Some(width) = rows.first().map(|row| row.chars().count()) else {
            bail!("map source is empty");
        };
        if width == 0 {
            bail!("map source is empty");
        }

        let mut map = WorldMap::new(Size::new(width, rows.len()));
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                bail!("row {} is {found} cells wide, expected {width}", y + 1);
            }
            for (x, cell) in row.chars().enumerate() {
                let point = Point::new(x, y);
                map.set_location(point, location_for(cell, point)?)?;
                if cell.is_ascii_alphabetic() {
                    let name = cell.to_string();
                    if map.named_position(&name).is_some() {
                        bail!("position `{name}` is declared twice");
                    }
                    map.name_position(name, point)
                        .with_context(|| format!("naming cell at row {}", y + 1))?;
                }
            }
        }
        Ok(map)
    }
}

fn location_for(cell: char, point: Point) -> anyhow::Result<Location> {
    Ok(match cell {
        '.' => solid(FLOOR),
        '#' => wall(HOUSE_WALL),
        '~' => wall(WATER),
        letter if letter.is_ascii_alphabetic() => solid(FLOOR),
        other => bail!(
            "unknown map character `{other}` at row {}, column {}",
            point.y + 1,
            point.x + 1
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use travels_core::Direction;
    use travels_world::GameState;

    #[test]
    fn letters_become_named_floor_cells() {
        let map = AsciiMapLoader
            .load("\n#####\n#a.b#\n#####\n")
            .expect("well formed map");

        assert_eq!(map.size(), Size::new(5, 3));
        assert_eq!(map.named_position("a"), Some(Point::new(1, 1)));
        assert_eq!(map.named_position("b"), Some(Point::new(3, 1)));

        let state = GameState::new(Size::new(1, 1));
        assert_eq!(
            map.can_enter_from(&state, Point::new(2, 1), Direction::West),
            Ok(true)
        );
        assert_eq!(
            map.can_enter_from(&state, Point::new(0, 1), Direction::East),
            Ok(false)
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = AsciiMapLoader
            .load("...\n..\n")
            .expect_err("second row is short");
        assert_eq!(error.to_string(), "row 2 is 2 cells wide, expected 3");
    }

    #[test]
    fn unknown_characters_report_their_position() {
        let error = AsciiMapLoader.load("..\n.?\n").expect_err("`?` is unknown");
        assert_eq!(
            error.to_string(),
            "unknown map character `?` at row 2, column 2"
        );
    }

    #[test]
    fn empty_sources_and_duplicate_names_are_rejected() {
        assert!(AsciiMapLoader.load("\n\n").is_err());
        let error = AsciiMapLoader.load("a.a").expect_err("`a` appears twice");
        assert_eq!(error.to_string(), "position `a` is declared twice");
    }
}
