//! The built-in lesson: a walled garden, a house with a lever and a secret room.

use travels_core::{
    fill, fill_border, fill_line, Destination, Direction, GridError, Layer, Pixel, Point, Size,
    SubSpanMut,
};
use travels_world::{
    check_flag, exit_menu, set_flag, variable, GameState, Location, Menu, MenuItem, WorldMap,
};

use crate::{COLOURS_SEEN, HOUSE_MAP, MAIN_MAP, SLUICE_OPEN, TASK};

pub(crate) const WELCOME: &str = "Welcome to Travels! Your job is to get into the secret room in the \
bottom right corner of the map. The water is in the way, so look around for a way to drain it.";

pub(crate) const FLOOR: Pixel = Pixel::opaque(5, 5, 25);
pub(crate) const WATER: Pixel = Pixel::opaque(0, 0, 250);
const DRY_BED: Pixel = Pixel::opaque(194, 178, 128);
const WALL_EDGE: Pixel = Pixel::new(100, 100, 100, 128);
const FLASH: [Pixel; 3] = [
    Pixel::opaque(64, 128, 64),
    Pixel::opaque(128, 64, 64),
    Pixel::opaque(64, 64, 160),
];
const TRUNK: Pixel = Pixel::opaque(101, 67, 33);
const CANOPY: Pixel = Pixel::new(20, 140, 40, 200);
const DOOR: Pixel = Pixel::opaque(120, 72, 24);
pub(crate) const HOUSE_WALL: Pixel = Pixel::opaque(90, 60, 40);
const HOUSE_FLOOR: Pixel = Pixel::opaque(150, 120, 80);
const LEVER: Pixel = Pixel::opaque(200, 200, 40);
const PLAYER: Pixel = Pixel::new(128, 128, 0, 255);
const PLAYER_CORNER: Pixel = Pixel::new(128, 128, 0, 64);

const FLASHING_WALLS: [Point; 5] = [
    Point::new(3, 4),
    Point::new(2, 5),
    Point::new(1, 2),
    Point::new(8, 6),
    Point::new(5, 5),
];
const HINTS: [(Point, &str); 5] = [
    (Point::new(2, 1), "Hint: go to location {4,3}"),
    (Point::new(4, 3), "Hint: go to location {8,8}"),
    (Point::new(7, 7), "A wall is blocking your way"),
    (Point::new(8, 7), "The water to the east looks shallow"),
    (Point::new(7, 8), "Maybe someone in the house knows how to drain it"),
];
const SLUICE: [Point; 2] = [Point::new(9, 7), Point::new(9, 8)];
const SECRET_ROOM: Point = Point::new(8, 8);

/// Builds the garden map the lesson starts on.
pub(crate) fn main_map() -> Result<WorldMap, GridError> {
    let mut map = WorldMap::new(Size::new(10, 10));
    fill(map.locations_mut(), &solid(FLOOR))?;
    fill_border(map.locations_mut(), &wall(WATER))?;

    for point in FLASHING_WALLS {
        map.set_location(point, flashing_wall())?;
    }
    for (point, hint) in HINTS {
        map.set_location(
            point,
            solid(FLOOR).with_enter_action(move |state, _, _| {
                state.set_last_message(hint);
                Ok(())
            }),
        )?;
    }
    for point in SLUICE {
        map.set_location(point, sluice())?;
    }

    map.set_location(Point::new(6, 2), tree())?;
    map.set_location(
        Point::new(2, 8),
        door(HOUSE_MAP, "entrance", Direction::North, "You step inside the house"),
    )?;
    map.set_location(SECRET_ROOM, secret_room())?;

    map.name_position("start", Point::new(1, 1))?;
    map.name_position("porch", Point::new(2, 7))?;
    map.name_position("secret_room", SECRET_ROOM)?;
    Ok(map)
}

/// Builds the one-room house reachable through the garden door.
pub(crate) fn house_map() -> Result<WorldMap, GridError> {
    let mut map = WorldMap::new(Size::new(5, 5));
    fill(map.locations_mut(), &solid(HOUSE_FLOOR))?;
    fill_border(map.locations_mut(), &wall(HOUSE_WALL))?;

    map.set_location(
        Point::new(2, 4),
        door(MAIN_MAP, "porch", Direction::North, "You are back in the garden"),
    )?;
    map.set_location(Point::new(1, 1), lever())?;

    map.name_position("entrance", Point::new(2, 3))?;
    map.name_position("lever", Point::new(1, 1))?;
    Ok(map)
}

/// Draws the player: a filled square inset by two pixels with translucent corners.
pub(crate) fn draw_player(
    pixels: &mut SubSpanMut<'_, Pixel>,
    _: &GameState,
    _: Point,
) -> Result<(), GridError> {
    let size = pixels.size();
    let right = size.width.saturating_sub(3);
    let bottom = size.height.saturating_sub(3);
    for y in 2..size.height.saturating_sub(2) {
        for x in 2..size.width.saturating_sub(2) {
            let corner = (x == 2 || x == right) && (y == 2 || y == bottom);
            *pixels.at_mut(Point::new(x, y))? += if corner { PLAYER_CORNER } else { PLAYER };
        }
    }
    Ok(())
}

pub(crate) fn solid(color: Pixel) -> Location {
    Location::new().with_draw(move |pixels, _, _, layer| match layer {
        Layer::Background => fill(pixels, &color),
        Layer::Foreground => Ok(()),
    })
}

fn flash_color(state: &GameState) -> Pixel {
    let second = state.clock().as_secs() as usize;
    FLASH[second % FLASH.len()]
}

pub(crate) fn wall(color: Pixel) -> Location {
    solid(color).with_can_enter(|_, _, _| false)
}

fn flashing_wall() -> Location {
    Location::new()
        .with_can_enter(|_, _, _| false)
        .with_draw(|pixels, state, at, layer| {
            if layer == Layer::Foreground {
                return Ok(());
            }
            let color = flash_color(state);
            fill(pixels, &color)?;
            state.record_color(color);
            outline_blocked_sides(pixels, state, at)
        })
}

/// Shades every side of the cell that cannot be crossed into it.
fn outline_blocked_sides(
    pixels: &mut SubSpanMut<'_, Pixel>,
    state: &GameState,
    at: Point,
) -> Result<(), GridError> {
    let Ok(map) = state.current_map() else {
        return Ok(());
    };
    let size = pixels.size();
    let (Some(right), Some(bottom)) = (size.width.checked_sub(1), size.height.checked_sub(1))
    else {
        return Ok(());
    };

    let sides = [
        (Direction::East, Point::new(right, 0), Point::new(right, bottom)),
        (Direction::West, Point::new(0, 0), Point::new(0, bottom)),
        (Direction::North, Point::new(0, 0), Point::new(right, 0)),
        (Direction::South, Point::new(0, bottom), Point::new(right, bottom)),
    ];
    for (side, start, end) in sides {
        if map.can_enter_from(state, at, side)? {
            continue;
        }
        let size = Size::new(end.x - start.x + 1, end.y - start.y + 1);
        composite(&mut pixels.span_mut(start, size)?, WALL_EDGE)?;
    }
    Ok(())
}

fn tree() -> Location {
    Location::new().with_draw(|pixels, _, _, layer| {
        let size = pixels.size();
        match layer {
            Layer::Background => {
                fill(pixels, &FLOOR)?;
                let middle = size.width / 2;
                for y in size.height / 2..size.height {
                    pixels.set(Point::new(middle, y), TRUNK)?;
                }
                Ok(())
            }
            Layer::Foreground => {
                let crown = Size::new(size.width, size.height * 2 / 3);
                composite(&mut pixels.span_mut(Point::new(0, 0), crown)?, CANOPY)
            }
        }
    })
}

/// Blends `color` over every pixel of the window.
fn composite(pixels: &mut SubSpanMut<'_, Pixel>, color: Pixel) -> Result<(), GridError> {
    let size = pixels.size();
    for y in 0..size.height {
        for x in 0..size.width {
            *pixels.at_mut(Point::new(x, y))? += color;
        }
    }
    Ok(())
}

fn door(
    map: &'static str,
    destination: &'static str,
    facing: Direction,
    message: &'static str,
) -> Location {
    solid(DOOR).with_enter_action(move |state, _, _| {
        let _ = state.teleport(map, &Destination::from(destination), Some(facing))?;
        state.set_last_message(message);
        Ok(())
    })
}

fn lever() -> Location {
    Location::new()
        .with_draw(|pixels, _, _, layer| {
            if layer == Layer::Foreground {
                return Ok(());
            }
            fill(pixels, &HOUSE_FLOOR)?;
            let size = pixels.size();
            let (Some(right), Some(bottom)) =
                (size.width.checked_sub(1), size.height.checked_sub(1))
            else {
                return Ok(());
            };
            fill_line(pixels, Point::new(0, bottom), Point::new(right, 0), &LEVER)
        })
        .with_enter_action(|state, _, _| {
            state.set_last_message("An old lever sticks out of the wall");
            state.present_menu(Menu::new(vec![
                set_flag(
                    "Pull the lever",
                    "Somewhere outside, water drains away",
                    SLUICE_OPEN,
                ),
                check_flag(
                    "Listen",
                    "You hear water rushing east of the garden",
                    SLUICE_OPEN,
                ),
                exit_menu(),
            ]));
            Ok(())
        })
}

fn sluice() -> Location {
    let open = variable(SLUICE_OPEN).equals(true);
    let drawn = open.clone();
    Location::new()
        .with_can_enter(move |state, _, _| open.evaluate(state))
        .with_draw(move |pixels, state, _, layer| match layer {
            Layer::Background if drawn.evaluate(state) => fill(pixels, &DRY_BED),
            Layer::Background => fill(pixels, &WATER),
            Layer::Foreground => Ok(()),
        })
}

fn secret_room() -> Location {
    flashing_wall()
        .with_can_enter(|_, _, from| matches!(from, Direction::South | Direction::East))
        .with_exit_action(|state, _, _| {
            state.set_last_message("");
            Ok(())
        })
        .with_enter_action(|state, _, _| {
            let seen = i64::try_from(state.distinct_colors()).unwrap_or(i64::MAX);
            state.set_variable(COLOURS_SEEN, seen);
            state.add_display_variable(COLOURS_SEEN);
            state.set_variable(TASK, "Leave the game");
            state.set_last_message("You found the secret room!");
            state.present_menu(Menu::new(vec![
                MenuItem::new("Continue Game", |state| {
                    state.clear_menu();
                    Ok(())
                }),
                MenuItem::new("Exit Game", |state| {
                    state.request_exit();
                    Ok(())
                }),
            ]));
            Ok(())
        })
}
