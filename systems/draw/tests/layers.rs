use travels_core::{fill, Destination, Grid, GridError, Layer, Pixel, Point, Size};
use travels_system_draw::{draw_frame, DrawError};
use travels_world::{GameState, Location, WorldMap};

const GRASS: Pixel = Pixel::opaque(0, 160, 0);
const HERO: Pixel = Pixel::opaque(0, 0, 255);
const CANOPY: Pixel = Pixel::opaque(255, 0, 0);

fn state_on(map: WorldMap, start: Point) -> GameState {
    let mut state = GameState::new(Size::new(2, 2));
    state.add_map("field", map);
    let _ = state
        .teleport("field", &Destination::Point(start), None)
        .expect("field exists");
    state
}

fn pixel(frame: &Grid<Pixel>, x: usize, y: usize) -> Pixel {
    *frame.at(Point::new(x, y)).expect("pixel lies in the frame")
}

#[test]
fn character_is_drawn_between_background_and_foreground() {
    let mut map = WorldMap::new(Size::new(3, 3));
    map.set_location(
        Point::new(1, 1),
        Location::new().with_draw(|pixels, _, _, layer| match layer {
            Layer::Background => fill(pixels, &GRASS),
            Layer::Foreground => pixels.set(Point::new(0, 0), CANOPY),
        }),
    )
    .expect("in bounds");
    let mut state = state_on(map, Point::new(1, 1));
    state.set_character_draw(|pixels, _, _| pixels.set(Point::new(1, 1), HERO));

    let mut frame = Grid::new(Size::new(6, 6));
    draw_frame(&mut frame, &state).expect("frame draws");

    assert_eq!(pixel(&frame, 2, 2), CANOPY, "canopy covers the character tile");
    assert_eq!(pixel(&frame, 3, 3), HERO, "character covers the ground");
    assert_eq!(pixel(&frame, 3, 2), GRASS, "ground shows elsewhere");
    assert_eq!(pixel(&frame, 0, 0), Pixel::TRANSPARENT, "empty cells draw nothing");
}

#[test]
fn cells_receive_their_world_position_under_a_clamped_camera() {
    let mut map = WorldMap::new(Size::new(6, 6));
    for x in 0..6 {
        for y in 0..6 {
            map.set_location(
                Point::new(x, y),
                Location::new().with_draw(|pixels, _, at, layer| {
                    if layer == Layer::Background {
                        fill(pixels, &Pixel::opaque(at.x as u8, at.y as u8, 0))
                    } else {
                        Ok(())
                    }
                }),
            )
            .expect("in bounds");
        }
    }
    let state = state_on(map, Point::new(5, 5));

    let mut frame = Grid::new(Size::new(6, 6));
    draw_frame(&mut frame, &state).expect("frame draws");

    assert_eq!(pixel(&frame, 0, 0), Pixel::opaque(3, 3, 0));
    assert_eq!(pixel(&frame, 5, 5), Pixel::opaque(5, 5, 0));
}

#[test]
fn previous_frame_contents_are_cleared() {
    let state = state_on(WorldMap::new(Size::new(3, 3)), Point::new(0, 0));
    let mut frame = Grid::from_fn(Size::new(6, 6), |_| HERO);

    draw_frame(&mut frame, &state).expect("frame draws");

    assert!(frame
        .points()
        .all(|point| frame.at(point) == Ok(&Pixel::TRANSPARENT)));
}

#[test]
fn missing_current_map_leaves_a_blank_frame() {
    let state = GameState::new(Size::new(2, 2));
    let mut frame = Grid::from_fn(Size::new(4, 4), |_| GRASS);

    draw_frame(&mut frame, &state).expect("missing map is not an error");

    assert_eq!(pixel(&frame, 1, 1), Pixel::TRANSPARENT);
}

#[test]
fn drawing_outside_the_tile_window_is_an_error() {
    let mut map = WorldMap::new(Size::new(3, 3));
    map.set_location(
        Point::new(0, 0),
        Location::new().with_draw(|pixels, _, _, _| pixels.set(Point::new(2, 0), GRASS)),
    )
    .expect("in bounds");
    let state = state_on(map, Point::new(0, 0));

    let mut frame = Grid::new(Size::new(6, 6));
    let error = draw_frame(&mut frame, &state).expect_err("tiles are two pixels wide");

    assert_eq!(
        error,
        DrawError::Grid(GridError::OutOfRange {
            point: Point::new(2, 0),
            size: Size::new(2, 2)
        })
    );
}
