use std::time::Duration;

use travels_core::{Direction, Event, Grid, Pixel, Point, Size};
use travels_system_bootstrap::{Bootstrap, HOUSE_MAP, MAIN_MAP, SLUICE_OPEN, TASK};
use travels_system_session::{Input, Session};
use travels_world::{query, Variable};

const TICK: Duration = Duration::from_millis(33);
const TILE: Size = Size::new(8, 8);

fn session() -> Session {
    let mut session = Bootstrap.session(TILE).expect("lesson builds");
    session.push_input(Input::Confirm);
    let _ = session.step(TICK);
    assert_eq!(session.state().popup_message(), "", "welcome dismissed");
    session
}

fn walk(session: &mut Session, directions: &[Direction]) -> Vec<Event> {
    for direction in directions {
        session.push_input(Input::Move(*direction));
    }
    session.step(TICK).events
}

fn position(session: &Session) -> Point {
    session.state().character().position()
}

fn labels(session: &Session) -> Vec<String> {
    query::menu_view(session.state())
        .map(|menu| menu.labels)
        .unwrap_or_default()
}

#[test]
fn lesson_starts_at_the_start_with_a_welcome() {
    let session = Bootstrap.session(TILE).expect("lesson builds");
    let state = session.state();

    assert_eq!(state.current_map_name(), MAIN_MAP);
    assert_eq!(state.character().position(), Point::new(1, 1));
    assert_eq!(state.character().facing(), Direction::South);
    assert!(state.popup_message().starts_with("Welcome to Travels!"));

    let status = query::status(state);
    assert_eq!(
        status.display_variables,
        vec![(
            TASK.to_owned(),
            Some(Variable::from("Find the secret room"))
        )]
    );
}

#[test]
fn water_and_walls_block_the_way() {
    let mut session = session();

    let events = walk(&mut session, &[Direction::North, Direction::South]);

    assert_eq!(position(&session), Point::new(1, 1));
    assert!(events.contains(&Event::MoveRejected {
        at: Point::new(1, 1),
        direction: Direction::North,
    }));
    assert!(events.contains(&Event::MoveRejected {
        at: Point::new(1, 1),
        direction: Direction::South,
    }));
}

#[test]
fn hint_tiles_leave_a_message() {
    let mut session = session();

    let _ = walk(&mut session, &[Direction::East]);

    assert_eq!(session.state().last_message(), "Hint: go to location {4,3}");
}

#[test]
fn secret_room_cannot_be_entered_from_the_north_or_west() {
    let mut session = session();
    let _ = session
        .teleport(MAIN_MAP, Point::new(8, 7), None)
        .expect("cell lies on the map");
    let _ = walk(&mut session, &[Direction::South]);
    assert_eq!(position(&session), Point::new(8, 7));

    let _ = session
        .teleport(MAIN_MAP, Point::new(7, 8), None)
        .expect("cell lies on the map");
    let _ = walk(&mut session, &[Direction::East]);
    assert_eq!(position(&session), Point::new(7, 8));
}

#[test]
fn sluice_stays_flooded_until_the_lever_is_pulled() {
    let mut session = session();
    let _ = session
        .teleport(MAIN_MAP, Point::new(8, 7), None)
        .expect("cell lies on the map");

    let _ = walk(&mut session, &[Direction::East]);

    assert_eq!(position(&session), Point::new(8, 7));
}

#[test]
fn house_door_and_lever_open_the_sluice() {
    let mut session = session();
    let _ = session
        .teleport(MAIN_MAP, "porch", None)
        .expect("porch is registered");

    let _ = walk(&mut session, &[Direction::South]);
    assert_eq!(session.state().current_map_name(), HOUSE_MAP);
    assert_eq!(position(&session), Point::new(2, 3));
    assert_eq!(session.state().character().facing(), Direction::North);

    let _ = walk(
        &mut session,
        &[Direction::North, Direction::North, Direction::West],
    );
    assert_eq!(position(&session), Point::new(1, 1));
    assert_eq!(labels(&session), vec!["Pull the lever", "Exit"]);

    session.push_input(Input::Confirm);
    let _ = session.step(TICK);
    assert_eq!(session.variable(SLUICE_OPEN), Some(&Variable::Boolean(true)));
    assert_eq!(
        session.state().popup_message(),
        "Somewhere outside, water drains away"
    );

    session.push_input(Input::Confirm);
    let _ = session.step(TICK);
    assert_eq!(labels(&session), vec!["Pull the lever", "Listen", "Exit"]);

    for input in [
        Input::Move(Direction::South),
        Input::Move(Direction::South),
        Input::Confirm,
    ] {
        session.push_input(input);
    }
    let _ = session.step(TICK);
    assert!(session.state().menu().is_none(), "exit closes the menu");

    let _ = walk(
        &mut session,
        &[
            Direction::East,
            Direction::South,
            Direction::South,
            Direction::South,
        ],
    );
    assert_eq!(session.state().current_map_name(), MAIN_MAP);
    assert_eq!(position(&session), Point::new(2, 7));
}

#[test]
fn draining_the_sluice_leads_into_the_secret_room() {
    let mut session = session();
    session.set_variable(SLUICE_OPEN, true);
    let _ = session
        .teleport(MAIN_MAP, Point::new(8, 7), None)
        .expect("cell lies on the map");

    let _ = walk(
        &mut session,
        &[Direction::East, Direction::South, Direction::West],
    );

    assert_eq!(position(&session), Point::new(8, 8));
    assert_eq!(session.state().last_message(), "You found the secret room!");
    assert_eq!(labels(&session), vec!["Continue Game", "Exit Game"]);

    session.push_input(Input::Move(Direction::South));
    session.push_input(Input::Confirm);
    let _ = session.step(TICK);
    assert!(session.is_finished());
}

#[test]
fn frames_show_the_lesson_and_count_flashing_colours() {
    let mut session = session();
    let mut frame = Grid::new(Size::new(80, 80));

    for _ in 0..3 {
        session.render(&mut frame).expect("frame draws");
        let _ = session.step(Duration::from_secs(1));
    }

    assert_eq!(frame.at(Point::new(4, 4)), Ok(&Pixel::opaque(0, 0, 250)));
    assert_eq!(
        frame.at(Point::new(11, 11)),
        Ok(&Pixel::opaque(128, 128, 0)),
        "player sprite covers the start cell"
    );
    assert!(session.state().distinct_colors() >= 3);
}
