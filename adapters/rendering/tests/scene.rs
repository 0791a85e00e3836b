use travels_core::{Destination, Direction, Point, Size};
use travels_rendering::{MenuPresentation, Overlay, Scene};
use travels_world::{GameState, Menu, MenuItem, WorldMap};

fn state() -> GameState {
    let mut state = GameState::new(Size::new(4, 4));
    state.add_map("meadow", WorldMap::new(Size::new(3, 3)));
    let _ = state
        .teleport(
            "meadow",
            &Destination::Point(Point::new(2, 1)),
            Some(Direction::West),
        )
        .expect("meadow exists");
    state
}

#[test]
fn overlays_follow_log_popup_menu_priority() {
    let mut state = state();
    assert_eq!(Scene::capture(&state, 0, false).overlay, Overlay::None);

    state.present_menu(Menu::new(vec![MenuItem::message("Look", "Grass")]));
    assert_eq!(Scene::capture(&state, 0, false).overlay, Overlay::Menu);

    state.set_popup_message("Hello");
    assert_eq!(
        Scene::capture(&state, 0, false).overlay,
        Overlay::Popup("Hello".to_owned())
    );
    assert_eq!(
        Scene::capture(&state, 0, true).overlay,
        Overlay::Log,
        "the log covers everything"
    );
}

#[test]
fn status_panel_reports_position_and_display_variables() {
    let mut state = state();
    state.set_variable("Coins", 3);
    state.add_display_variable("Coins");
    state.add_display_variable("Keys");
    state.set_last_message("A breeze");

    let scene = Scene::capture(&state, 0, false);

    assert_eq!(scene.status.location, Point::new(2, 1));
    assert_eq!(scene.status.facing, Direction::West);
    assert_eq!(
        scene.status.lines(),
        vec![
            "Location: {2,1}",
            "Map: meadow",
            "Coins: 3",
            "Keys: -",
            "A breeze"
        ]
    );
}

#[test]
fn menu_cursor_is_clamped_to_the_visible_items() {
    let mut state = state();
    state.present_menu(Menu::new(vec![
        MenuItem::message("First", "one"),
        MenuItem::message("Second", "two"),
    ]));

    let scene = Scene::capture(&state, 7, false);

    assert_eq!(
        scene.menu,
        Some(MenuPresentation {
            items: vec!["First".to_owned(), "Second".to_owned()],
            cursor: 1,
            fresh: true,
        })
    );
}
