#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Travels adapters.
//!
//! A [`Scene`] is a read-only capture of everything besides the pixel frame
//! that a front end shows: the overlay on top, the status panel and the menu.
//! Backends receive the scene together with the drawn frame.

pub mod ansi;

use anyhow::Result as AnyResult;
use travels_core::{Direction, Grid, Pixel, Point};
use travels_world::{query, GameState};

/// Overlay drawn above the map, at most one at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Overlay {
    /// Nothing covers the map.
    None,
    /// The active menu is shown.
    Menu,
    /// A popup message is shown.
    Popup(String),
    /// The event log is shown.
    Log,
}

/// Text shown beside the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusPanel {
    /// Cell the character occupies.
    pub location: Point,
    /// Name of the current map.
    pub map: String,
    /// Direction the character faces.
    pub facing: Direction,
    /// Display variables rendered as text, unset ones included.
    pub variables: Vec<(String, String)>,
    /// Status line, empty when there is nothing to say.
    pub message: String,
}

impl StatusPanel {
    /// Lines of the panel in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Location: {}", self.location),
            format!("Map: {}", self.map),
        ];
        lines.extend(
            self.variables
                .iter()
                .map(|(name, value)| format!("{name}: {value}")),
        );
        if !self.message.is_empty() {
            lines.push(self.message.clone());
        }
        lines
    }
}

/// Visible items of the active menu with the highlighted row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuPresentation {
    /// Labels of the visible items.
    pub items: Vec<String>,
    /// Highlighted row, always inside `items` unless the menu is empty.
    pub cursor: usize,
    /// Whether the menu was presented since input last reached it.
    pub fresh: bool,
}

impl MenuPresentation {
    /// Lines of the menu with the highlighted row marked.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let marker = if index == self.cursor { '>' } else { ' ' };
                format!("{marker} {label}")
            })
            .collect()
    }
}

/// Everything a backend shows besides the pixel frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Overlay covering the map.
    pub overlay: Overlay,
    /// Status panel contents.
    pub status: StatusPanel,
    /// Active menu, shown when the overlay is [`Overlay::Menu`].
    pub menu: Option<MenuPresentation>,
}

impl Scene {
    /// Captures the presentation of a state between steps.
    ///
    /// The log takes precedence over a popup, which takes precedence over the
    /// menu.
    #[must_use]
    pub fn capture(state: &GameState, menu_cursor: usize, show_log: bool) -> Self {
        let status = query::status(state);
        let menu = query::menu_view(state).map(|view| MenuPresentation {
            cursor: menu_cursor.min(view.labels.len().saturating_sub(1)),
            items: view.labels,
            fresh: view.fresh,
        });

        let overlay = if show_log {
            Overlay::Log
        } else if !state.popup_message().is_empty() {
            Overlay::Popup(state.popup_message().to_owned())
        } else if menu.is_some() {
            Overlay::Menu
        } else {
            Overlay::None
        };

        Self {
            overlay,
            status: StatusPanel {
                location: status.position,
                map: status.map,
                facing: status.facing,
                variables: status
                    .display_variables
                    .into_iter()
                    .map(|(name, value)| {
                        let value = value.map_or_else(|| "-".to_owned(), |value| value.to_string());
                        (name, value)
                    })
                    .collect(),
                message: status.last_message,
            },
            menu,
        }
    }
}

/// Front end capable of showing drawn frames.
pub trait RenderingBackend {
    /// Shows one frame together with its scene.
    fn present(&mut self, frame: &Grid<Pixel>, scene: &Scene) -> AnyResult<()>;
}
