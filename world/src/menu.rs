//! Menus shown over the map and the stock items built from variables.
//!
//! Item visibility is re-evaluated against the live state, so selecting an
//! item can reveal or hide its siblings.

use std::{fmt, sync::Arc};

use crate::{variable, GameState, Gate, Variable, WorldError};

/// Side effect of choosing a menu item.
pub type MenuAction = Arc<dyn Fn(&mut GameState) -> Result<(), WorldError> + Send + Sync>;

/// Entry of a menu: a label, an action and an optional visibility gate.
#[derive(Clone)]
pub struct MenuItem {
    label: String,
    action: MenuAction,
    visible: Option<Gate>,
}

impl MenuItem {
    /// Creates an always-visible item.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        action: impl Fn(&mut GameState) -> Result<(), WorldError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            action: Arc::new(action),
            visible: None,
        }
    }

    /// Creates an item whose only effect is to show `text` as a popup.
    #[must_use]
    pub fn message(label: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(label, move |state| {
            state.set_popup_message(text.clone());
            Ok(())
        })
    }

    /// Restricts the item to states where `gate` passes.
    #[must_use]
    pub fn gated(mut self, gate: Gate) -> Self {
        self.visible = Some(gate);
        self
    }

    /// Text shown for the item.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates the item's gate against the current state.
    #[must_use]
    pub fn is_visible(&self, state: &GameState) -> bool {
        self.visible
            .as_ref()
            .map_or(true, |gate| gate.evaluate(state))
    }

    /// Runs the item's action.
    pub fn run(&self, state: &mut GameState) -> Result<(), WorldError> {
        (self.action)(state)
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("gated", &self.visible.is_some())
            .finish()
    }
}

/// Ordered list of menu items.
#[derive(Clone, Debug, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    /// Creates a menu from items in display order.
    #[must_use]
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Every item regardless of visibility.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Items whose gates pass right now, in display order.
    ///
    /// Gates are evaluated on every call so that items revealed by an action
    /// show up as soon as the menu is displayed again.
    #[must_use]
    pub fn visible_items(&self, state: &GameState) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| item.is_visible(state))
            .collect()
    }
}

impl FromIterator<MenuItem> for Menu {
    fn from_iter<I: IntoIterator<Item = MenuItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Item labelled "Exit" that closes the active menu.
#[must_use]
pub fn exit_menu() -> MenuItem {
    MenuItem::new("Exit", |state| {
        state.clear_menu();
        Ok(())
    })
}

/// Item that shows `message` and raises the boolean flag `name`.
///
/// When the flag was not already raised the active menu is presented again so
/// that items gated on the flag appear straight away.
#[must_use]
pub fn set_flag(
    label: impl Into<String>,
    message: impl Into<String>,
    name: impl Into<String>,
) -> MenuItem {
    let message = message.into();
    let name = name.into();
    MenuItem::new(label, move |state| {
        state.set_popup_message(message.clone());
        if state.variable(&name) != Some(&Variable::Boolean(true)) {
            state.set_variable(name.clone(), true);
            if let Some(menu) = state.menu().cloned() {
                state.present_menu(menu);
            }
        }
        Ok(())
    })
}

/// Item that shows `message` and is only visible while the flag `name` is raised.
#[must_use]
pub fn check_flag(
    label: impl Into<String>,
    message: impl Into<String>,
    name: impl Into<String>,
) -> MenuItem {
    MenuItem::message(label, message).gated(variable(name).equals(true))
}
