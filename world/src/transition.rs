//! Single-cell movement with passability checks and location actions.

use tracing::{debug, trace};
use travels_core::{Direction, Event, GridError, Point};

use crate::{GameState, WorldError};

/// Attempts to move the character one cell in `direction`.
///
/// The destination is checked from the side it is entered from. The exit
/// action of the departed cell runs before the position changes; the enter
/// action of the destination is looked up on whichever map is current once the
/// exit action has run. When that map is too small to hold the destination the
/// step fails and the character stays wherever the exit action left it.
pub(crate) fn step(
    state: &mut GameState,
    direction: Direction,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    let from = state.character.position();

    let map = state.current_map()?;
    let destination = from
        .step(direction)
        .filter(|destination| map.size().contains(*destination));
    let Some(destination) = destination else {
        reject(from, direction, out_events);
        return Ok(());
    };
    if !map.can_enter_from(state, destination, direction.opposite())? {
        reject(from, direction, out_events);
        return Ok(());
    }

    let exit = map.location(from)?.exit_action().cloned();
    if let Some(exit) = exit {
        exit(state, from, direction)?;
        let size = state.current_map()?.size();
        if !size.contains(destination) {
            return Err(GridError::OutOfRange {
                point: destination,
                size,
            }
            .into());
        }
    }

    state.character.position = destination;
    state.character.facing = direction;
    trace!(%from, to = %destination, "character moved");
    out_events.push(Event::CharacterMoved {
        from,
        to: destination,
        direction,
    });

    let enter = state
        .current_map()?
        .location(destination)?
        .enter_action()
        .cloned();
    if let Some(enter) = enter {
        enter(state, destination, direction)?;
    }

    Ok(())
}

fn reject(at: Point, direction: Direction, out_events: &mut Vec<Event>) {
    debug!(%at, ?direction, "move rejected");
    out_events.push(Event::MoveRejected { at, direction });
}
