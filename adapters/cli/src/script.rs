//! Text form of player input used by `--moves` and standard input.
//!
//! `n`, `e`, `s` and `w` move, `c` confirms, `x` cancels and `l` toggles the
//! log. Whitespace and commas separate nothing and are skipped; any other
//! character is passed on as unrecognized input.

use travels_core::Direction;
use travels_system_session::Input;

pub(crate) fn parse(script: &str) -> Vec<Input> {
    script
        .chars()
        .filter(|glyph| !glyph.is_whitespace() && *glyph != ',')
        .map(|glyph| match glyph.to_ascii_lowercase() {
            'n' => Input::Move(Direction::North),
            'e' => Input::Move(Direction::East),
            's' => Input::Move(Direction::South),
            'w' => Input::Move(Direction::West),
            'c' => Input::Confirm,
            'x' => Input::Cancel,
            'l' => Input::ToggleLog,
            _ => Input::Unrecognized,
        })
        .collect()
}
