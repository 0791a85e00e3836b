use std::io::Write;

use anyhow::Result as AnyResult;
use travels_core::{Grid, Pixel};
use travels_rendering::{ansi, Overlay, RenderingBackend, Scene};

use crate::journal::EventJournal;

/// Colour shown where nothing was drawn.
const CLEAR: Pixel = Pixel::opaque(0, 0, 0);
/// Log lines shown by the log overlay.
const LOG_LINES: usize = 12;

/// Prints frames and their scene as plain text.
pub(crate) struct TerminalBackend<W> {
    out: W,
    journal: EventJournal,
    color: bool,
}

impl<W: Write> TerminalBackend<W> {
    pub(crate) fn new(out: W, journal: EventJournal, color: bool) -> Self {
        Self {
            out,
            journal,
            color,
        }
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, frame: &Grid<Pixel>, scene: &Scene) -> AnyResult<()> {
        if self.color {
            ansi::render(&mut self.out, frame, CLEAR)?;
        } else {
            ansi::render_monochrome(&mut self.out, frame, CLEAR)?;
        }

        for line in scene.status.lines() {
            writeln!(self.out, "{line}")?;
        }
        match &scene.overlay {
            Overlay::None => {}
            Overlay::Menu => {
                for line in scene.menu.iter().flat_map(|menu| menu.lines()) {
                    writeln!(self.out, "{line}")?;
                }
            }
            Overlay::Popup(message) => writeln!(self.out, "[ {message} ]")?,
            Overlay::Log => {
                writeln!(self.out, "-- log --")?;
                for entry in self.journal.entries().into_iter().take(LOG_LINES) {
                    writeln!(self.out, "{entry}")?;
                }
            }
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
