//! Renderer that repaints the terminal after every tick.

use std::io::{self, Write as _};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use gridchase_core::render::{Frame, Renderer, TextRenderer};
use tracing::warn;

/// Prints each frame to stdout in place of the previous one.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    text: TextRenderer,
}

impl TerminalRenderer {
    /// Create a renderer.
    pub const fn new() -> Self {
        Self {
            text: TextRenderer::new(),
        }
    }

    /// Draw the last text frame over whatever `out` currently shows.
    fn paint<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(
            out,
            MoveTo(0, 0),
            Clear(ClearType::All),
            Print(self.text.output())
        )?;
        out.flush()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        self.text.render(frame);
        if let Err(e) = self.paint(&mut io::stdout().lock()) {
            warn!(error = %e, "failed to write frame");
        }
    }
}
