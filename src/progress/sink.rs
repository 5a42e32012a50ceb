use super::RenderingMode;
use core::fmt::{Debug, Formatter};
use std::io::{self, Write};

/// Clears the visible output area and homes the cursor.
pub const CLEAR_CELL: &str = "\x1b[2J\x1b[H";

/// Where a progress bar sends its text.
pub trait OutputSink {
    /// Discard everything previously written, where the target supports it.
    fn clear(&mut self) -> io::Result<()>;

    fn write(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// The rendering strategy this sink expects the bar to use.
    fn mode(&self) -> RenderingMode;
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn mode(&self) -> RenderingMode {
        (**self).mode()
    }
}

/// A character stream with carriage return and cursor movement but no structured redraw.
pub struct PlainSink<W> {
    out: W,
}

impl<W: Write> PlainSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for PlainSink<W> {
    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn mode(&self) -> RenderingMode {
        RenderingMode::PlainTerminal
    }
}

impl<W> Debug for PlainSink<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlainSink").field("out", &"<writer>").finish()
    }
}

/// A notebook output cell, which can only be cleared as a whole and redrawn.
///
/// Clearing writes [`CLEAR_CELL`], which kernels rendering ANSI escapes into a
/// terminal-like cell honor. Jupyter frontends drop it, so under a Jupyter
/// kernel every frame stays in the cell and the scrollback piles up instead of
/// being redrawn. Kernels with a real clear-output message should implement
/// [`OutputSink`] themselves.
pub struct NotebookSink<W> {
    out: W,
    clears: usize,
}

impl<W: Write> NotebookSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out, clears: 0 }
    }

    /// Number of times the cell has been cleared.
    pub const fn clears(&self) -> usize {
        self.clears
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for NotebookSink<W> {
    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        self.out.write_all(CLEAR_CELL.as_bytes())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn mode(&self) -> RenderingMode {
        RenderingMode::InteractiveNotebook
    }
}

impl<W> Debug for NotebookSink<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotebookSink")
            .field("out", &"<writer>")
            .field("clears", &self.clears)
            .finish()
    }
}

/// Build the sink matching `mode` on top of `out`.
pub fn sink_for<'a, W: Write + 'a>(mode: RenderingMode, out: W) -> Box<dyn OutputSink + 'a> {
    match mode {
        RenderingMode::InteractiveNotebook => Box::new(NotebookSink::new(out)),
        RenderingMode::PlainTerminal => Box::new(PlainSink::new(out)),
    }
}
