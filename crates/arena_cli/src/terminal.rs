//! Terminal rendering of the dashboard.
//!
//! Feed re-renders, changed counters and control changes go to `out`; notices
//! go to `err`. The last written state is kept in a [`MemorySurface`] for the
//! `status` command.

use std::io::{self, Write};

use arena::render::Fragment;
use arena::{ButtonView, ElementId, MemorySurface, Surface};

pub struct TerminalSurface {
    memory: MemorySurface,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl TerminalSurface {
    pub fn stdio() -> Self {
        Self::with_writers(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            memory: MemorySurface::new(),
            out,
            err,
        }
    }

    pub fn memory(&self) -> &MemorySurface {
        &self.memory
    }
}

impl Surface for TerminalSurface {
    fn set_text(&mut self, id: ElementId, text: &str) {
        if self.memory.text(id) != Some(text) {
            let _ = writeln!(self.out, "{:<15} {}", id.as_str(), text);
        }
        self.memory.set_text(id, text);
    }

    fn replace_children(&mut self, id: ElementId, content: Fragment) {
        let _ = writeln!(self.out, "[{}]", id.as_str());
        for line in content.lines() {
            let _ = writeln!(self.out, "  {line}");
        }
        let _ = self.out.flush();
        self.memory.replace_children(id, content);
    }

    fn scroll_to_end(&mut self, id: ElementId) {
        self.memory.scroll_to_end(id);
    }

    fn apply_button(&mut self, id: ElementId, view: &ButtonView) {
        if self.memory.button(id) != Some(view) {
            let state = if view.enabled { "enabled" } else { "disabled" };
            let _ = writeln!(self.out, "{:<15} {} ({state})", id.as_str(), view.label);
        }
        self.memory.apply_button(id, view);
    }

    fn notify(&mut self, notice: &str) {
        let _ = writeln!(self.err, "! {notice}");
        self.memory.notify(notice);
    }
}
