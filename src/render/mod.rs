//! Output sinks for ranked process tables.
//!
//! A [`Renderer`] receives one [`Frame`] per cycle. Three implementations
//! are provided:
//! - `TerminalRenderer`: redraws the screen in place with crossterm
//! - `PlainRenderer`: appends frames as plain text (batch mode, pipes)
//! - `JsonRenderer`: one JSON document per frame and line

pub mod format;
pub mod json;
pub mod table;
pub mod terminal;

use chrono::{DateTime, Local};
use serde::Serialize;
use std::io;

use crate::model::{EntityMetrics, GlobalSample};

pub use json::JsonRenderer;
pub use table::PlainRenderer;
pub use terminal::TerminalRenderer;

/// Everything displayed for one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    pub timestamp: DateTime<Local>,
    pub refresh_seconds: f64,
    pub global_cpu_percent: f64,
    pub mem_total_kb: u64,
    pub mem_free_kb: u64,
    pub mem_available_kb: u64,
    pub uptime_seconds: f64,
    /// Processes read this cycle, before truncation to the display count.
    pub total_processes: usize,
    pub processes: &'a [EntityMetrics],
}

impl<'a> Frame<'a> {
    pub fn new(
        global: &GlobalSample,
        global_cpu_percent: f64,
        total_processes: usize,
        processes: &'a [EntityMetrics],
        refresh_seconds: f64,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            refresh_seconds,
            global_cpu_percent,
            mem_total_kb: global.mem_total_kb,
            mem_free_kb: global.mem_free_kb,
            mem_available_kb: global.mem_available_kb,
            uptime_seconds: global.uptime_seconds,
            total_processes,
            processes,
        }
    }
}

/// Sink for rendered frames.
pub trait Renderer {
    /// Draws one frame.
    fn display(&mut self, frame: &Frame<'_>) -> io::Result<()>;

    /// Called once when the monitor stops; flushes output and restores the terminal.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn display(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        (**self).display(frame)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}
