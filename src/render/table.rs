//! Text layout of the process table and the plain-text renderer.

use std::io::{self, Write};

use super::format::{format_cpu_time, format_uptime, kb_to_mb, truncate_string};
use super::{Frame, Renderer};
use crate::model::EntityMetrics;
use crate::process::CLK_TCK;

pub const SEPARATOR_WIDTH: usize = 97;
const OWNER_WIDTH: usize = 9;
/// Characters used by the columns before the command name.
const FIXED_COLUMNS_WIDTH: usize = 56;

/// One table row, split so the CPU cell can be styled on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells {
    pub lead: String,
    pub cpu: String,
    pub tail: String,
}

impl RowCells {
    pub fn joined(&self) -> String {
        format!("{}{}{}", self.lead, self.cpu, self.tail)
    }
}

/// Summary lines shown above the table.
pub fn header_lines(frame: &Frame<'_>) -> Vec<String> {
    vec![
        format!(
            "herakles-top - {} (refresh every {}s)",
            frame.timestamp.format("%H:%M:%S"),
            frame.refresh_seconds
        ),
        format!(
            "Uptime: {} | CPU usage: {:.2}% | Processes: {}",
            format_uptime(frame.uptime_seconds),
            frame.global_cpu_percent,
            frame.total_processes
        ),
        format!(
            "Memory: total {}MB free {}MB avail {}MB",
            kb_to_mb(frame.mem_total_kb),
            kb_to_mb(frame.mem_free_kb),
            kb_to_mb(frame.mem_available_kb)
        ),
    ]
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

pub fn column_header() -> String {
    format!(
        "{:<7} {:<9} {:>7} {:>6} {:>10} {:>10}  {}",
        "PID", "USER", "CPU%", "MEM%", "RSS(kB)", "TIME+", "CMD"
    )
}

/// Cells for one process. The command name is cut to fit `width` columns.
pub fn row_cells(entry: &EntityMetrics, width: usize) -> RowCells {
    let sample = &entry.sample;
    let name_space = width.saturating_sub(FIXED_COLUMNS_WIDTH).max(8);

    RowCells {
        lead: format!(
            "{:<7} {:<9} ",
            sample.pid,
            truncate_string(&sample.owner, OWNER_WIDTH)
        ),
        cpu: format!("{:>7.2}", entry.metric.cpu_percent),
        tail: format!(
            " {:>6.2} {:>10} {:>10}  {}",
            entry.metric.mem_percent,
            sample.resident_memory_kb,
            format_cpu_time(sample.cpu_time_ticks, *CLK_TCK),
            truncate_string(&sample.name, name_space)
        ),
    }
}

pub fn footer_line(frame: &Frame<'_>) -> String {
    format!(
        "Showing {} of {} processes | Press Ctrl+C to quit",
        frame.processes.len(),
        frame.total_processes
    )
}

/// All lines of a frame without any styling.
pub fn frame_lines(frame: &Frame<'_>, width: usize) -> Vec<String> {
    let mut lines = header_lines(frame);
    lines.push(separator());
    lines.push(column_header());
    lines.push(separator());
    lines.extend(frame.processes.iter().map(|e| row_cells(e, width).joined()));
    lines.push(separator());
    lines.push(footer_line(frame));
    lines
}

/// Writes frames as plain text, one after another, separated by a blank line.
pub struct PlainRenderer<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: SEPARATOR_WIDTH,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for PlainRenderer<W> {
    fn display(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        for line in frame_lines(frame, self.width) {
            writeln!(self.out, "{}", line.trim_end())?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CycleReport, DerivedMetric, EntitySample, GlobalSample};

    fn entry(pid: u32, name: &str, cpu: f64) -> EntityMetrics {
        EntityMetrics {
            sample: EntitySample {
                pid,
                owner: "a-very-long-user".into(),
                name: name.into(),
                cpu_time_ticks: 0,
                resident_memory_kb: 2048,
            },
            metric: DerivedMetric {
                cpu_percent: cpu,
                mem_percent: 1.5,
            },
        }
    }

    #[test]
    fn test_row_cells() {
        let cells = row_cells(&entry(4321, "postgres", 12.346), 120);
        assert!(cells.lead.starts_with("4321"));
        assert!(cells.lead.contains("a-very..."));
        assert_eq!(cells.cpu, "  12.35");
        assert!(cells.tail.contains("1.50"));
        assert!(cells.tail.contains("2048"));
        assert!(cells.tail.ends_with("postgres"));
    }

    #[test]
    fn test_row_cells_truncates_name_to_width() {
        let long_name = "x".repeat(100);
        let cells = row_cells(&entry(1, &long_name, 0.0), 80);
        assert!(cells.tail.ends_with("..."));
        assert!(cells.joined().chars().count() <= 80 + 1);
    }

    #[test]
    fn test_plain_renderer_output() {
        let global = GlobalSample {
            mem_total_kb: 16 * 1024 * 1024,
            mem_free_kb: 4 * 1024 * 1024,
            mem_available_kb: 8 * 1024 * 1024,
            uptime_seconds: 3723.0,
            ..Default::default()
        };
        let report = CycleReport {
            global_cpu_percent: 42.5,
            ..Default::default()
        };
        let rows = vec![entry(10, "nginx", 3.0), entry(11, "redis-server", 1.0)];
        let frame = Frame::new(&global, report.global_cpu_percent, 57, &rows, 2.0);

        let mut renderer = PlainRenderer::new(Vec::new());
        renderer.display(&frame).expect("render to Vec should not fail");
        let text = String::from_utf8(renderer.into_inner()).expect("utf8 output");

        assert!(text.contains("refresh every 2s"));
        assert!(text.contains("Uptime: 01:02:03 | CPU usage: 42.50% | Processes: 57"));
        assert!(text.contains("Memory: total 16384MB free 4096MB avail 8192MB"));
        assert!(text.contains("PID"));
        assert!(text.contains("nginx"));
        assert!(text.contains("redis-server"));
        assert!(text.contains("Showing 2 of 57 processes"));
        assert!(!text.contains('\u{1b}'));
    }
}
