//! Tree statistics collection and display
//!
//! Counts the nodes a walk produced and the bytes streamed out of its files.

use serde::Serialize;
use std::io;
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tree::{File, Node};

/// Collected statistics about a walked tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Directories visited, including the root when it is one
    pub directories: usize,
    pub files: usize,
    pub symlinks: usize,
    /// Bytes read from files (only when streaming is enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Statistics collector that accumulates data during a walk.
#[derive(Debug, Default)]
pub struct StatsCollector {
    stream_files: bool,
    stats: TreeStats,
}

impl StatsCollector {
    /// With `stream_files`, every file is read to the end and its bytes counted.
    pub fn new(stream_files: bool) -> Self {
        Self {
            stream_files,
            stats: TreeStats {
                bytes: stream_files.then_some(0),
                ..Default::default()
            },
        }
    }

    /// Record a visited node.
    pub fn record(&mut self, node: &mut Node) -> io::Result<()> {
        match node {
            Node::Directory(_) => self.stats.directories += 1,
            Node::Symlink(_) => self.stats.symlinks += 1,
            Node::File(file) => {
                self.stats.files += 1;
                if self.stream_files {
                    let read = stream_to_end(file)?;
                    if let Some(bytes) = self.stats.bytes.as_mut() {
                        *bytes += read;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    pub fn finalize(self) -> TreeStats {
        self.stats
    }
}

fn stream_to_end(file: &mut File) -> io::Result<u64> {
    io::copy(file, &mut io::sink())
}

/// Print statistics to stdout with optional color.
pub fn print_stats(stats: &TreeStats, use_color: bool) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);
    write_stats(&mut stdout, stats)
}

fn write_stats<W: WriteColor>(out: &mut W, stats: &TreeStats) -> io::Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    out.set_color(&bold)?;
    writeln!(out, "Tree Statistics")?;
    out.reset()?;
    writeln!(out, "───────────────")?;

    writeln!(out, "Directories:  {}", stats.directories)?;
    writeln!(out, "Files:        {}", stats.files)?;
    writeln!(out, "Symlinks:     {}", stats.symlinks)?;

    if let Some(bytes) = stats.bytes {
        out.set_color(&bold)?;
        write!(out, "Total:        ")?;
        out.reset()?;
        writeln!(out, "{} bytes", format_number(bytes))?;
    }
    Ok(())
}

/// Format a number with thousand separators.
fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Print statistics as JSON.
pub fn print_stats_json(stats: &TreeStats) -> io::Result<()> {
    let json = serde_json::to_string_pretty(stats).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
