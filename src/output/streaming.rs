//! Streaming output formatter
//!
//! This module provides `StreamingFormatter`, which writes an indented listing
//! as nodes are visited. Nothing is buffered, so sibling order is unknown
//! ahead of time and nesting is shown by indentation alone.

use std::io;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::stats::TreeStats;
use crate::tree::{NodeKind, format_size};

use super::config::OutputConfig;
use super::{NodeOutput, NodeRecord};

const INDENT: &str = "  ";

/// Streaming output formatter - writes each node on its own line.
pub struct StreamingFormatter<W: WriteColor> {
    config: OutputConfig,
    out: W,
    root_label: String,
}

impl StreamingFormatter<StandardStream> {
    /// Write to stdout, coloured if the config allows.
    pub fn stdout(config: OutputConfig, root_label: impl Into<String>) -> Self {
        let choice = if config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice), config, root_label)
    }
}

impl<W: WriteColor> StreamingFormatter<W> {
    /// `root_label` is printed in place of the root's empty relative path.
    pub fn new(out: W, config: OutputConfig, root_label: impl Into<String>) -> Self {
        Self {
            config,
            out,
            root_label: root_label.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_name(&mut self, record: &NodeRecord) -> io::Result<()> {
        let name = if record.path.is_empty() {
            self.root_label.as_str()
        } else {
            record.name()
        };

        match record.kind {
            NodeKind::Directory => {
                self.out
                    .set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
                write!(self.out, "{}/", name.trim_end_matches('/'))?;
            }
            NodeKind::Symlink => {
                self.out
                    .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
                write!(self.out, "{}", name)?;
                self.out.reset()?;
                write!(
                    self.out,
                    " -> {}",
                    record.target.as_deref().unwrap_or_default()
                )?;
            }
            NodeKind::File => {
                self.out
                    .set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
                write!(self.out, "{}", name)?;
            }
        }
        self.out.reset()
    }
}

impl<W: WriteColor> NodeOutput for StreamingFormatter<W> {
    fn output_node(&mut self, record: &NodeRecord) -> io::Result<()> {
        write!(self.out, "{}", INDENT.repeat(record.depth()))?;
        self.write_name(record)?;

        if let Some(bytes) = record.size.filter(|_| self.config.show_size) {
            write!(self.out, "  ")?;
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(self.out, "[{}]", format_size(bytes))?;
            self.out.reset()?;
        }
        writeln!(self.out)
    }

    fn finish(&mut self, stats: &TreeStats) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{} directories, {} files, {} symlinks",
            stats.directories, stats.files, stats.symlinks
        )?;
        self.out.flush()
    }
}
