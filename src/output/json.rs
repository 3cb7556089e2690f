//! JSON lines output

use std::io::{self, Write};

use crate::stats::TreeStats;

use super::{NodeOutput, NodeRecord};

/// Writes one JSON object per visited node.
pub struct JsonLinesFormatter<W: Write> {
    out: W,
}

impl JsonLinesFormatter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesFormatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> NodeOutput for JsonLinesFormatter<W> {
    fn output_node(&mut self, record: &NodeRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record).map_err(io::Error::other)?;
        writeln!(self.out)
    }

    fn finish(&mut self, _stats: &TreeStats) -> io::Result<()> {
        self.out.flush()
    }
}
