//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `controls.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{ControlRow, OutputResult, TickSummaryRow};
use crate::writer::OutputWriter;

/// Writes choreography output to two CSV files.
pub struct CsvWriter {
    controls:  Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut controls = Writer::from_path(dir.join("controls.csv"))?;
        controls.write_record([
            "tick", "drone_id", "throttle", "steer", "pitch", "yaw", "roll", "jump", "boost", "handbrake",
        ])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "outcome", "cursor", "failures"])?;

        Ok(Self {
            controls,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_controls(&mut self, rows: &[ControlRow]) -> OutputResult<()> {
        for row in rows {
            self.controls.write_record(&[
                row.tick.to_string(),
                row.drone_id.to_string(),
                row.throttle.to_string(),
                row.steer.to_string(),
                row.pitch.to_string(),
                row.yaw.to_string(),
                row.roll.to_string(),
                (row.jump as u8).to_string(),
                (row.boost as u8).to_string(),
                (row.handbrake as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.outcome.to_owned(),
            row.cursor.map(|c| c.to_string()).unwrap_or_default(),
            row.failures.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.controls.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
