//! `OutputRecorder<W>`: bridges the driver's sink and observer seams to an
//! `OutputWriter`.

use dc_core::{ControlAction, DroneId, Tick};
use dc_choreo::{ChoreoObserver, ControlSink, TickOutcome};

use crate::row::{ControlRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Records emitted controls and per-tick summaries to any [`OutputWriter`].
///
/// Control rows are buffered per tick and written when the next tick's
/// first row arrives or on [`finish`](Self::finish).  Errors from the writer
/// are stored internally because neither `ControlSink` nor `ChoreoObserver`
/// methods return a value; check them with [`take_error`](Self::take_error).
pub struct OutputRecorder<W: OutputWriter> {
    writer:     W,
    pending:    Vec<ControlRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), last_error: None }
    }

    /// Flush buffered rows and finish the writer.  Call once after the last
    /// tick.
    pub fn finish(&mut self) {
        self.flush_controls();
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_controls(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_controls(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> ControlSink for OutputRecorder<W> {
    fn send(&mut self, tick: Tick, drone: DroneId, controls: &ControlAction) {
        if self.pending.first().is_some_and(|row| row.tick != tick.0) {
            self.flush_controls();
        }
        self.pending.push(ControlRow::new(tick, drone, controls));
    }
}

impl<W: OutputWriter> ChoreoObserver for OutputRecorder<W> {
    fn on_tick_end(&mut self, tick: Tick, outcome: &TickOutcome, failures: usize) {
        let row = TickSummaryRow::new(tick, outcome, failures);
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }
}
