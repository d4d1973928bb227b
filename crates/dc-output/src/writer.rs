//! The `OutputWriter` trait implemented by backend writers.

use crate::{ControlRow, OutputResult, TickSummaryRow};

/// Trait implemented by output backends.
///
/// Errors are returned to the caller; [`OutputRecorder`][crate::OutputRecorder]
/// stores the first one for [`take_error`][crate::OutputRecorder::take_error].
pub trait OutputWriter {
    /// Write a batch of control rows.
    fn write_controls(&mut self, rows: &[ControlRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
