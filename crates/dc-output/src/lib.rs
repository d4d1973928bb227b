//! `dc-output`: control and tick-summary output for the choreography
//! driver.
//!
//! | Backend     | Files created                                  |
//! |-------------|------------------------------------------------|
//! | CSV         | `controls.csv`, `tick_summaries.csv`           |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`OutputRecorder`], which is both a `dc_choreo::ControlSink` (one row per
//! drone per tick) and a `dc_choreo::ChoreoObserver` (one summary row per
//! tick).
//!
//! # Usage
//!
//! ```rust,ignore
//! use dc_output::{CsvWriter, OutputRecorder};
//!
//! let mut recorder = OutputRecorder::new(CsvWriter::new(Path::new("./output"))?);
//! while let Some(snapshot) = host.next_snapshot() {
//!     show.tick(&snapshot, &mut host, &mut recorder)?;
//!     show.emit(&mut recorder);
//! }
//! recorder.finish();
//! recorder.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use recorder::OutputRecorder;
pub use row::{ControlRow, TickSummaryRow};
pub use writer::OutputWriter;
