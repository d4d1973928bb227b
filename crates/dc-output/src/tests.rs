//! Integration tests for dc-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{ControlRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn control_row(drone_id: u32, tick: u64) -> ControlRow {
        ControlRow {
            tick,
            drone_id,
            throttle:  1.0,
            steer:     -0.5,
            pitch:     0.0,
            yaw:       0.0,
            roll:      0.25,
            jump:      drone_id % 2 == 1,
            boost:     true,
            handbrake: false,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("controls.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_creates_missing_output_dir() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("aqua");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("controls.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("controls.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["tick", "drone_id", "throttle", "steer", "pitch", "yaw", "roll", "jump", "boost", "handbrake"],
        );

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["tick", "outcome", "cursor", "failures"]);
    }

    #[test]
    fn csv_controls_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_controls(&[control_row(0, 5), control_row(1, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("controls.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "5");    // tick
        assert_eq!(&rows[1][1], "1");    // drone_id
        assert_eq!(&rows[0][3], "-0.5"); // steer
        assert_eq!(&rows[0][7], "0");    // jump
        assert_eq!(&rows[1][7], "1");
        assert_eq!(&rows[1][8], "1");    // boost
    }

    #[test]
    fn csv_summary_leaves_cursor_blank_when_not_running() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow { tick: 1, outcome: "waiting", cursor: None, failures: 0 }).unwrap();
        w.write_tick_summary(&TickSummaryRow { tick: 2, outcome: "running", cursor: Some(3), failures: 2 }).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "waiting");
        assert_eq!(&rows[0][2], "");
        assert_eq!(&rows[1][2], "3");
        assert_eq!(&rows[1][3], "2");
    }

    #[test]
    fn csv_finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod recorder_tests {
    use tempfile::TempDir;

    use dc_choreo::{ChoreoConfig, ChoreographyBuilder, FnScript, TickOutcome};
    use dc_core::{DroneId, Kinematics, Rotator, Team, Tick, Vec3};
    use dc_drone::{DroneSnapshot, WorldSnapshot};
    use dc_step::{BehaviorError, NoopWorld, Step, StepResult};

    use crate::{CsvWriter, OutputError, OutputRecorder, OutputResult, OutputWriter};
    use crate::row::{ControlRow, TickSummaryRow};

    fn snapshot(tick: u64, ids: &[u32]) -> WorldSnapshot {
        let mut snap = WorldSnapshot::new(Tick(tick));
        for &id in ids {
            snap.drones.push(DroneSnapshot::new(
                DroneId(id),
                Team::ORANGE,
                Kinematics::at_rest(Vec3::ZERO, Rotator::default()),
            ));
        }
        snap
    }

    /// In-memory writer for checking what the recorder forwards.
    #[derive(Default)]
    struct MemoryWriter {
        controls:  Vec<Vec<ControlRow>>,
        summaries: Vec<TickSummaryRow>,
        finished:  u32,
        fail:      bool,
    }

    impl OutputWriter for MemoryWriter {
        fn write_controls(&mut self, rows: &[ControlRow]) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.controls.push(rows.to_vec());
            Ok(())
        }

        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            self.summaries.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn show() -> dc_choreo::Choreography<impl dc_choreo::Script> {
        let config = ChoreoConfig { expected_drones: 2, ..ChoreoConfig::default() };
        let script = FnScript::new("recorded", |_, _| {
            Ok(vec![
                Step::per_drone_fn("spin", |ctx, drone| {
                    drone.controls.yaw = 1.0;
                    drone.controls.boost = true;
                    Ok(StepResult::finished_if(ctx.elapsed >= 1))
                }),
                Step::combined_fn("stumble", |ctx, _| {
                    if ctx.elapsed == 0 {
                        Err(BehaviorError::Failed("first tick".into()))
                    } else {
                        Ok(StepResult::DONE)
                    }
                }),
            ])
        });
        ChoreographyBuilder::new(config, script).build().unwrap()
    }

    #[test]
    fn recorder_batches_controls_per_tick() {
        let mut show = show();
        let mut recorder = OutputRecorder::new(MemoryWriter::default());
        for t in 1..=3 {
            show.tick(&snapshot(t, &[0, 1]), &mut NoopWorld, &mut recorder).unwrap();
            show.emit(&mut recorder);
        }
        recorder.finish();
        assert!(recorder.take_error().is_none());

        let writer = recorder.into_writer();
        assert_eq!(writer.controls.len(), 3);
        assert!(writer.controls.iter().all(|batch| batch.len() == 2));
        assert_eq!(writer.controls[0][1].drone_id, 1);
        assert_eq!(writer.controls[0][0].yaw, 1.0);
        assert_eq!(writer.controls[2][0].yaw, 0.0);
        assert_eq!(writer.finished, 1);
    }

    #[test]
    fn recorder_writes_one_summary_per_tick() {
        let mut show = show();
        let mut recorder = OutputRecorder::new(MemoryWriter::default());
        let outcomes: Vec<TickOutcome> = (1..=5)
            .map(|t| {
                let ids: &[u32] = if t == 1 { &[0] } else { &[0, 1] };
                show.tick(&snapshot(t, ids), &mut NoopWorld, &mut recorder).unwrap()
            })
            .collect();
        assert_eq!(outcomes.last(), Some(&TickOutcome::Finished));

        let summaries = recorder.into_writer().summaries;
        let labels: Vec<_> = summaries.iter().map(|s| s.outcome).collect();
        assert_eq!(labels, ["waiting", "running", "running", "running", "finished"]);
        assert_eq!(summaries[0].cursor, None);
        assert_eq!(summaries[2].cursor, Some(1));
        assert_eq!(summaries[3].failures, 1);
    }

    #[test]
    fn recorder_keeps_first_error() {
        let mut recorder = OutputRecorder::new(MemoryWriter { fail: true, ..MemoryWriter::default() });
        let mut show = show();
        for t in 1..=3 {
            show.tick(&snapshot(t, &[0, 1]), &mut NoopWorld, &mut recorder).unwrap();
            show.emit(&mut recorder);
        }
        recorder.finish();
        let err = recorder.take_error().expect("error stored");
        assert!(err.to_string().contains("disk full"));
        assert!(recorder.take_error().is_none());
    }

    #[test]
    fn recorder_to_csv_end_to_end() {
        let dir: TempDir = tempfile::tempdir().expect("create temp dir");
        let mut recorder = OutputRecorder::new(CsvWriter::new(dir.path()).unwrap());
        let mut show = show();
        for t in 1..=4 {
            show.tick(&snapshot(t, &[0, 1]), &mut NoopWorld, &mut recorder).unwrap();
            show.emit(&mut recorder);
        }
        recorder.finish();
        assert!(recorder.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("controls.csv")).unwrap();
        assert_eq!(rdr.records().count(), 8);
        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let last = rdr.records().map(|r| r.unwrap()).last().unwrap();
        assert_eq!(&last[1], "finished");
    }
}
