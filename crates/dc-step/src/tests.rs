//! Unit tests for dc-step.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dc_core::{ControlAction, DroneId, Kinematics, Rotator, Team, Tick, TickClock, Vec3};
use dc_drone::{DroneRegistry, DroneSnapshot, WorldSnapshot};

use crate::{
    RecordingRenderer, RecordingWorld, Step, StepContext, StepFailure, StepResult, Timeline,
};

// ── Harness ───────────────────────────────────────────────────────────────────

/// Owns everything a `StepContext` borrows so each test can drive a timeline
/// tick by tick.
struct Harness {
    registry: DroneRegistry,
    world:    WorldSnapshot,
    mutator:  RecordingWorld,
    renderer: RecordingRenderer,
    failures: Vec<StepFailure>,
    clock:    TickClock,
}

impl Harness {
    fn new(ids: &[u32]) -> Self {
        let mut world = WorldSnapshot::new(Tick(0));
        for &id in ids {
            world.drones.push(DroneSnapshot::new(
                DroneId(id),
                Team::BLUE,
                Kinematics::at_rest(Vec3::new(id as f32 * 100.0, 0.0, 17.0), Rotator::default()),
            ));
        }
        let mut registry = DroneRegistry::new();
        registry.refresh(&world);
        Self {
            registry,
            world,
            mutator: RecordingWorld::new(),
            renderer: RecordingRenderer::new(),
            failures: Vec::new(),
            clock: TickClock::default(),
        }
    }

    fn advance(&mut self, tick: u64, timeline: &mut Timeline) -> bool {
        let mut ctx = StepContext::new(
            Tick(tick),
            self.clock,
            &self.world,
            &mut self.mutator,
            &mut self.renderer,
            &mut self.failures,
        );
        let mut group = self.registry.all();
        timeline.advance(&mut ctx, &mut group)
    }

    /// Invoke a lone step, outside any timeline.
    fn invoke(&mut self, tick: u64, step: &mut Step) -> bool {
        let mut ctx = StepContext::new(
            Tick(tick),
            self.clock,
            &self.world,
            &mut self.mutator,
            &mut self.renderer,
            &mut self.failures,
        );
        step.invoke(&mut ctx, &mut self.registry.all()).finished
    }
}

fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

/// Combined step that finishes once it has been current for `after` ticks.
fn after_ticks(label: &str, after: u64, calls: Rc<Cell<u32>>) -> Step {
    Step::combined_fn(label, move |ctx, _| {
        calls.set(calls.get() + 1);
        Ok(StepResult::finished_if(ctx.elapsed >= after))
    })
}

fn immediate(label: &str, calls: Rc<Cell<u32>>) -> Step {
    after_ticks(label, 0, calls)
}

// ── Timeline advancement ──────────────────────────────────────────────────────

#[cfg(test)]
mod timeline_tests {
    use super::*;
    use crate::{Hold, Transition};

    #[test]
    fn three_tick_step_then_immediate_step_finishes_at_tick_four() {
        let mut h = Harness::new(&[0]);
        let (a, b) = (counter(), counter());
        let mut tl = Timeline::new(vec![after_ticks("a", 2, a.clone()), immediate("b", b.clone())]);

        assert!(!h.advance(1, &mut tl));
        assert_eq!(tl.cursor(), 0);
        assert!(!h.advance(2, &mut tl));
        assert_eq!(tl.cursor(), 0);
        assert!(!h.advance(3, &mut tl));
        assert_eq!(tl.cursor(), 1, "deferred: b does not run in the tick a finished");
        assert_eq!(b.get(), 0);
        assert!(h.advance(4, &mut tl));
        assert_eq!(tl.cursor(), 2);
        assert_eq!((a.get(), b.get()), (3, 1));

        // Stays finished without re-invoking anything.
        assert!(h.advance(5, &mut tl));
        assert_eq!((a.get(), b.get()), (3, 1));
    }

    #[test]
    fn empty_timeline_finishes_on_first_advance() {
        let mut h = Harness::new(&[0]);
        let mut tl = Timeline::new(Vec::new());
        assert!(tl.is_empty());
        assert!(h.advance(1, &mut tl));
        assert!(tl.status().finished);
    }

    #[test]
    fn cursor_is_monotonic_and_bounded() {
        let mut h = Harness::new(&[0, 1]);
        let steps = (0..4).map(|i| after_ticks(&format!("s{i}"), i, counter())).collect();
        let mut tl = Timeline::new(steps);
        let mut last = 0;
        for t in 1..=30 {
            h.advance(t, &mut tl);
            assert!(tl.cursor() >= last);
            assert!(tl.cursor() <= tl.len());
            last = tl.cursor();
        }
        assert!(tl.is_finished());
    }

    #[test]
    fn elapsed_is_relative_to_when_the_step_became_current() {
        let mut h = Harness::new(&[0]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut tl = Timeline::new(vec![
            immediate("first", counter()),
            Step::combined_fn("second", move |ctx, _| {
                log.borrow_mut().push(ctx.elapsed);
                Ok(StepResult::RUNNING)
            }),
        ]);
        for t in 10..15 {
            h.advance(t, &mut tl);
        }
        // "second" became current at tick 10 and first ran at tick 11.
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 3]);
        assert_eq!(tl.elapsed(), Some(3));
    }

    #[test]
    fn cascade_runs_next_step_in_the_same_tick() {
        let mut h = Harness::new(&[0]);
        let (a, b) = (counter(), counter());
        let mut tl = Timeline::new(vec![
            immediate("a", a.clone()),
            immediate("b", b.clone()),
            Step::combined("c", Hold),
        ])
        .with_transition(Transition::Cascade);

        assert!(!h.advance(1, &mut tl));
        assert_eq!((a.get(), b.get()), (1, 1));
        assert_eq!(tl.cursor(), 2);
        assert_eq!(tl.current().map(Step::label), Some("c"));
    }

    #[test]
    fn cascade_through_every_step_finishes_in_one_tick() {
        let mut h = Harness::new(&[0]);
        let mut tl = Timeline::new(vec![immediate("a", counter()), immediate("b", counter())])
            .with_transition(Transition::Cascade);
        assert!(h.advance(1, &mut tl));
    }

    #[test]
    fn hold_stalls_forever_and_status_reports_it() {
        let mut h = Harness::new(&[0]);
        let mut tl = Timeline::new(vec![immediate("go", counter()), Step::combined("park", Hold)]);
        for t in 0..50 {
            assert!(!h.advance(t, &mut tl));
        }
        let status = tl.status();
        assert_eq!(status.cursor, 1);
        assert_eq!(status.current_label.as_deref(), Some("park"));
        // "park" first ran at tick 1.
        assert_eq!(status.elapsed, Some(48));
        assert!(!status.finished);
        assert_eq!(status.to_string(), "step 2/2 'park' +48t");
    }

    #[test]
    fn reset_rewinds_cursor_and_anchor() {
        let mut h = Harness::new(&[0]);
        let mut tl = Timeline::new(vec![immediate("a", counter())]);
        assert!(h.advance(1, &mut tl));

        let calls = counter();
        tl.reset(vec![after_ticks("x", 1, calls.clone()), immediate("y", counter())]);
        assert_eq!(tl.cursor(), 0);
        assert!(!h.advance(7, &mut tl));
        assert!(!h.advance(8, &mut tl));
        assert_eq!(tl.cursor(), 1);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn push_resumes_a_finished_timeline() {
        let mut h = Harness::new(&[0]);
        let mut tl = Timeline::new(Vec::new());
        assert!(h.advance(1, &mut tl));
        let calls = counter();
        tl.push(immediate("late", calls.clone()));
        assert!(!tl.is_finished());
        assert!(h.advance(2, &mut tl));
        assert_eq!(calls.get(), 1);
    }
}

// ── Step variants ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;
    use crate::{BehaviorError, Blind, StepKind, Wait};

    #[test]
    fn per_drone_skips_finished_drones() {
        let mut h = Harness::new(&[0, 1, 2]);
        let calls: Rc<RefCell<[u32; 3]>> = Rc::new(RefCell::new([0; 3]));
        let seen = calls.clone();
        // Drone n finishes on its (n + 1)-th invocation.
        let mut tl = Timeline::new(vec![Step::per_drone_fn("stagger", move |ctx, drone| {
            seen.borrow_mut()[drone.id.index()] += 1;
            Ok(StepResult::finished_if(ctx.elapsed >= drone.id.0 as u64))
        })]);

        assert!(!h.advance(0, &mut tl));
        assert!(tl.current().unwrap().is_drone_done(DroneId(0)));
        assert!(!h.advance(1, &mut tl));
        assert!(h.advance(2, &mut tl));
        assert_eq!(*calls.borrow(), [1, 2, 3]);
    }

    #[test]
    fn restart_drives_finished_drones_again() {
        let mut h = Harness::new(&[0, 1]);
        let calls = counter();
        let seen = calls.clone();
        let mut step = Step::per_drone_fn("line up", move |_, _| {
            seen.set(seen.get() + 1);
            Ok(StepResult::DONE)
        });

        assert!(h.invoke(0, &mut step));
        assert!(h.invoke(1, &mut step));
        assert_eq!(calls.get(), 2);

        step.restart();
        assert!(!step.is_drone_done(DroneId(0)));
        assert!(h.invoke(2, &mut step));
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn per_drone_over_empty_group_finishes_immediately() {
        let mut h = Harness::new(&[]);
        let calls = counter();
        let seen = calls.clone();
        let mut tl = Timeline::new(vec![Step::per_drone_fn("nobody", move |_, _| {
            seen.set(seen.get() + 1);
            Ok(StepResult::RUNNING)
        })]);
        assert!(h.advance(0, &mut tl));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn drone_list_sees_every_member_at_once() {
        let mut h = Harness::new(&[3, 1, 2]);
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let log = sizes.clone();
        let mut tl = Timeline::new(vec![Step::drone_list_fn("line up", move |_, drones| {
            log.borrow_mut().push(drones.len());
            for (i, drone) in drones.iter_mut().enumerate() {
                drone.controls.steer = i as f32 * 0.5 - 0.5;
            }
            Ok(StepResult::DONE)
        })]);
        assert!(h.advance(0, &mut tl));
        assert_eq!(*sizes.borrow(), vec![3]);
        assert_eq!(h.registry.get(DroneId(1)).unwrap().controls.steer, -0.5);
        assert_eq!(h.registry.get(DroneId(3)).unwrap().controls.steer, 0.5);
    }

    #[test]
    fn failing_behavior_is_recorded_and_not_finished() {
        let mut h = Harness::new(&[0]);
        let attempts = counter();
        let seen = attempts.clone();
        let mut tl = Timeline::new(vec![Step::combined_fn("flaky", move |_, _| {
            seen.set(seen.get() + 1);
            if seen.get() < 3 {
                Err(BehaviorError::Failed("no target".into()))
            } else {
                Ok(StepResult::DONE)
            }
        })]);

        assert!(!h.advance(1, &mut tl));
        assert!(!h.advance(2, &mut tl));
        assert_eq!(tl.cursor(), 0);
        assert_eq!(h.failures.len(), 2);
        assert_eq!(h.failures[0].step, "flaky");
        assert_eq!(h.failures[0].tick, Tick(1));
        assert_eq!(h.failures[0].drone, None);
        assert!(h.advance(3, &mut tl));
        assert_eq!(attempts.get(), 3);
    }

    #[test]
    fn per_drone_failure_names_the_drone() {
        let mut h = Harness::new(&[4, 5]);
        let mut tl = Timeline::new(vec![Step::per_drone_fn("half broken", |_, drone| {
            if drone.id == DroneId(5) {
                Err(BehaviorError::MissingDrone(drone.id))
            } else {
                Ok(StepResult::DONE)
            }
        })]);
        assert!(!h.advance(1, &mut tl));
        assert!(!h.advance(2, &mut tl));
        assert_eq!(h.failures.len(), 2);
        assert!(h.failures.iter().all(|f| f.drone == Some(DroneId(5))));
        assert_eq!(
            h.failures[0].to_string(),
            "T1 step 'half broken' (DroneId(5)): drone DroneId(5) required by the behavior is not present"
        );
    }

    #[test]
    fn kind_names() {
        assert_eq!(Step::combined("c", Wait { ticks: 1 }).kind_name(), "combined");
        let blind = Step::per_drone("p", Blind { controls: ControlAction::NEUTRAL, ticks: 1 });
        assert_eq!(blind.kind_name(), "per-drone");
        assert!(matches!(blind.kind(), StepKind::PerDrone { .. }));
        assert_eq!(Step::drone_list_fn("l", |_, _| Ok(StepResult::DONE)).kind_name(), "drone-list");
    }
}

// ── Stock behaviors ───────────────────────────────────────────────────────────

#[cfg(test)]
mod stock_tests {
    use super::*;
    use crate::{Blind, Wait};

    #[test]
    fn wait_lasts_exactly_n_ticks_after_becoming_current() {
        let mut h = Harness::new(&[0]);
        let mut tl = Timeline::new(vec![Step::combined("pause", Wait { ticks: 3 })]);
        assert!(!h.advance(10, &mut tl));
        assert!(!h.advance(11, &mut tl));
        assert!(!h.advance(12, &mut tl));
        assert!(h.advance(13, &mut tl));
    }

    #[test]
    fn wait_lasts_the_same_when_it_is_not_the_first_step() {
        let mut h = Harness::new(&[0]);
        let mut tl = Timeline::new(vec![
            immediate("go", counter()),
            Step::combined("pause", Wait { ticks: 3 }),
        ]);
        assert!(!h.advance(10, &mut tl));
        assert_eq!(tl.cursor(), 1);
        for t in 11..=13 {
            assert!(!h.advance(t, &mut tl), "tick {t}");
            assert_eq!(tl.elapsed(), Some(t - 11));
        }
        assert!(h.advance(14, &mut tl));
    }

    #[test]
    fn blind_after_another_step_writes_for_exactly_n_ticks() {
        let mut h = Harness::new(&[0]);
        let full = ControlAction { throttle: 1.0, ..ControlAction::NEUTRAL };
        let mut tl = Timeline::new(vec![
            immediate("go", counter()),
            Step::per_drone("launch", Blind { controls: full, ticks: 2 }),
        ]);
        assert!(!h.advance(0, &mut tl));

        let mut written = 0;
        let mut t = 1;
        while !h.advance(t, &mut tl) {
            if h.registry.get(DroneId(0)).unwrap().controls == full {
                written += 1;
            }
            h.registry.reset_controls();
            t += 1;
        }
        assert_eq!(written, 2);
        assert_eq!(t, 3);
    }

    #[test]
    fn blind_holds_controls_then_finishes() {
        let mut h = Harness::new(&[0, 1]);
        let full = ControlAction { throttle: 1.0, boost: true, ..ControlAction::NEUTRAL };
        let mut tl = Timeline::new(vec![Step::per_drone("launch", Blind { controls: full, ticks: 2 })]);

        assert!(!h.advance(0, &mut tl));
        assert_eq!(h.registry.get(DroneId(1)).unwrap().controls, full);
        h.registry.reset_controls();
        assert!(!h.advance(1, &mut tl));
        h.registry.reset_controls();
        assert!(h.advance(2, &mut tl));
        assert!(h.registry.get(DroneId(0)).unwrap().controls.is_neutral());
    }
}

// ── Collaborators ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod collaborator_tests {
    use super::*;
    use crate::{Color, DrawCommand, RenderEvent, RenderScope, WorldUpdate};

    #[test]
    fn render_groups_close_on_early_return() {
        let mut h = Harness::new(&[0]);
        let mut tl = Timeline::new(vec![Step::combined_fn("draws", |ctx, _| {
            let mut scope = ctx.render_group("draws");
            scope.draw(DrawCommand::Text2d { x: 10, y: 10, text: "hi".into(), color: Color::WHITE });
            let _inner = scope.nested("inner");
            Err(crate::BehaviorError::Failed("bail".into()))
        })]);
        {
            let mut outer = RenderScope::begin(&mut h.renderer, "tick");
            let mut ctx = StepContext::new(
                Tick(1),
                h.clock,
                &h.world,
                &mut h.mutator,
                outer.renderer(),
                &mut h.failures,
            );
            tl.advance(&mut ctx, &mut h.registry.all());
        }
        assert!(h.renderer.is_balanced());
        assert_eq!(h.renderer.draws(), 1);
        assert_eq!(h.renderer.events.first(), Some(&RenderEvent::Begin("tick".into())));
        assert_eq!(h.renderer.events.last(), Some(&RenderEvent::End("tick".into())));
    }

    #[test]
    fn world_updates_reach_the_mutator() {
        let mut h = Harness::new(&[0, 1]);
        let mut tl = Timeline::new(vec![Step::combined_fn("teleport", |ctx, drones| {
            let mut update = WorldUpdate::new();
            for (i, id) in drones.ids().iter().enumerate() {
                let pose = Kinematics::at_rest(Vec3::new(0.0, i as f32 * 200.0, 17.0), Rotator::default());
                update = update.drone(*id, pose);
            }
            ctx.set_world(update);
            ctx.set_world(WorldUpdate::new());
            Ok(StepResult::DONE)
        })]);
        assert!(h.advance(0, &mut tl));
        let updates = h.mutator.drain();
        assert_eq!(updates.len(), 1, "empty updates are dropped");
        assert_eq!(updates[0].drones.len(), 2);
        assert_eq!(updates[0].drones[1].1.position.y, 200.0);
    }
}
