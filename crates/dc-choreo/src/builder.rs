//! Fluent builder for constructing a [`Choreography`].

use dc_drone::DroneRegistry;
use dc_step::{NoopRenderer, Renderer, Step, Timeline};

use crate::{
    ChoreoConfig, ChoreoResult, Choreography, ExpectedDrones, Phase, ReadinessGate,
    ReadinessPredicate, Script,
};

/// Fluent builder for [`Choreography<S>`].
///
/// # Required inputs
///
/// - [`ChoreoConfig`]: tick rate, gating budget, policies, …
/// - `S: Script`: the show
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                            |
/// |-------------------|----------------------------------------------------|
/// | `.registry(r)`    | `DroneRegistry::new()` (every drone claimed)       |
/// | `.readiness(p)`   | `ExpectedDrones::new(config.expected_drones)`      |
/// | `.staging(step)`  | none                                               |
/// | `.renderer(r)`    | `NoopRenderer`                                     |
///
/// # Example
///
/// ```rust,ignore
/// let mut show = ChoreographyBuilder::new(config, AquaScript::default())
///     .registry(DroneRegistryBuilder::new().claim(ids).build())
///     .staging(Step::combined("line up", LineUp))
///     .build()?;
/// show.run(&mut host, &mut NoopObserver)?;
/// ```
pub struct ChoreographyBuilder<S: Script> {
    config:    ChoreoConfig,
    script:    S,
    registry:  Option<DroneRegistry>,
    readiness: Option<Box<dyn ReadinessPredicate>>,
    staging:   Option<Step>,
    renderer:  Option<Box<dyn Renderer>>,
}

impl<S: Script> ChoreographyBuilder<S> {
    pub fn new(config: ChoreoConfig, script: S) -> Self {
        Self {
            config,
            script,
            registry:  None,
            readiness: None,
            staging:   None,
            renderer:  None,
        }
    }

    /// Supply a pre-built (e.g. claim-restricted) registry.
    pub fn registry(mut self, registry: DroneRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the default population gate.
    pub fn readiness(mut self, predicate: impl ReadinessPredicate + 'static) -> Self {
        self.readiness = Some(Box::new(predicate));
        self
    }

    /// Step run on the whole roster every tick while gating.
    pub fn staging(mut self, step: Step) -> Self {
        self.staging = Some(step);
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Validate the config and return a driver in the gating phase.
    pub fn build(self) -> ChoreoResult<Choreography<S>> {
        let clock = self.config.clock()?;
        let readiness = self
            .readiness
            .unwrap_or_else(|| Box::new(ExpectedDrones::new(self.config.expected_drones)));
        let gate = ReadinessGate::boxed(readiness, self.config.max_wait_ticks);
        let timeline = Timeline::new(Vec::new()).with_transition(self.config.transition);

        Ok(Choreography {
            clock,
            script:          self.script,
            registry:        self.registry.unwrap_or_default(),
            gate,
            staging:         self.staging,
            renderer:        self.renderer.unwrap_or_else(|| Box::new(NoopRenderer)),
            timeline,
            phase:           Phase::Gating,
            gate_started:    None,
            last_tick:       None,
            rebuild_pending: false,
            failures:        Vec::new(),
            config:          self.config,
        })
    }
}
