//! Unit tests for dc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{DroneId, DroneSet, Team};

    #[test]
    fn index_roundtrip() {
        let id = DroneId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(DroneId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(DroneId::INVALID.0, u32::MAX);
        assert_eq!(DroneId::default(), DroneId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(DroneId(7).to_string(), "DroneId(7)");
    }

    #[test]
    fn team_sign() {
        assert_eq!(Team::BLUE.sign(), 1.0);
        assert_eq!(Team::ORANGE.sign(), -1.0);
    }

    #[test]
    fn drone_set_dedups() {
        let mut set = DroneSet::default();
        assert!(set.insert(DroneId(1)));
        assert!(!set.insert(DroneId(1)));
        assert_eq!(set.len(), 1);
    }
}

#[cfg(test)]
mod time {
    use crate::{DcError, Tick, TickClock};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn since_saturates() {
        assert_eq!(Tick(12).since(Tick(10)), 2);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn zero_rate_rejected() {
        assert!(matches!(TickClock::new(0), Err(DcError::ZeroTickRate)));
    }

    #[test]
    fn secs_conversion() {
        let clock = TickClock::new(120).unwrap();
        assert_eq!(clock.secs(120), 1.0);
        assert_eq!(clock.secs(60), 0.5);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = TickClock::new(120).unwrap();
        assert_eq!(clock.ticks_for_secs(0.5), 60);
        assert_eq!(clock.ticks_for_secs(6.0), 720);
        // 0.032 s = 3.84 ticks → 4
        assert_eq!(clock.ticks_for_secs(0.032), 4);
        assert_eq!(clock.ticks_for_secs(0.0), 0);
        assert_eq!(clock.ticks_for_secs(-1.0), 0);
    }

    #[test]
    fn default_is_120_hz() {
        assert_eq!(TickClock::default().tick_rate_hz, 120);
    }
}

#[cfg(test)]
mod geom {
    use crate::{Orientation, Rotator, Vec3};

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn vector_ops() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(a + b, Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(a - b, Vec3::new(0.0, 2.0, 3.0));
        assert_eq!(a.dot(b), 1.0);
        assert_eq!(Vec3::new(3.0, 4.0, 0.0).length(), 5.0);
        assert_eq!(a.flat().z, 0.0);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
        assert!((Vec3::new(0.0, 10.0, 0.0).normalized().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn identity_rotator() {
        let o = Rotator::default().orientation();
        assert!(close(o.forward, Orientation::IDENTITY.forward));
        assert!(close(o.right, Orientation::IDENTITY.right));
        assert!(close(o.up, Orientation::IDENTITY.up));
    }

    #[test]
    fn local_coordinates_follow_yaw() {
        // Facing +y: a point ahead along +y is local +x.
        let o = Rotator::yaw(std::f32::consts::FRAC_PI_2).orientation();
        let local = o.to_local(Vec3::ZERO, Vec3::new(0.0, 100.0, 0.0));
        assert!(close(local, Vec3::new(100.0, 0.0, 0.0)), "got {local}");
    }
}

#[cfg(test)]
mod control {
    use crate::ControlAction;

    #[test]
    fn default_is_neutral() {
        assert!(ControlAction::default().is_neutral());
        assert_eq!(ControlAction::default(), ControlAction::NEUTRAL);
    }

    #[test]
    fn clamped_limits_axes() {
        let c = ControlAction { throttle: 3.0, steer: -2.0, pitch: f32::NAN, jump: true, ..ControlAction::NEUTRAL };
        let c = c.clamped();
        assert_eq!(c.throttle, 1.0);
        assert_eq!(c.steer, -1.0);
        assert_eq!(c.pitch, 0.0);
        assert!(c.jump);
    }
}
