//! Unit tests for orca-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ObstacleId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(ObstacleId::default(), ObstacleId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(ObstacleId(3).to_string(), "ObstacleId(3)");
    }
}

#[cfg(test)]
mod time {
    use orca_fixed::Fixed;

    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_display() {
        assert_eq!(Tick::ZERO, Tick(0));
        assert_eq!(Tick(4).to_string(), "T4");
    }

    #[test]
    fn clock_accumulates_time() {
        let mut clock = SimClock::new(Fixed::HALF);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.global_time, Fixed::ONE);
        clock.time_step = Fixed::TWO;
        clock.advance();
        assert_eq!(clock.global_time, Fixed::from_int(3));
    }

    #[test]
    fn config_clock() {
        let cfg = SimConfig { total_steps: 40, ..SimConfig::default() };
        assert_eq!(cfg.end_tick(), Tick(40));
        assert_eq!(cfg.make_clock().time_step, cfg.time_step);
    }
}

#[cfg(test)]
mod config {
    use orca_fixed::Fixed;
    use rstest::rstest;

    use crate::{AGENT_NEIGHBOR_CAPACITY, AgentParams, OrcaError, SimConfig};

    #[test]
    fn defaults_are_valid() {
        assert!(AgentParams::default().validate().is_ok());
        assert!(SimConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero_radius(AgentParams { radius: Fixed::ZERO, ..AgentParams::default() }, "radius")]
    #[case::zero_speed(AgentParams { max_speed: Fixed::ZERO, ..AgentParams::default() }, "max_speed")]
    #[case::negative_speed(AgentParams { max_speed: -Fixed::ONE, ..AgentParams::default() }, "max_speed")]
    #[case::negative_range(AgentParams { neighbor_dist: -Fixed::ONE, ..AgentParams::default() }, "neighbor_dist")]
    #[case::too_many_neighbors(
        AgentParams { max_neighbors: AGENT_NEIGHBOR_CAPACITY + 1, ..AgentParams::default() },
        "max_neighbors"
    )]
    #[case::zero_horizon(AgentParams { time_horizon: Fixed::ZERO, ..AgentParams::default() }, "time_horizon")]
    #[case::zero_obstacle_horizon(
        AgentParams { time_horizon_obst: Fixed::ZERO, ..AgentParams::default() },
        "time_horizon_obst"
    )]
    fn invalid_params_rejected(#[case] params: AgentParams, #[case] field: &str) {
        match params.validate() {
            Err(OrcaError::InvalidParameter { name, .. }) => assert_eq!(name, field),
            other => panic!("expected InvalidParameter({field}), got {other:?}"),
        }
    }

    #[test]
    fn bad_time_step_rejected() {
        let cfg = SimConfig { time_step: Fixed::ZERO, ..SimConfig::default() };
        assert!(matches!(cfg.validate(), Err(OrcaError::Config(_))));
        let cfg = SimConfig { output_interval_steps: 0, ..SimConfig::default() };
        assert!(matches!(cfg.validate(), Err(OrcaError::Config(_))));
    }
}

#[cfg(test)]
mod rng {
    use orca_fixed::Fixed;

    use crate::{AgentId, AgentRng};

    #[test]
    fn agent_streams_reproducible() {
        let mut a = AgentRng::new(99, AgentId(3));
        let mut b = AgentRng::new(99, AgentId(3));
        let (lo, hi) = (Fixed::from_int(-100), Fixed::from_int(100));
        for _ in 0..16 {
            assert_eq!(a.fixed_in(lo, hi), b.fixed_in(lo, hi));
        }
    }

    #[test]
    fn agents_differ() {
        let mut a = AgentRng::new(99, AgentId(3));
        let mut b = AgentRng::new(99, AgentId(4));
        let (lo, hi) = (Fixed::ZERO, Fixed::from_int(1_000_000));
        let xs: Vec<Fixed> = (0..8).map(|_| a.fixed_in(lo, hi)).collect();
        let ys: Vec<Fixed> = (0..8).map(|_| b.fixed_in(lo, hi)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn perturbation_bounded() {
        let mut rng = AgentRng::new(1, AgentId(0));
        let magnitude = Fixed::from_f64(0.01);
        for _ in 0..200 {
            let p = rng.perturbation(magnitude);
            // Table trig may overshoot unit length by a few raw units.
            assert!(p.x.abs() <= magnitude + Fixed::EPSILON);
            assert!(p.y.abs() <= magnitude + Fixed::EPSILON);
        }
    }

    #[test]
    fn fixed_in_range() {
        let mut rng = AgentRng::new(5, AgentId(2));
        for _ in 0..100 {
            let x = rng.fixed_in(-Fixed::ONE, Fixed::TWO);
            assert!(x >= -Fixed::ONE && x <= Fixed::TWO);
        }
        assert_eq!(rng.fixed_in(Fixed::TWO, Fixed::ONE), Fixed::TWO);
    }
}

#[cfg(test)]
mod obstacle {
    use orca_fixed::{Fixed, FixedVector2};

    use crate::{ObstacleId, ObstacleStore, OrcaError};

    fn square() -> Vec<FixedVector2> {
        vec![
            FixedVector2::from_ints(0, 0),
            FixedVector2::from_ints(2, 0),
            FixedVector2::from_ints(2, 2),
            FixedVector2::from_ints(0, 2),
        ]
    }

    #[test]
    fn ring_links() {
        let mut store = ObstacleStore::new();
        let first = store.add_polygon(&square()).unwrap();
        assert_eq!(first, ObstacleId(0));
        assert_eq!(store.len(), 4);
        assert_eq!(store.next(ObstacleId(3)).unwrap().id, ObstacleId(0));
        assert_eq!(store.previous(ObstacleId(0)).unwrap().id, ObstacleId(3));
        assert!(store.iter().all(|o| o.convex));
        assert_eq!(store.obstacle(ObstacleId(1)).unwrap().direction, FixedVector2::from_ints(0, 1));
    }

    #[test]
    fn second_polygon_offsets_ids() {
        let mut store = ObstacleStore::new();
        store.add_polygon(&square()).unwrap();
        let seg = [FixedVector2::from_ints(5, 5), FixedVector2::from_ints(8, 5)];
        let first = store.add_polygon(&seg).unwrap();
        assert_eq!(first, ObstacleId(4));
        assert_eq!(store.polygon_count(), 2);
        let a = store.obstacle(ObstacleId(4)).unwrap();
        assert_eq!(a.next, ObstacleId(5));
        assert_eq!(a.previous, ObstacleId(5));
        assert!(a.convex);
    }

    #[test]
    fn reflex_vertex_detected() {
        // L-shape, counter-clockwise; vertex 3 at (1,1) is reflex.
        let shape = [
            FixedVector2::from_ints(0, 0),
            FixedVector2::from_ints(2, 0),
            FixedVector2::from_ints(2, 1),
            FixedVector2::from_ints(1, 1),
            FixedVector2::from_ints(1, 2),
            FixedVector2::from_ints(0, 2),
        ];
        let mut store = ObstacleStore::new();
        store.add_polygon(&shape).unwrap();
        let convex: Vec<bool> = store.iter().map(|o| o.convex).collect();
        assert_eq!(convex, vec![true, true, true, false, true, true]);
    }

    #[test]
    fn degenerate_rejected_without_side_effects() {
        let mut store = ObstacleStore::new();
        let single = [FixedVector2::ZERO];
        assert!(matches!(store.add_polygon(&single), Err(OrcaError::DegenerateObstacle(_))));

        let repeated = [FixedVector2::ZERO, FixedVector2::ZERO, FixedVector2::from_ints(1, 1)];
        assert!(matches!(store.add_polygon(&repeated), Err(OrcaError::DegenerateObstacle(_))));

        let line = [FixedVector2::ZERO, FixedVector2::from_ints(1, 0), FixedVector2::from_ints(2, 0)];
        assert!(matches!(store.add_polygon(&line), Err(OrcaError::DegenerateObstacle(_))));

        assert!(store.is_empty());
    }

    #[test]
    fn missing_id() {
        let store = ObstacleStore::new();
        assert!(matches!(store.obstacle(ObstacleId(0)), Err(OrcaError::ObstacleNotFound(_))));
    }

    #[test]
    fn unit_directions() {
        let mut store = ObstacleStore::new();
        let tri = [FixedVector2::ZERO, FixedVector2::from_ints(7, 1), FixedVector2::from_ints(-2, 5)];
        store.add_polygon(&tri).unwrap();
        for o in store.iter() {
            assert!((o.direction.abs_sq() - Fixed::ONE).abs().raw() <= 8);
        }
    }
}
