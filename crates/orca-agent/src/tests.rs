//! Unit tests for orca-agent: linear programs, ORCA lines, agent phases.

#[cfg(test)]
mod linear_program {
    use orca_fixed::{Fixed, FixedVector2};
    use rstest::rstest;

    use crate::{Line, solve, solve_all, solve_line};

    fn v(x: f64, y: f64) -> FixedVector2 {
        FixedVector2::from_f64(x, y)
    }

    #[rstest]
    #[case(v(1.0, 0.5))]
    #[case(v(-0.25, 1.75))]
    #[case(FixedVector2::ZERO)]
    fn unconstrained_inside_disc_is_exact(#[case] target: FixedVector2) {
        let out = solve(&[], Fixed::TWO, target, false).unwrap();
        assert_eq!(out.result, target);
        assert_eq!(out.failed_at, None);
    }

    #[test]
    fn unconstrained_outside_disc_is_clamped() {
        let out = solve(&[], Fixed::TWO, v(3.0, 4.0), false).unwrap();
        assert!((out.result - v(1.2, 1.6)).abs_sq().raw() <= 4, "{:?}", out.result);
    }

    #[test]
    fn single_line_projects_target() {
        // Permitted: x <= 1.
        let lines = [Line::new(FixedVector2::from_ints(1, 0), FixedVector2::from_ints(0, 1))];
        let out = solve(&lines, Fixed::from_int(5), FixedVector2::from_ints(3, 0), false).unwrap();
        assert_eq!(out.result, FixedVector2::from_ints(1, 0));
        assert_eq!(out.failed_at, None);
    }

    #[test]
    fn line_outside_disc_fails_in_one_dimension() {
        let lines = [Line::new(FixedVector2::from_ints(3, 0), FixedVector2::from_ints(0, 1))];
        assert_eq!(solve_line(&lines, 0, Fixed::ONE, FixedVector2::ZERO, false).unwrap(), None);
    }

    #[test]
    fn direction_opt_takes_extreme_point() {
        let lines = [Line::new(FixedVector2::ZERO, FixedVector2::from_ints(0, 1))];
        let got = solve_line(&lines, 0, Fixed::from_int(2), FixedVector2::from_ints(0, 1), true).unwrap().unwrap();
        assert_eq!(got, FixedVector2::from_ints(0, 2));
    }

    fn opposing_walls() -> [Line; 2] {
        [
            // x <= -1
            Line::new(FixedVector2::from_ints(-1, 0), FixedVector2::from_ints(0, 1)),
            // x >= 1
            Line::new(FixedVector2::from_ints(1, 0), FixedVector2::from_ints(0, -1)),
        ]
    }

    #[test]
    fn infeasible_reports_failing_line() {
        let lines = opposing_walls();
        let out = solve(&lines, Fixed::from_int(5), FixedVector2::ZERO, false).unwrap();
        assert_eq!(out.failed_at, Some(1));
        assert_eq!(out.result, FixedVector2::from_ints(-1, 0));
    }

    #[test]
    fn fallback_minimises_worst_violation() {
        let lines = opposing_walls();
        let out = solve(&lines, Fixed::from_int(5), FixedVector2::ZERO, false).unwrap();
        let failed_at = out.failed_at.unwrap();
        let v = solve_all(&lines, 0, failed_at, Fixed::from_int(5), out.result).unwrap();
        assert_eq!(v.x, Fixed::ZERO);
        let worst = lines.iter().map(|l| l.violation(v)).max().unwrap();
        assert_eq!(worst, Fixed::ONE);
    }

    #[test]
    fn fallback_keeps_obstacle_lines_hard() {
        let lines = opposing_walls();
        // Treat the first wall as an obstacle line.
        let out = solve(&lines, Fixed::from_int(5), FixedVector2::ZERO, false).unwrap();
        let v = solve_all(&lines, 1, out.failed_at.unwrap(), Fixed::from_int(5), out.result).unwrap();
        assert!(!lines[0].is_violated_by(v), "{v:?}");
    }
}

#[cfg(test)]
mod reciprocity {
    use orca_core::AgentId;
    use orca_fixed::{Fixed, FixedVector2};

    use crate::AgentSnapshot;
    use crate::orca::{Subject, reciprocal_line};

    fn v(x: f64, y: f64) -> FixedVector2 {
        FixedVector2::from_f64(x, y)
    }

    fn pair(
        a: (FixedVector2, FixedVector2, f64),
        b: (FixedVector2, FixedVector2, f64),
    ) -> ((crate::Line, FixedVector2), (crate::Line, FixedVector2), FixedVector2, FixedVector2) {
        let subject_a = Subject { id: AgentId(0), position: a.0, velocity: a.1, radius: Fixed::from_f64(a.2) };
        let subject_b = Subject { id: AgentId(1), position: b.0, velocity: b.1, radius: Fixed::from_f64(b.2) };
        let snap = |p: &Subject| AgentSnapshot { id: p.id, position: p.position, velocity: p.velocity, radius: p.radius };
        let inv_tau = Fixed::HALF;
        let inv_dt = Fixed::from_int(4);
        let la = reciprocal_line(&subject_a, &snap(&subject_b), inv_tau, inv_dt).unwrap();
        let lb = reciprocal_line(&subject_b, &snap(&subject_a), inv_tau, inv_dt).unwrap();
        (la, lb, a.1, b.1)
    }

    #[test]
    fn head_on_half_responsibility() {
        let ((line_a, u_a), (line_b, u_b), va, vb) =
            pair((v(0.0, 0.0), v(1.0, 0.0), 0.5), (v(3.0, 0.0), v(-1.0, 0.0), 0.5));
        assert_eq!(line_a.point, va + u_a * Fixed::HALF);
        assert_eq!(line_b.point, vb + u_b * Fixed::HALF);
        assert_eq!(u_a, -u_b);
        assert!(!u_a.is_zero());
        assert!((line_a.direction.abs_sq() - Fixed::ONE).abs().raw() <= 16);
    }

    #[test]
    fn asymmetric_pair_is_still_reciprocal() {
        let ((line_a, u_a), (line_b, u_b), va, vb) =
            pair((v(0.0, 0.0), v(1.0, 0.2), 0.5), (v(2.0, 1.0), v(-0.5, 0.0), 0.7));
        assert_eq!(line_a.point, va + u_a * Fixed::HALF);
        assert_eq!(line_b.point, vb + u_b * Fixed::HALF);
        let sum = u_a + u_b;
        assert!(sum.x.abs().raw() <= 2 && sum.y.abs().raw() <= 2, "u_a={u_a:?} u_b={u_b:?}");
    }

    #[test]
    fn overlapping_pair_uses_time_step_cutoff() {
        let ((line_a, u_a), (_, u_b), va, _) =
            pair((v(0.0, 0.0), v(0.5, 0.0), 0.5), (v(0.6, 0.0), v(-0.5, 0.0), 0.5));
        assert_eq!(line_a.point, va + u_a * Fixed::HALF);
        assert_eq!(u_a, -u_b);
        // Pushed apart along x: A's correction points away from B.
        assert!(u_a.x.is_negative());
    }

    #[test]
    fn coincident_identical_agents_split_by_handle() {
        let ((line_a, u_a), (line_b, u_b), _, _) =
            pair((v(1.0, 1.0), v(0.0, 0.0), 0.5), (v(1.0, 1.0), v(0.0, 0.0), 0.5));
        assert_eq!(u_a, -u_b);
        assert!(u_a.x.is_negative());
        assert!(u_a.y.is_zero());
        assert_eq!(line_a.direction.abs_sq(), Fixed::ONE);
        assert_eq!(line_b.direction, -line_a.direction);
    }
}

#[cfg(test)]
mod agent {
    use orca_core::{AgentId, AgentParams, ObstacleId, ObstacleStore, OrcaError};
    use orca_fixed::{Fixed, FixedVector2};
    use orca_spatial::{AgentTree, ObstacleTree};

    use crate::{Agent, AgentSnapshot, StepContext};

    fn v(x: f64, y: f64) -> FixedVector2 {
        FixedVector2::from_f64(x, y)
    }

    fn params(radius: f64, max_speed: f64) -> AgentParams {
        AgentParams {
            radius: Fixed::from_f64(radius),
            max_speed: Fixed::from_f64(max_speed),
            neighbor_dist: Fixed::from_int(15),
            max_neighbors: 10,
            time_horizon: Fixed::TWO,
            time_horizon_obst: Fixed::TWO,
        }
    }

    /// Run both compute phases for `agents[index]` against `agents` and
    /// `store`.
    fn compute(agents: &mut [Agent], index: usize, store: &ObstacleStore) {
        let snapshots: Vec<Option<AgentSnapshot>> = agents.iter().map(|a| Some(a.snapshot())).collect();
        let mut tree = AgentTree::new();
        tree.rebuild(agents.iter().map(|a| (a.id, a.position)));
        let obstacle_tree = ObstacleTree::build(store).unwrap();
        let ctx = StepContext::new(&snapshots, &tree, store, &obstacle_tree, Fixed::from_f64(0.25)).unwrap();
        agents[index].compute_neighbors(&ctx).unwrap();
        agents[index].compute_new_velocity(&ctx).unwrap();
    }

    fn square(store: &mut ObstacleStore) {
        store
            .add_polygon(&[
                FixedVector2::from_ints(0, 0),
                FixedVector2::from_ints(2, 0),
                FixedVector2::from_ints(2, 2),
                FixedVector2::from_ints(0, 2),
            ])
            .unwrap();
    }

    #[test]
    fn lone_agent_keeps_preferred_velocity() {
        let mut agent = Agent::new(AgentId(0), FixedVector2::ZERO, params(0.5, 2.0)).unwrap();
        agent.pref_velocity = v(1.0, 0.5);
        let mut agents = [agent];
        compute(&mut agents, 0, &ObstacleStore::new());
        assert!(agents[0].orca_lines().is_empty());
        assert_eq!(agents[0].new_velocity(), v(1.0, 0.5));
    }

    #[test]
    fn lone_agent_clamped_to_max_speed() {
        let mut agent = Agent::new(AgentId(0), FixedVector2::ZERO, params(0.5, 2.0)).unwrap();
        agent.pref_velocity = v(3.0, 0.0);
        let mut agents = [agent];
        compute(&mut agents, 0, &ObstacleStore::new());
        let got = agents[0].new_velocity();
        assert!((got.x - Fixed::TWO).abs().raw() <= 2, "{got:?}");
        assert!(got.y.is_zero());
    }

    #[test]
    fn update_commits_velocity_and_moves() {
        let mut agent = Agent::new(AgentId(0), FixedVector2::ZERO, params(0.5, 2.0)).unwrap();
        agent.pref_velocity = v(1.0, 0.0);
        let mut agents = [agent];
        compute(&mut agents, 0, &ObstacleStore::new());
        agents[0].update(Fixed::HALF);
        assert_eq!(agents[0].velocity, v(1.0, 0.0));
        assert_eq!(agents[0].position, v(0.5, 0.0));
    }

    #[test]
    fn convex_vertex_overlap_pushes_outward() {
        let mut store = ObstacleStore::new();
        square(&mut store);
        let mut agent = Agent::new(AgentId(0), v(2.5, 2.5), params(1.0, 1.0)).unwrap();
        agent.pref_velocity = v(-0.7, -0.7);
        let mut agents = [agent];
        compute(&mut agents, 0, &store);

        let a = &agents[0];
        assert_eq!(a.num_obstacle_lines(), 1);
        let line = a.orca_lines()[0];
        assert!((line.direction.abs_sq() - Fixed::ONE).abs().raw() <= 16);
        let outward = a.position - FixedVector2::from_ints(2, 2);
        assert!(!line.direction.perp_ccw().dot(outward).is_negative());
        assert!(!line.is_violated_by(a.new_velocity()), "{:?}", a.new_velocity());
    }

    #[test]
    fn segment_overlap_line_runs_along_edge() {
        let mut store = ObstacleStore::new();
        store.add_polygon(&[FixedVector2::from_ints(0, 0), FixedVector2::from_ints(4, 0)]).unwrap();
        let agent = Agent::new(AgentId(0), v(1.0, -0.5), params(1.0, 1.0)).unwrap();
        let mut agents = [agent];
        compute(&mut agents, 0, &store);

        let lines = agents[0].orca_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].point, FixedVector2::ZERO);
        assert_eq!(lines[0].direction, FixedVector2::from_ints(-1, 0));
    }

    fn assert_near(got: FixedVector2, x: f64, y: f64) {
        let tol = 0.002;
        assert!((got.x.to_f64() - x).abs() < tol && (got.y.to_f64() - y).abs() < tol, "{got:?} vs ({x}, {y})");
    }

    /// L-shape with a reflex vertex at (1, 1).
    fn l_shape(store: &mut ObstacleStore) {
        store
            .add_polygon(&[
                FixedVector2::from_ints(0, 0),
                FixedVector2::from_ints(2, 0),
                FixedVector2::from_ints(2, 1),
                FixedVector2::from_ints(1, 1),
                FixedVector2::from_ints(1, 2),
                FixedVector2::from_ints(0, 2),
            ])
            .unwrap();
    }

    #[test]
    fn corner_right_cutoff_covers_second_edge() {
        let mut store = ObstacleStore::new();
        square(&mut store);
        let mut agents = [Agent::new(AgentId(0), v(3.0, 3.0), params(0.5, 1.0)).unwrap()];
        compute(&mut agents, 0, &store);

        let a = &agents[0];
        // Both edges meeting at (2,2) are equally near; the lower id comes first.
        let ids: Vec<ObstacleId> = a.obstacle_neighbors().iter().map(|&(_, id)| id).collect();
        assert_eq!(ids, vec![ObstacleId(1), ObstacleId(2)]);
        assert_eq!(a.num_obstacle_lines(), 1);
        let line = a.orca_lines()[0];
        assert_near(line.direction, 0.70711, -0.70711);
        assert_near(line.point, -0.32322, -0.32322);
    }

    #[test]
    fn corner_left_cutoff_covers_second_edge() {
        let mut store = ObstacleStore::new();
        square(&mut store);
        let mut agents = [Agent::new(AgentId(0), v(-1.0, -1.0), params(0.5, 1.0)).unwrap()];
        compute(&mut agents, 0, &store);

        let a = &agents[0];
        let ids: Vec<ObstacleId> = a.obstacle_neighbors().iter().map(|&(_, id)| id).collect();
        assert_eq!(ids, vec![ObstacleId(0), ObstacleId(3)]);
        assert_eq!(a.num_obstacle_lines(), 1);
        let line = a.orca_lines()[0];
        assert_near(line.direction, -0.70711, 0.70711);
        assert_near(line.point, 0.32322, 0.32322);
    }

    #[test]
    fn foreign_leg_adds_no_line() {
        let mut store = ObstacleStore::new();
        square(&mut store);
        let mut agent = Agent::new(AgentId(0), v(-1.0, -1.0), params(0.5, 1.0)).unwrap();
        // Nearest to the left leg of the bottom edge, which lies along the
        // left edge: only the left edge's cutoff constrains.
        agent.velocity = v(0.3, 1.5);
        let mut agents = [agent];
        compute(&mut agents, 0, &store);

        let a = &agents[0];
        assert_eq!(a.obstacle_neighbors().len(), 2);
        assert_eq!(a.num_obstacle_lines(), 1);
        let line = a.orca_lines()[0];
        assert_eq!(line.direction, FixedVector2::from_ints(0, 1));
        assert_near(line.point, 0.25, 1.5);
    }

    #[test]
    fn oblique_edge_uses_its_near_vertex_only() {
        let mut store = ObstacleStore::new();
        store.add_polygon(&[FixedVector2::from_ints(0, 0), FixedVector2::from_ints(4, 0)]).unwrap();
        let mut agent = Agent::new(AgentId(0), v(-2.0, -0.25), params(0.5, 1.0)).unwrap();
        agent.velocity = v(2.0, 0.0);
        let mut agents = [agent];
        compute(&mut agents, 0, &store);

        let a = &agents[0];
        assert_eq!(a.obstacle_neighbors().len(), 1);
        assert_eq!(a.num_obstacle_lines(), 1);
        // Right leg of the disc around (0,0), not of the far vertex (4,0).
        let line = a.orca_lines()[0];
        assert_near(line.direction, -0.99203, 0.12600);
        assert!((line.direction.abs_sq() - Fixed::ONE).abs().raw() <= 16);
    }

    #[test]
    fn reflex_vertex_legs_follow_the_edges() {
        let mut store = ObstacleStore::new();
        l_shape(&mut store);
        let mut agents = [Agent::new(AgentId(0), v(1.6, 1.6), params(0.25, 1.0)).unwrap()];
        compute(&mut agents, 0, &store);

        let a = &agents[0];
        let ids: Vec<ObstacleId> = a.obstacle_neighbors().iter().map(|&(_, id)| id).collect();
        assert_eq!(ids, vec![ObstacleId(2), ObstacleId(3)]);
        let dirs: Vec<FixedVector2> = a.orca_lines().iter().map(|l| l.direction).collect();
        assert_eq!(dirs, vec![FixedVector2::from_ints(1, 0), FixedVector2::from_ints(0, -1)]);
        assert_near(a.orca_lines()[0].point, 0.2, -0.175);
        assert_near(a.orca_lines()[1].point, -0.175, -0.3);
    }

    #[test]
    fn overlapping_reflex_vertex_adds_no_line() {
        let mut store = ObstacleStore::new();
        l_shape(&mut store);
        let mut agents = [Agent::new(AgentId(0), v(1.3, 0.8), params(0.5, 1.0)).unwrap()];
        compute(&mut agents, 0, &store);

        let a = &agents[0];
        assert_eq!(a.obstacle_neighbors().len(), 1);
        assert_eq!(a.obstacle_neighbors()[0].1, ObstacleId(3));
        assert!(a.orca_lines().is_empty());
    }

    #[test]
    fn distant_agent_leg_is_unit_length() {
        let mut p = params(0.5, 1.0);
        p.neighbor_dist = Fixed::from_int(1000);
        // Closing fast enough that the cone's legs, not its cutoff, apply.
        let mut a = Agent::new(AgentId(0), v(0.0, 0.0), p).unwrap();
        a.velocity = v(300.0, 0.0);
        let b = Agent::new(AgentId(1), v(500.0, 3.0), p).unwrap();
        let mut agents = [a, b];
        compute(&mut agents, 0, &ObstacleStore::new());

        let line = agents[0].orca_lines()[0];
        assert!((line.direction.abs_sq() - Fixed::ONE).abs().raw() <= 64, "{:?}", line.direction);
    }

    #[test]
    fn distant_obstacle_ignored() {
        let mut store = ObstacleStore::new();
        square(&mut store);
        let mut agent = Agent::new(AgentId(0), v(30.0, 30.0), params(0.5, 1.0)).unwrap();
        agent.pref_velocity = v(1.0, 0.0);
        let mut agents = [agent];
        compute(&mut agents, 0, &store);
        assert!(agents[0].obstacle_neighbors().is_empty());
        assert_eq!(agents[0].new_velocity(), v(1.0, 0.0));
    }

    #[test]
    fn neighbours_found_and_lines_built() {
        let mut a = Agent::new(AgentId(0), v(0.0, 0.0), params(0.5, 1.0)).unwrap();
        let mut b = Agent::new(AgentId(1), v(3.0, 0.0), params(0.5, 1.0)).unwrap();
        a.velocity = v(1.0, 0.0);
        a.pref_velocity = v(1.0, 0.0);
        b.velocity = v(-1.0, 0.0);
        b.pref_velocity = v(-1.0, 0.0);
        let mut agents = [a, b];
        compute(&mut agents, 0, &ObstacleStore::new());
        assert_eq!(agents[0].agent_neighbors(), &[(Fixed::from_int(9), AgentId(1))]);
        assert_eq!(agents[0].orca_lines().len(), 1);
        assert!(agents[0].new_velocity().x < Fixed::ONE);
    }

    #[test]
    fn zero_max_neighbors_sees_no_agents() {
        let mut p = params(0.5, 1.0);
        p.max_neighbors = 0;
        let a = Agent::new(AgentId(0), v(0.0, 0.0), p).unwrap();
        let b = Agent::new(AgentId(1), v(1.0, 0.0), p).unwrap();
        let mut agents = [a, b];
        compute(&mut agents, 0, &ObstacleStore::new());
        assert!(agents[0].agent_neighbors().is_empty());
    }

    #[test]
    fn invalid_params_rejected() {
        let bad = AgentParams { radius: Fixed::ZERO, ..AgentParams::default() };
        assert!(matches!(Agent::new(AgentId(0), FixedVector2::ZERO, bad), Err(OrcaError::InvalidParameter { .. })));

        let mut agent = Agent::new(AgentId(0), FixedVector2::ZERO, AgentParams::default()).unwrap();
        assert!(agent.set_params(bad).is_err());
        assert_eq!(*agent.params(), AgentParams::default());
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let agent = Agent::new(AgentId(0), FixedVector2::ZERO, AgentParams::default()).unwrap();
        let snapshots = vec![Some(agent.snapshot())];
        let tree = AgentTree::new();
        let store = ObstacleStore::new();
        let obstacle_tree = ObstacleTree::build(&store).unwrap();
        let ctx = StepContext::new(&snapshots, &tree, &store, &obstacle_tree, Fixed::ONE).unwrap();
        assert!(ctx.agent(AgentId(5)).is_err());
        assert!(StepContext::new(&snapshots, &tree, &store, &obstacle_tree, Fixed::ZERO).is_err());
    }
}
