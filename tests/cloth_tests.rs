mod common;

use approx::assert_abs_diff_eq;
use cloth_engine::*;

const DT: f32 = 1.0 / 60.0;

#[test]
fn particle_masses_sum_to_total_mass() {
    let mesh = common::grid(5, 4, 0.1);
    let cloth = ClothSolver::new(&mesh, 3.0).expect("cloth builds");

    assert_eq!(cloth.particles().len(), 20);
    let total: f32 = cloth.particles().iter().map(|p| p.mass()).sum();
    assert_abs_diff_eq!(total, 3.0, epsilon = 1e-5);
    for particle in cloth.particles() {
        assert_abs_diff_eq!(particle.mass(), 3.0 / 20.0, epsilon = 1e-7);
    }
}

#[test]
fn pin_group_pins_exactly_the_named_vertices() {
    let mesh = common::grid(4, 3, 0.1);
    let mut cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");

    let pinned = cloth.pin_group("top").expect("group exists");
    assert_eq!(pinned, 4);
    assert_eq!(cloth.pinned_group(), Some("top"));
    for (index, particle) in cloth.particles().iter().enumerate() {
        assert_eq!(particle.is_movable(), index >= 4, "particle {index}");
    }
}

#[test]
fn missing_group_leaves_everything_movable() {
    let mesh = common::grid(4, 3, 0.1);
    let mut cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");
    cloth.pin_group("top").expect("group exists");

    let err = cloth.pin_group("does-not-exist").unwrap_err();

    assert_eq!(err, ClothError::GroupNotFound("does-not-exist".into()));
    assert_eq!(cloth.pinned_group(), None);
    assert!(cloth.particles().iter().all(|p| p.is_movable()));
}

#[test]
fn non_vertex_group_cannot_be_pinned() {
    let mesh = common::grid_builder(3, 3, 0.1)
        .group("faces", VertexGroup::new(GroupKind::Face, vec![0, 1]))
        .build()
        .expect("mesh builds");
    let mut cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");

    let err = cloth.pin_group("faces").unwrap_err();

    assert_eq!(err, ClothError::NotAVertexGroup("faces".into()));
    assert!(cloth.particles().iter().all(|p| p.is_movable()));
}

#[test]
fn springs_start_at_rest_length() {
    let mesh = common::grid(6, 6, 0.25);
    let cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");

    assert!(cloth.springs().count() > 0);
    for spring in cloth.springs() {
        assert_eq!(spring.deformation(cloth.particles()), 0.0);
        assert!(spring.rest_length() > 0.0);
    }
}

#[test]
fn fully_pinned_cloth_never_moves() {
    let mesh = common::grid_builder(4, 4, 0.5)
        .vertex_group("all", (0..16).collect())
        .build()
        .expect("mesh builds");
    let mut cloth = ClothSolver::with_config(
        &mesh,
        2.0,
        ClothConfig::default().with_wind(true).with_bending(true),
    )
    .expect("cloth builds");
    cloth.pin_group("all").expect("group exists");
    let before = cloth.export_positions();

    for dt in [DT, 1.0 / 30.0, 0.5] {
        for _ in 0..10 {
            cloth.step(dt);
        }
    }

    assert_eq!(cloth.export_positions(), before);
}

#[test]
fn free_particle_falls_half_g_dt_squared() {
    let mesh = PolygonMesh::builder(vec![Vec3::ZERO])
        .build()
        .expect("single vertex mesh");
    let mut cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");
    assert!(cloth.constraints().is_empty());

    cloth.step(DT);

    let expected = -0.5 * 9.81 * DT * DT;
    let position = cloth.export_positions()[0];
    assert_abs_diff_eq!(position.y, expected, epsilon = 1e-6);
    assert_eq!(position.x, 0.0);
    assert_eq!(position.z, 0.0);
}

#[test]
fn free_fall_tracks_analytic_solution_over_many_steps() {
    let mesh = PolygonMesh::builder(vec![Vec3::ZERO])
        .build()
        .expect("single vertex mesh");
    let mut cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");

    for _ in 0..30 {
        cloth.step(DT);
    }

    let t = 30.0 * DT;
    assert_abs_diff_eq!(cloth.export_positions()[0].y, -0.5 * 9.81 * t * t, epsilon = 1e-3);
}

#[test]
fn invalid_time_step_is_ignored() {
    let mesh = common::grid(3, 3, 0.1);
    let mut cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");
    let before = cloth.export_positions();

    cloth.step(0.0);
    cloth.step(-DT);
    cloth.step(f32::NAN);

    assert_eq!(cloth.export_positions(), before);
    assert_eq!(cloth.wind_force(), Vec3::ZERO);
}

#[test]
fn wind_accumulates_but_does_not_move_cloth_by_default() {
    let mesh = common::grid(4, 4, 0.2);
    let mut calm = ClothSolver::with_config(&mesh, 4.0, ClothConfig::default().with_seed(1))
        .expect("cloth builds");
    let mut other = ClothSolver::with_config(&mesh, 4.0, ClothConfig::default().with_seed(99))
        .expect("cloth builds");

    for _ in 0..20 {
        calm.step(DT);
        other.step(DT);
    }

    assert_ne!(calm.wind_force(), Vec3::ZERO);
    assert_ne!(calm.wind_force(), other.wind_force());
    assert_eq!(calm.export_positions(), other.export_positions());
}

#[test]
fn enabled_wind_pushes_particles_sideways() {
    let mesh = PolygonMesh::builder(vec![Vec3::ZERO])
        .build()
        .expect("single vertex mesh");
    let mut cloth = ClothSolver::with_config(&mesh, 1.0, ClothConfig::default().with_wind(true))
        .expect("cloth builds");

    for _ in 0..10 {
        cloth.step(DT);
    }

    let position = cloth.export_positions()[0];
    assert!(position.x != 0.0 || position.z != 0.0);
}

#[test]
fn equal_seeds_reproduce_the_same_simulation() {
    let mesh = common::grid(5, 5, 0.2);
    let config = ClothConfig::default().with_wind(true).with_seed(1234);
    let mut a = ClothSolver::with_config(&mesh, 5.0, config.clone()).expect("cloth builds");
    let mut b = ClothSolver::with_rng(&mesh, 5.0, config, WindRng::new(1234)).expect("cloth builds");
    a.pin_group("top").expect("group exists");
    b.pin_group("top").expect("group exists");

    for _ in 0..15 {
        a.step(DT);
        b.step(DT);
    }

    assert_eq!(a.export_positions(), b.export_positions());
    assert_eq!(a.wind_force(), b.wind_force());
}

#[test]
fn reseed_restarts_the_wind_sequence() {
    let mesh = common::grid(3, 3, 0.2);
    let mut cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");
    cloth.step(DT);
    let first = cloth.wind_force();

    cloth.reseed(config::DEFAULT_SEED);
    assert_eq!(cloth.wind_force(), Vec3::ZERO);
    cloth.step(DT);

    assert_eq!(cloth.wind_force(), first);
}

#[test]
fn hanging_cloth_falls_while_pinned_row_stays() {
    let mesh = common::grid(6, 6, 0.2);
    let mut cloth = ClothSolver::with_config(
        &mesh,
        10.0,
        ClothConfig::default().with_stretch_limit(Some(1.1)),
    )
    .expect("cloth builds");
    cloth.pin_group("top").expect("group exists");
    let before = cloth.export_positions();

    for _ in 0..30 {
        cloth.step(DT);
    }

    let after = cloth.export_positions();
    assert!(after.iter().all(|p| p.is_finite()));
    for i in 0..6 {
        assert_eq!(after[i], before[i]);
    }
    for i in 6..after.len() {
        assert!(after[i].y < before[i].y, "particle {i} should sag");
    }
}

#[test]
fn export_preserves_vertex_order_and_count() {
    let mesh = common::grid(4, 2, 1.0);
    let cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");

    let positions = cloth.export_positions();
    assert_eq!(positions, mesh.positions());

    let mut reused = vec![Vec3::splat(7.0); 32];
    cloth.export_positions_into(&mut reused);
    assert_eq!(reused, positions);

    let flat = cloth.export_flat();
    assert_eq!(flat.len(), positions.len() * 3);
    assert_eq!(flat[3], positions[1].x);
}

#[test]
fn invalid_construction_inputs_are_rejected() {
    let mesh = common::grid(2, 2, 1.0);
    assert_eq!(
        ClothSolver::new(&mesh, 0.0).unwrap_err(),
        ClothError::InvalidMass(0.0)
    );
    assert!(matches!(
        ClothSolver::new(&mesh, -1.0),
        Err(ClothError::InvalidMass(_))
    ));

    let empty = PolygonMesh::builder(Vec::new()).build().expect("empty mesh");
    assert_eq!(ClothSolver::new(&empty, 1.0).unwrap_err(), ClothError::EmptyMesh);
}

#[test]
fn coefficient_updates_reach_matching_springs_only() {
    let mesh = common::grid(3, 3, 0.5);
    let mut cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");
    let tuned = SpringCoefficients::new(4.0, 0.1);

    cloth.set_coefficients(SpringType::Shear, tuned);

    for spring in cloth.springs() {
        match spring.kind() {
            SpringKind::Shear => {
                assert_eq!(spring.tension(), tuned);
                assert_eq!(spring.compression(), tuned);
            }
            SpringKind::Structural => {
                assert_eq!(spring.tension(), config::DEFAULT_COEFFICIENTS.tension);
            }
        }
    }
    assert_eq!(cloth.config().coefficients.shear, tuned);
}

#[test]
fn engine_advances_in_fixed_steps() {
    let mesh = common::grid(3, 3, 0.5);
    let cloth = ClothSolver::new(&mesh, 1.0).expect("cloth builds");
    let mut engine = ClothEngine::new(cloth);

    assert_eq!(engine.advance(1.0 / 30.0), 2);
    assert_eq!(engine.advance(0.001), 0);
    assert_eq!(engine.advance(10.0), config::DEFAULT_MAX_STEPS_PER_FRAME);
    assert_eq!(engine.advance(-1.0), 0);
    assert!(engine.solver().profiler().substeps >= 1);
}

#[test]
fn extra_force_generators_are_applied() {
    let mesh = PolygonMesh::builder(vec![Vec3::ZERO])
        .build()
        .expect("single vertex mesh");
    let config = ClothConfig::default().with_gravity(Vec3::ZERO);
    let mut still = ClothSolver::with_config(&mesh, 1.0, config.clone()).expect("cloth builds");
    let mut pushed = ClothSolver::with_config(&mesh, 1.0, config).expect("cloth builds");
    pushed.forces_mut().add_force(GravityForce::new(Vec3::X));

    still.step(DT);
    pushed.step(DT);

    assert_eq!(still.export_positions()[0], Vec3::ZERO);
    assert!(pushed.export_positions()[0].x > 0.0);
}

#[test]
fn dense_hanging_cloth_stays_bounded() {
    let n = 33;
    let mesh = common::grid(n, n, 1.0 / (n - 1) as f32);
    let mut cloth = ClothSolver::new(&mesh, 10.0).expect("cloth builds");
    cloth.pin_group("top").expect("group exists");

    for step in 0..300 {
        cloth.step(DT);
        let furthest = cloth
            .particles()
            .iter()
            .map(|p| p.position.length())
            .fold(0.0f32, f32::max);
        assert!(
            furthest.is_finite() && furthest < 1e3,
            "cloth diverged at step {step}: {furthest}"
        );
    }
}

#[test]
fn vanishing_particle_mass_is_rejected() {
    let mesh = common::grid(2, 2, 1.0);

    assert_eq!(
        ClothSolver::new(&mesh, 1e-45).unwrap_err(),
        ClothError::InvalidMass(1e-45)
    );
}

#[test]
fn wind_is_perturbed_once_per_step_regardless_of_substeps() {
    let mesh = common::grid(3, 3, 0.2);
    let mut cloth = ClothSolver::with_config(&mesh, 1.0, ClothConfig::default().with_substeps(4))
        .expect("cloth builds");

    cloth.step(DT);

    let mut rng = WindRng::new(config::DEFAULT_SEED);
    assert_eq!(cloth.wind_force(), rng.point_on_sphere(config::WIND_PRESSURE));
}

#[test]
fn deserialized_stretch_limit_below_one_is_discarded() {
    let config: ClothConfig =
        serde_json::from_str(r#"{ "stretch_limit": 0.5 }"#).expect("config parses");
    assert_eq!(config.stretch_limit, Some(0.5));

    let mesh = common::grid(4, 4, 0.25);
    let mut cloth = ClothSolver::with_config(&mesh, 4.0, config).expect("cloth builds");
    assert_eq!(cloth.config().stretch_limit, None);

    cloth.step(DT);
    for spring in cloth.springs() {
        assert!(spring.deformation(cloth.particles()) > -0.1 * spring.rest_length());
    }
}
