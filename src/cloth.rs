use std::collections::HashMap;
use std::time::Instant;

use glam::Vec3;
use log::{debug, warn};

use crate::{
    config::ClothConfig,
    core::{
        bending::BendingConstraint,
        constraints::{Constraint, ParticleConstraint},
        mesh::{Aabb, GroupKind, MeshTopology, VertexGroup},
        particle::Particle,
        spring::{SpringConstraint, SpringKind},
        topology::Topology,
        types::{SpringCoefficients, SpringType},
    },
    dynamics::{
        forces::{ForceGenerator, ForceRegistry, GravityForce, WindField},
        integrator::Integrator,
    },
    error::{ClothError, ClothResult},
    utils::{
        logging::{warn_if_step_budget_exceeded, ScopedTimer},
        math::flatten,
        profiling::StepProfiler,
        random::WindRng,
    },
};

/// One simulated cloth sheet: particles, their spring network and the
/// external forces driving them.
///
/// Particles map one-to-one onto the vertices of the mesh the cloth was built
/// from and keep that order, so [`ClothSolver::export_positions`] can be
/// uploaded straight into the renderer's vertex buffer.
#[derive(Debug)]
pub struct ClothSolver {
    particles: Vec<Particle>,
    constraints: Vec<Constraint>,
    groups: HashMap<String, VertexGroup>,
    pinned_group: Option<String>,
    config: ClothConfig,
    gravity: GravityForce,
    wind: WindField,
    rng: WindRng,
    forces: ForceRegistry,
    integrator: Integrator,
    profiler: StepProfiler,
    total_mass: f32,
}

impl ClothSolver {
    /// Builds a cloth with default settings.
    pub fn new<M: MeshTopology + ?Sized>(mesh: &M, total_mass: f32) -> ClothResult<Self> {
        Self::with_config(mesh, total_mass, ClothConfig::default())
    }

    pub fn with_config<M: MeshTopology + ?Sized>(
        mesh: &M,
        total_mass: f32,
        config: ClothConfig,
    ) -> ClothResult<Self> {
        let rng = WindRng::new(config.seed);
        Self::with_rng(mesh, total_mass, config, rng)
    }

    /// Builds a cloth that draws its wind perturbations from `rng`.
    pub fn with_rng<M: MeshTopology + ?Sized>(
        mesh: &M,
        total_mass: f32,
        mut config: ClothConfig,
        rng: WindRng,
    ) -> ClothResult<Self> {
        if !(total_mass.is_finite() && total_mass > 0.0) {
            return Err(ClothError::InvalidMass(total_mass));
        }
        let positions = mesh.positions();
        if positions.is_empty() {
            return Err(ClothError::EmptyMesh);
        }

        let particle_mass = total_mass / positions.len() as f32;
        if !(particle_mass.is_normal() && particle_mass > 0.0) {
            return Err(ClothError::InvalidMass(total_mass));
        }

        if let Some(limit) = config.stretch_limit.filter(|ratio| !(*ratio >= 1.0)) {
            warn!("ignoring stretch limit {limit}, it must be at least 1.0");
            config.stretch_limit = None;
        }
        let particles: Vec<Particle> = positions
            .iter()
            .map(|&position| Particle::new(position, particle_mass))
            .collect();

        let topology = if config.bending {
            Topology::extract_with_bending(mesh, config.bend_straightness)?
        } else {
            Topology::extract(mesh)?
        };
        let constraints = build_constraints(&particles, &topology, &config);
        let groups = snapshot_groups(mesh);

        let mut integrator = Integrator::new();
        integrator.set_parallel(config.parallel);

        debug!(
            "cloth built: {} particles ({particle_mass} kg each), {} constraints, {} groups",
            particles.len(),
            constraints.len(),
            groups.len()
        );

        Ok(Self {
            particles,
            constraints,
            groups,
            pinned_group: None,
            gravity: GravityForce::new(config.gravity),
            wind: WindField::new(config.wind_pressure),
            rng,
            forces: ForceRegistry::new(),
            integrator,
            profiler: StepProfiler::default(),
            total_mass,
            config,
        })
    }

    /// Pins every particle of the named vertex group, unpinning all others.
    ///
    /// On error all particles are left movable. Returns the number of pinned particles.
    pub fn pin_group(&mut self, name: &str) -> ClothResult<usize> {
        self.unpin_all();
        self.pinned_group = None;

        let group = self
            .groups
            .get(name)
            .ok_or_else(|| ClothError::GroupNotFound(name.to_string()))?;
        if group.kind() != GroupKind::Vertex {
            return Err(ClothError::NotAVertexGroup(name.to_string()));
        }

        for &index in group.indices() {
            self.particles[index as usize].pin();
        }
        let pinned = group.indices().len();
        self.pinned_group = Some(name.to_string());
        debug!("pinned {pinned} particles from group '{name}'");
        Ok(pinned)
    }

    pub fn pin_particle(&mut self, index: usize) -> ClothResult<()> {
        let particle_count = self.particles.len();
        self.particles
            .get_mut(index)
            .ok_or(ClothError::ParticleOutOfRange {
                index,
                particle_count,
            })?
            .pin();
        Ok(())
    }

    pub fn unpin_all(&mut self) {
        for particle in &mut self.particles {
            particle.unpin();
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Non-positive or non-finite `dt` leaves the cloth untouched.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            warn!("ignoring cloth step with invalid dt {dt}");
            return;
        }

        let substeps = self.config.substeps.max(1);
        let h = dt / substeps as f32;
        let mut profiler = StepProfiler {
            particle_count: self.particles.len(),
            constraint_count: self.constraints.len(),
            substeps,
            ..StepProfiler::default()
        };

        let start = Instant::now();
        self.wind.update(&mut self.rng);
        for _ in 0..substeps {
            self.substep(h, &mut profiler);
        }
        profiler.total_step_time = start.elapsed();
        profiler.report();
        warn_if_step_budget_exceeded(profiler.total_step_time, dt * 1000.0);
        self.profiler = profiler;
    }

    fn substep(&mut self, dt: f32, profiler: &mut StepProfiler) {
        {
            let _timer =
                ScopedTimer::new("cloth::external_forces", &mut profiler.external_forces_time);
            for particle in &mut self.particles {
                particle.reset_force();
                self.gravity.apply(particle, dt);
            }

            if self.config.apply_wind {
                for particle in &mut self.particles {
                    self.wind.apply(particle, dt);
                }
            }

            self.forces.apply_all(&mut self.particles, dt);
        }
        {
            let _timer =
                ScopedTimer::new("cloth::constraint_forces", &mut profiler.constraint_forces_time);
            self.accumulate_constraint_forces();
        }
        {
            let _timer = ScopedTimer::new("cloth::satisfy", &mut profiler.satisfy_time);
            for constraint in &self.constraints {
                constraint.satisfy(&mut self.particles);
            }
        }
        {
            let _timer = ScopedTimer::new("cloth::integrate", &mut profiler.integrate_time);
            self.integrator.step(&mut self.particles, dt);
        }
    }

    #[cfg(feature = "parallel")]
    fn accumulate_constraint_forces(&mut self) {
        if self.config.parallel {
            crate::dynamics::parallel::accumulate_constraint_forces(
                &self.constraints,
                &mut self.particles,
            );
        } else {
            self.accumulate_constraint_forces_sequential();
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn accumulate_constraint_forces(&mut self) {
        self.accumulate_constraint_forces_sequential();
    }

    fn accumulate_constraint_forces_sequential(&mut self) {
        for constraint in &self.constraints {
            constraint.calculate_force(&mut self.particles);
        }
    }

    /// Current particle positions in mesh vertex order.
    pub fn export_positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Writes positions into `out`, reusing its allocation.
    pub fn export_positions_into(&self, out: &mut Vec<Vec3>) {
        out.clear();
        out.extend(self.particles.iter().map(|p| p.position));
    }

    /// Positions as a flat `xyzxyz...` array for buffer uploads.
    pub fn export_flat(&self) -> Vec<f32> {
        flatten(&self.export_positions())
    }

    /// Replaces the coefficients of every constraint of the given type.
    pub fn set_coefficients(&mut self, ty: SpringType, coefficients: SpringCoefficients) {
        self.config.coefficients.set(ty, coefficients);
        for constraint in &mut self.constraints {
            match (constraint, ty) {
                (Constraint::Spring(spring), SpringType::Tension)
                    if spring.kind() == SpringKind::Structural =>
                {
                    spring.set_tension(coefficients)
                }
                (Constraint::Spring(spring), SpringType::Compression)
                    if spring.kind() == SpringKind::Structural =>
                {
                    spring.set_compression(coefficients)
                }
                (Constraint::Spring(spring), SpringType::Shear)
                    if spring.kind() == SpringKind::Shear =>
                {
                    spring.set_tension(coefficients);
                    spring.set_compression(coefficients);
                }
                (Constraint::Bending(bending), SpringType::Bending) => {
                    bending.set_coefficients(coefficients)
                }
                _ => {}
            }
        }
    }

    /// Overrides the stiffness of every constraint.
    pub fn set_stiffness(&mut self, stiffness: f32) {
        for constraint in &mut self.constraints {
            constraint.set_stiffness(stiffness);
        }
    }

    /// Overrides the damping of every constraint.
    pub fn set_damping(&mut self, damping: f32) {
        for constraint in &mut self.constraints {
            constraint.set_damping(damping);
        }
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.config.parallel = enabled;
        self.integrator.set_parallel(enabled);
    }

    pub fn set_wind_enabled(&mut self, enabled: bool) {
        self.config.apply_wind = enabled;
    }

    /// Restarts the wind sequence and clears the accumulated wind.
    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
        self.wind.reset();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn springs(&self) -> impl Iterator<Item = &SpringConstraint> {
        self.constraints.iter().filter_map(Constraint::as_spring)
    }

    pub fn spring_count(&self, kind: SpringKind) -> usize {
        self.springs().filter(|spring| spring.kind() == kind).count()
    }

    pub fn bending_count(&self) -> usize {
        self.constraints
            .iter()
            .filter(|constraint| constraint.as_bending().is_some())
            .count()
    }

    pub fn wind_force(&self) -> Vec3 {
        self.wind.force()
    }

    pub fn pinned_group(&self) -> Option<&str> {
        self.pinned_group.as_deref()
    }

    pub fn total_mass(&self) -> f32 {
        self.total_mass
    }

    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for particle in &self.particles {
            bounds.extend(particle.position);
        }
        bounds
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn forces_mut(&mut self) -> &mut ForceRegistry {
        &mut self.forces
    }

    pub fn profiler(&self) -> &StepProfiler {
        &self.profiler
    }
}

fn build_constraints(
    particles: &[Particle],
    topology: &Topology,
    config: &ClothConfig,
) -> Vec<Constraint> {
    let table = &config.coefficients;
    let mut constraints = Vec::with_capacity(
        topology.edges.len() + topology.shear_pairs.len() + topology.bend_triplets.len(),
    );
    let mut degenerate = 0usize;

    for edge in &topology.edges {
        let (a, b) = edge.key.endpoints();
        match SpringConstraint::new(
            particles,
            a as usize,
            b as usize,
            SpringKind::Structural,
            table.tension,
            table.compression,
        ) {
            Some(spring) => {
                constraints.push(spring.with_stretch_limit(config.stretch_limit).into())
            }
            None => degenerate += 1,
        }
    }

    for key in &topology.shear_pairs {
        let (a, b) = key.endpoints();
        match SpringConstraint::symmetric(
            particles,
            a as usize,
            b as usize,
            SpringKind::Shear,
            table.shear,
        ) {
            Some(spring) => constraints.push(spring.into()),
            None => degenerate += 1,
        }
    }

    for triplet in &topology.bend_triplets {
        constraints.push(
            BendingConstraint::new(
                particles,
                triplet.a as usize,
                triplet.pivot as usize,
                triplet.c as usize,
                table.bending,
            )
            .into(),
        );
    }

    if degenerate > 0 {
        warn!("skipped {degenerate} springs between coincident particles");
    }
    constraints
}

fn snapshot_groups<M: MeshTopology + ?Sized>(mesh: &M) -> HashMap<String, VertexGroup> {
    let vertex_count = mesh.vertex_count();
    let mut groups = HashMap::new();
    for (name, group) in mesh.groups() {
        let mut group = group.clone();
        if group.kind() == GroupKind::Vertex
            && group.indices().iter().any(|&i| i as usize >= vertex_count)
        {
            warn!("group '{name}' references missing vertices, dropping them");
            let kept = group
                .indices()
                .iter()
                .copied()
                .filter(|&i| (i as usize) < vertex_count)
                .collect();
            group = VertexGroup::new(GroupKind::Vertex, kept);
        }
        groups.insert(name.to_string(), group);
    }
    groups
}
