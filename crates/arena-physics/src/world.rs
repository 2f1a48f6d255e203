//! The physics world: rapier sets, fixed-step stepping and contact reports.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use tracing::{debug, trace};

use arena_core::constants::{GRAVITY, PHYSICS_FIXED_STEP, PHYSICS_MAX_SUB_STEPS};
use arena_core::types::{EntityRef, Transform};

use crate::body::{from_rotation, from_vector, to_rotation, to_vector, BodyDesc, BodyHandle, Shape};

/// Stepping parameters.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsSettings {
    pub gravity: Vec3,
    pub fixed_step: f32,
    pub max_sub_steps: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, GRAVITY, 0.0),
            fixed_step: PHYSICS_FIXED_STEP,
            max_sub_steps: PHYSICS_MAX_SUB_STEPS,
        }
    }
}

/// Contact report for one pair of bodies during one `step`.
///
/// Normals point from `body_b` toward `body_a`; one normal is recorded per
/// touching manifold per sub-step. Sensor overlaps carry no normals.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub normals: Vec<Vec3>,
    pub sensor: bool,
}

impl CollisionEvent {
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// The body on the other side of the contact from `body`.
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }

    /// Contact normals oriented to push `body` away from the other body.
    pub fn normals_for(&self, body: BodyHandle) -> Vec<Vec3> {
        if self.body_a == body {
            self.normals.clone()
        } else if self.body_b == body {
            self.normals.iter().map(|n| -*n).collect()
        } else {
            Vec::new()
        }
    }
}

pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    settings: PhysicsSettings,
    accumulator: f32,
    /// Game entity behind each collider.
    collider_owner: HashMap<ColliderHandle, EntityRef>,
    events: Vec<CollisionEvent>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_settings(PhysicsSettings::default())
    }

    pub fn with_settings(settings: PhysicsSettings) -> Self {
        let integration_params = IntegrationParameters {
            dt: settings.fixed_step,
            ..Default::default()
        };
        Self {
            pipeline: PhysicsPipeline::new(),
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            settings,
            accumulator: 0.0,
            collider_owner: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Insert a body with one collider and return its handle. The body
    /// starts enabled.
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = self.rigid_body_set.insert(desc.rigid_body());
        let collider = self.collider_set.insert_with_parent(
            desc.collider(),
            handle,
            &mut self.rigid_body_set,
        );
        self.collider_owner.insert(collider, desc.owner);
        self.refresh_mass(handle);
        debug!(owner = %desc.owner, ?handle, "physics body added");
        handle
    }

    /// Remove a body and its collider. Returns false if the handle was stale.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(body) = self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        ) else {
            return false;
        };
        for collider in body.colliders() {
            self.collider_owner.remove(collider);
        }
        true
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    /// Take a body out of (or put it back into) the simulation. A disabled
    /// body is neither integrated nor tested for contacts, and its velocity
    /// is cleared.
    pub fn set_enabled(&mut self, handle: BodyHandle, enabled: bool) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            if !enabled {
                body.set_linvel(Vector::zeros(), false);
            }
            body.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self, handle: BodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .is_some_and(|body| body.is_enabled())
    }

    /// Game entity that owns `handle`.
    pub fn owner_of(&self, handle: BodyHandle) -> Option<EntityRef> {
        let body = self.rigid_body_set.get(handle)?;
        body.colliders()
            .iter()
            .find_map(|c| self.collider_owner.get(c).copied())
    }

    pub fn position(&self, handle: BodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|b| from_vector(b.translation()))
    }

    pub fn rotation(&self, handle: BodyHandle) -> Option<Quat> {
        self.rigid_body_set
            .get(handle)
            .map(|b| from_rotation(b.rotation()))
    }

    pub fn transform(&self, handle: BodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|b| {
            Transform::new(from_vector(b.translation()), from_rotation(b.rotation()))
        })
    }

    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|b| from_vector(b.linvel()))
    }

    pub fn set_position(&mut self, handle: BodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(to_vector(position), true);
        }
    }

    pub fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_rotation(to_rotation(rotation.normalize()), true);
        }
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    /// Replace the collision shape. Used when a pooled body is reused for an
    /// entity of a different size.
    pub fn set_shape(&mut self, handle: BodyHandle, shape: Shape) {
        let Some(body) = self.rigid_body_set.get(handle) else {
            return;
        };
        for collider in body.colliders() {
            if let Some(collider) = self.collider_set.get_mut(*collider) {
                collider.set_shape(shape.to_shared());
            }
        }
        self.refresh_mass(handle);
    }

    /// Instantaneous velocity change of `impulse / mass`. No effect on
    /// non-dynamic bodies.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            if body.is_dynamic() {
                body.apply_impulse(to_vector(impulse), true);
            }
        }
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn enabled_body_count(&self) -> usize {
        self.rigid_body_set
            .iter()
            .filter(|(_, body)| body.is_enabled())
            .count()
    }

    /// Advance by `dt` seconds in fixed sub-steps. At most
    /// `max_sub_steps` run; any backlog beyond that is dropped.
    /// Returns the number of sub-steps taken.
    pub fn step(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let step = self.settings.fixed_step;
        let mut pair_index: HashMap<(BodyHandle, BodyHandle), usize> = HashMap::new();
        let mut taken = 0;

        while self.accumulator + 1e-6 >= step && taken < self.settings.max_sub_steps {
            self.sub_step();
            self.collect_contacts(&mut pair_index);
            self.accumulator -= step;
            taken += 1;
        }

        if self.accumulator >= step {
            debug!(
                backlog_secs = self.accumulator,
                "physics sub-step cap reached, dropping backlog"
            );
            self.accumulator = 0.0;
        }
        self.accumulator = self.accumulator.max(0.0);
        taken
    }

    /// Take all collision events recorded since the last drain, ordered by
    /// body handle.
    pub fn drain_collisions(&mut self) -> Vec<CollisionEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.sort_by_key(|e| (e.body_a.into_raw_parts(), e.body_b.into_raw_parts()));
        events
    }

    fn sub_step(&mut self) {
        self.integration_params.dt = self.settings.fixed_step;
        self.pipeline.step(
            &to_vector(self.settings.gravity),
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Record the touching pairs the narrow phase holds after a sub-step.
    fn collect_contacts(&mut self, pair_index: &mut HashMap<(BodyHandle, BodyHandle), usize>) {
        let mut touching = Vec::new();

        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            // Manifold normals point out of collider1; flip them so they
            // push body_a away from body_b.
            let normals: Vec<Vec3> = pair
                .manifolds
                .iter()
                .filter(|m| !m.data.solver_contacts.is_empty())
                .map(|m| -from_vector(&m.data.normal))
                .collect();
            touching.push((pair.collider1, pair.collider2, normals, false));
        }
        for (c1, c2, intersecting) in self.narrow_phase.intersection_pairs() {
            if intersecting {
                touching.push((c1, c2, Vec::new(), true));
            }
        }

        for (c1, c2, normals, sensor) in touching {
            let (Some(a), Some(b)) = (self.parent_of(c1), self.parent_of(c2)) else {
                continue;
            };
            trace!(?a, ?b, sensor, "contact");
            match pair_index.get(&(a, b)) {
                Some(&idx) => self.events[idx].normals.extend(normals),
                None => {
                    pair_index.insert((a, b), self.events.len());
                    self.events.push(CollisionEvent {
                        body_a: a,
                        body_b: b,
                        normals,
                        sensor,
                    });
                }
            }
        }
    }

    fn parent_of(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        self.collider_set.get(collider).and_then(|c| c.parent())
    }

    fn refresh_mass(&mut self, handle: BodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.collider_set);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
