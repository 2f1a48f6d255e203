//! Body description and conversion to rapier builders.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use arena_core::types::EntityRef;

use crate::groups::interaction_groups;

/// Handle to a body in a `PhysicsWorld`.
pub type BodyHandle = RigidBodyHandle;

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Integrated under gravity, pushed out of contacts.
    Dynamic,
    /// Moved only by its velocity; never pushed.
    Kinematic,
    /// Immovable.
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl Shape {
    pub(crate) fn to_shared(self) -> SharedShape {
        match self {
            Shape::Sphere { radius } => SharedShape::ball(radius),
            Shape::Cuboid { half_extents: h } => SharedShape::cuboid(h.x, h.y, h.z),
        }
    }
}

/// Everything needed to create a body.
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub shape: Shape,
    pub position: Vec3,
    pub rotation: Quat,
    /// Mass in kg. Ignored for non-dynamic bodies.
    pub mass: f32,
    pub linear_damping: f32,
    pub gravity_scale: f32,
    /// Sensors report overlaps but are never resolved.
    pub sensor: bool,
    pub owner: EntityRef,
}

impl BodyDesc {
    pub fn new(body_type: BodyType, shape: Shape, owner: EntityRef) -> Self {
        Self {
            body_type,
            shape,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mass: 1.0,
            linear_damping: 0.0,
            gravity_scale: 1.0,
            sensor: false,
            owner,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_damping(mut self, linear_damping: f32) -> Self {
        self.linear_damping = linear_damping;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    /// Rapier rigid body for this description. Rotations are locked; the
    /// game sets orientation directly.
    pub(crate) fn rigid_body(&self) -> RigidBody {
        let builder = match self.body_type {
            BodyType::Dynamic => RigidBodyBuilder::dynamic()
                .linear_damping(self.linear_damping)
                .gravity_scale(self.gravity_scale)
                .lock_rotations(),
            BodyType::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
            BodyType::Static => RigidBodyBuilder::fixed(),
        };
        builder
            .translation(to_vector(self.position))
            .rotation(to_rotation(self.rotation).scaled_axis())
            .can_sleep(false)
            .build()
    }

    pub(crate) fn collider(&self) -> Collider {
        let builder = ColliderBuilder::new(self.shape.to_shared())
            .sensor(self.sensor)
            .friction(0.0)
            .collision_groups(interaction_groups(self.owner.kind));
        match self.body_type {
            BodyType::Dynamic => builder.mass(self.mass).build(),
            _ => builder.build(),
        }
    }
}

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn to_rotation(q: Quat) -> Rotation<Real> {
    Rotation::from_quaternion(rapier3d::na::Quaternion::new(q.w, q.x, q.y, q.z))
}

pub(crate) fn from_rotation(r: &Rotation<Real>) -> Quat {
    let c = r.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}
