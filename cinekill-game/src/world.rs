//! Collaborator seam between the core and the host engine.
//!
//! The core never touches rendering, physics, or audio directly. Everything
//! it needs to *read* comes through [`WorldAdapter`]; everything it wants to
//! *do* goes out as [`crate::command::Command`] values. Hosts implement the
//! trait; tests fabricate it.

use serde::{Deserialize, Serialize};

use crate::event::EntityId;

/// Plain world-space position used for stale-target checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// A reported all-zero position means the proxy was not simulated this
    /// frame and must not be trusted.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Camera placement snapshot; the core only cares that one exists so it can
/// be restored later.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// One physics reading for a ragdolling victim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RagdollSample {
    pub position: Vec3,
    /// Peak linear speed across the victim's physics proxies this frame.
    pub peak_speed: f32,
    /// Fraction of proxies the physics engine reports asleep, in [0, 1].
    pub asleep_fraction: f32,
}

/// Read-only services the host supplies. Every method is optional at
/// runtime; `None` means the collaborator is unavailable right now and the
/// core degrades instead of failing.
pub trait WorldAdapter {
    /// Whether the current camera position is under a ceiling. `None` when
    /// the world probe is unavailable; callers treat that as outdoors.
    fn is_camera_indoors(&self) -> Option<bool>;

    /// Current physics reading for a victim, or `None` when the entity is
    /// gone or not yet ragdolling.
    fn sample_victim(&self, victim: EntityId) -> Option<RagdollSample>;

    /// The pre-sequence camera pose. `None` aborts cinematic starts.
    fn camera_pose(&self) -> Option<CameraPose>;
}

/// Fabricated world for tests and the tester binary: fixed answers, one
/// optional sample shared by all victims.
#[derive(Debug, Clone, Default)]
pub struct StaticWorld {
    pub indoors: Option<bool>,
    pub sample: Option<RagdollSample>,
    pub camera: Option<CameraPose>,
}

impl StaticWorld {
    /// Outdoors, settled-free, camera available.
    #[must_use]
    pub fn outdoors() -> Self {
        Self {
            indoors: Some(false),
            sample: None,
            camera: Some(CameraPose::default()),
        }
    }

    /// Indoors variant of [`StaticWorld::outdoors`].
    #[must_use]
    pub fn indoors() -> Self {
        Self {
            indoors: Some(true),
            ..Self::outdoors()
        }
    }
}

impl WorldAdapter for StaticWorld {
    fn is_camera_indoors(&self) -> Option<bool> {
        self.indoors
    }

    fn sample_victim(&self, _victim: EntityId) -> Option<RagdollSample> {
        self.sample
    }

    fn camera_pose(&self) -> Option<CameraPose> {
        self.camera
    }
}
