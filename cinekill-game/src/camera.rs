//! Camera mode selection for a staged cinematic.
//!
//! Selection is a fixed cascade: weapon-category override first, then the
//! smart indoor/outdoor probe, then the allow flags (a trigger without its
//! own camera block intersects its flags with the shared defaults), then a
//! weighted split between the survivors. The caller aborts the whole
//! sequence when nothing survives, leaving world state untouched.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::event::WeaponCategory;
use crate::settings::{CinematicSettings, EffectiveParams};
use crate::world::WorldAdapter;

/// The two camera treatments a sequence can run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Stay in the attacker's eyes with a dramatic zoom.
    FirstPerson,
    /// Detach and frame the victim from a preset.
    Follow,
}

impl CameraMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstPerson => "first_person",
            Self::Follow => "follow",
        }
    }
}

/// Per-weapon-category camera forcing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraOverride {
    /// Defer to the rest of the cascade.
    #[default]
    Auto,
    ForceFirstPerson,
    ForceFollow,
}

/// Pick the camera mode for a sequence, or `None` when every mode is ruled
/// out and the sequence must not start.
#[must_use]
pub fn select_camera<W: WorldAdapter + ?Sized, R: Rng>(
    settings: &CinematicSettings,
    params: &EffectiveParams,
    weapon: WeaponCategory,
    world: &W,
    rng: &mut R,
) -> Option<CameraMode> {
    match settings.weapon_modes.get(weapon).camera_override {
        CameraOverride::ForceFirstPerson => return Some(CameraMode::FirstPerson),
        CameraOverride::ForceFollow => return Some(CameraMode::Follow),
        CameraOverride::Auto => {}
    }

    let allow_first_person = params.allow_first_person
        && (params.has_override || settings.trigger_defaults.allow_first_person);
    let allow_follow =
        params.allow_follow && (params.has_override || settings.trigger_defaults.allow_follow);

    // Indoors a detached camera clips into walls; outdoors there is room
    // for the showpiece follow shot. An unavailable probe counts as
    // outdoors without the follow preference, so the cascade keeps going.
    if settings.smart_indoor_outdoor.0 {
        match world.is_camera_indoors() {
            Some(true) => return Some(CameraMode::FirstPerson),
            Some(false) if allow_follow => return Some(CameraMode::Follow),
            _ => {}
        }
    }

    match (allow_first_person, allow_follow) {
        (false, false) => None,
        (true, false) => Some(CameraMode::FirstPerson),
        (false, true) => Some(CameraMode::Follow),
        (true, true) => {
            let roll: f32 = rng.random_range(0.0..100.0);
            if roll < params.first_person_chance {
                Some(CameraMode::FirstPerson)
            } else {
                Some(CameraMode::Follow)
            }
        }
    }
}
