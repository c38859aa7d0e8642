//! Fire-and-forget commands the core emits toward its collaborators.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::camera::CameraMode;
use crate::event::EntityId;

/// Per-frame command buffer. Most ticks emit zero or one command.
pub type Commands = SmallVec<[Command; 4]>;

/// Screen effects the core can request; rendering is the host's problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenEffectKind {
    KillFlash,
    FreezeContrast,
}

/// One instruction to a collaborator. Emission order within a tick is
/// meaningful; hosts apply commands in sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Set the global time multiplier. Already clamped to its valid domain.
    SetTimeScale(f32),
    /// Switch to the chosen camera for a (possibly re-targeted) victim.
    SwitchCamera { mode: CameraMode, victim: EntityId },
    /// Re-place the follow camera on one of its presets.
    PlaceFollowPreset { victim: EntityId },
    /// Restore the camera to its pre-sequence pose.
    RestoreCamera,
    /// Drive the first-person dramatic zoom. `hold_frac` stretches the hold
    /// phase when the sequence duration was extended.
    BeginZoom { amount: f32, hold_frac: f32 },
    ScreenEffect(ScreenEffectKind),
    /// Duck game audio while slow motion runs.
    SetAudioVolume(f32),
    RestoreAudio,
    /// HUD notification; `log_key` is a stable identifier, `streak` the
    /// current kill-streak count.
    HudNotify { log_key: String, streak: u32 },
}

impl Command {
    /// Whether this command touches the global time multiplier.
    #[must_use]
    pub const fn is_time_scale(&self) -> bool {
        matches!(self, Self::SetTimeScale(_))
    }
}
