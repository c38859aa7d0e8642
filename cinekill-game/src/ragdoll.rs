//! Ragdoll-settle tracking for dynamic sequence endings.
//!
//! When enabled for the active trigger class and camera, the sequence timer
//! is stretched to the fallback ceiling and the victim's physics proxies are
//! watched instead. The body must stay calm (below the settle speed, or with
//! most proxies asleep) for the settle duration plus the post-land delay,
//! uninterrupted; then the sequence ends early. A kick or secondary impact
//! anywhere in that window restarts it. A missing or nonsensical sample only
//! holds the watch at its last known position for that tick; if the data
//! never recovers, the fallback ceiling ends things.

use crate::constants::ASLEEP_MAJORITY;
use crate::event::EntityId;
use crate::settings::RagdollSettings;
use crate::world::{Vec3, WorldAdapter};

/// What the tracker concluded this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RagdollVerdict {
    /// Keep watching.
    Tracking,
    /// Calm for the full settle-plus-delay window; end the sequence now.
    Settled,
}

/// Per-sequence settle watch. Created when a tracked sequence starts.
#[derive(Debug, Clone)]
pub struct RagdollTracking {
    victim: EntityId,
    last_position: Option<Vec3>,
    settled_for: f32,
}

impl RagdollTracking {
    #[must_use]
    pub fn new(victim: EntityId) -> Self {
        Self {
            victim,
            last_position: None,
            settled_for: 0.0,
        }
    }

    #[must_use]
    pub const fn victim(&self) -> EntityId {
        self.victim
    }

    /// Advance the watch by one unscaled-time step.
    ///
    /// The tick whose calm streak reaches the full window reports `Settled`
    /// itself; there is no extra one-tick grace after the threshold.
    pub fn update<W: WorldAdapter + ?Sized>(
        &mut self,
        settings: &RagdollSettings,
        world: &W,
        dt: f32,
    ) -> RagdollVerdict {
        let sample = world
            .sample_victim(self.victim)
            .filter(|sample| !sample.position.is_zero());
        let Some(sample) = sample else {
            // No usable data this tick; hold the last known state and retry.
            return RagdollVerdict::Tracking;
        };
        if let Some(last) = self.last_position {
            if last.distance(sample.position) > settings.max_teleport_per_tick {
                // Teleport-sized jump; discard the sample and retry next tick.
                return RagdollVerdict::Tracking;
            }
        }
        self.last_position = Some(sample.position);

        let calm = sample.peak_speed <= settings.settle_speed_threshold
            || sample.asleep_fraction >= ASLEEP_MAJORITY;
        if calm {
            self.settled_for += dt;
            if self.settled_for >= settings.settle_duration + settings.post_land_delay {
                return RagdollVerdict::Settled;
            }
        } else {
            self.settled_for = 0.0;
        }
        RagdollVerdict::Tracking
    }
}
