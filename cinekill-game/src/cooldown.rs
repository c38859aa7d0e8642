//! Per-trigger cooldown bookkeeping and kill-streak tracking.

use std::collections::HashMap;

use crate::event::TriggerKind;
use crate::settings::{KillstreakSettings, KillstreakTier};

/// Ready-at times per trigger on the unscaled clock.
///
/// A trigger that fires is locked out until its cinematic would have ended
/// *plus* its configured cooldown, so back-to-back kills inside a sequence
/// never re-fire the same reason.
#[derive(Debug, Clone, Default)]
pub struct CooldownTable {
    ready_at: HashMap<TriggerKind, f64>,
}

impl CooldownTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `kind` may fire at unscaled time `now`.
    #[must_use]
    pub fn is_ready(&self, kind: TriggerKind, now: f64) -> bool {
        self.ready_at.get(&kind).is_none_or(|&at| now >= at)
    }

    /// Arm the cooldown after a successful start. `sequence_duration` is the
    /// final duration including any bonuses.
    pub fn arm(&mut self, kind: TriggerKind, now: f64, sequence_duration: f32, cooldown: f32) {
        self.ready_at
            .insert(kind, now + f64::from(sequence_duration) + f64::from(cooldown));
    }

    /// Seconds until `kind` is ready again; zero when already ready.
    #[must_use]
    pub fn remaining(&self, kind: TriggerKind, now: f64) -> f64 {
        self.ready_at
            .get(&kind)
            .map_or(0.0, |&at| (at - now).max(0.0))
    }

    pub fn clear(&mut self) {
        self.ready_at.clear();
    }
}

/// Rolling kill-streak counter on the scaled clock.
#[derive(Debug, Clone, Default)]
pub struct StreakState {
    count: u32,
    last_kill_at: f64,
}

impl StreakState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kill at scaled time `now`, expiring the streak first when
    /// the idle window has passed. Returns the updated count.
    pub fn register_kill(&mut self, now: f64, timeout: f32) -> u32 {
        if self.count > 0 && now - self.last_kill_at > f64::from(timeout) {
            self.count = 0;
        }
        self.count += 1;
        self.last_kill_at = now;
        self.count
    }

    /// Expire an idle streak without registering a kill.
    pub fn expire_if_idle(&mut self, now: f64, timeout: f32) {
        if self.count > 0 && now - self.last_kill_at > f64::from(timeout) {
            self.count = 0;
        }
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// The highest tier whose threshold the current streak meets, if any.
/// Tiers are kept sorted ascending by threshold.
#[must_use]
pub fn active_tier(settings: &KillstreakSettings, streak: u32) -> Option<&KillstreakTier> {
    settings
        .tiers
        .iter()
        .rev()
        .find(|tier| streak >= tier.kills)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_covers_duration_plus_cooldown() {
        let mut table = CooldownTable::new();
        table.arm(TriggerKind::Headshot, 100.0, 2.0, 3.0);
        assert!(!table.is_ready(TriggerKind::Headshot, 104.9));
        assert!(table.is_ready(TriggerKind::Headshot, 105.0));
        // Other triggers are unaffected.
        assert!(table.is_ready(TriggerKind::Crit, 100.0));
    }

    #[test]
    fn zero_cooldown_still_blocks_during_the_sequence() {
        let mut table = CooldownTable::new();
        table.arm(TriggerKind::LastEnemy, 50.0, 2.0, 0.0);
        assert!(!table.is_ready(TriggerKind::LastEnemy, 51.0));
        assert!(table.is_ready(TriggerKind::LastEnemy, 52.0));
    }

    #[test]
    fn streak_grows_within_window_and_resets_after() {
        let mut streak = StreakState::new();
        assert_eq!(streak.register_kill(0.0, 8.0), 1);
        assert_eq!(streak.register_kill(4.0, 8.0), 2);
        assert_eq!(streak.register_kill(11.0, 8.0), 3);
        // Idle past the window: the next kill starts a new streak.
        assert_eq!(streak.register_kill(25.0, 8.0), 1);
    }

    #[test]
    fn idle_expiry_clears_without_counting() {
        let mut streak = StreakState::new();
        streak.register_kill(0.0, 8.0);
        streak.expire_if_idle(5.0, 8.0);
        assert_eq!(streak.count(), 1);
        streak.expire_if_idle(9.0, 8.0);
        assert_eq!(streak.count(), 0);
    }

    #[test]
    fn tier_lookup_picks_highest_met_threshold() {
        let settings = KillstreakSettings::default();
        assert!(active_tier(&settings, 2).is_none());
        assert_eq!(active_tier(&settings, 3).map(|t| t.kills), Some(3));
        assert_eq!(active_tier(&settings, 6).map(|t| t.kills), Some(5));
        assert_eq!(active_tier(&settings, 20).map(|t| t.kills), Some(8));
    }
}
