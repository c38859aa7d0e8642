//! Trigger resolution: which reason, if any, claims a kill.
//!
//! Contextual triggers are scanned in a fixed priority order. A candidate
//! whose cooldown or probability gate says no is skipped, and the scan
//! keeps going so a lower-priority context can still win. After the scan,
//! a cooldown-blocked candidate suppresses the basic fallback outright (a
//! headshot on cooldown never downgrades into a basic cinematic), while a
//! chance-failed candidate still lets the fallback roll.

use rand::Rng;

use crate::cooldown::{CooldownTable, StreakState};
use crate::event::{KillEvent, TriggerKind};
use crate::settings::{CinematicSettings, EffectiveParams};

/// Why a claimed trigger did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Cooldown,
    Chance,
}

/// A trigger that won the scan and passed its gates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTrigger {
    pub kind: TriggerKind,
    pub params: EffectiveParams,
    /// Streak count at resolution time, before this kill is registered.
    pub streak: u32,
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerDecision {
    Fire(ResolvedTrigger),
    /// A trigger claimed the kill but a gate said no. No cinematic.
    Blocked {
        kind: TriggerKind,
        reason: BlockReason,
    },
    /// Nothing claimed the kill and the fallback was unavailable.
    NoMatch,
}

fn context_matches(kind: TriggerKind, settings: &CinematicSettings, event: &KillEvent, streak: u32) -> bool {
    match kind {
        TriggerKind::LastEnemy => event.is_last_enemy,
        TriggerKind::Killstreak => {
            settings.killstreak.enabled && streak >= settings.killstreak.kills_required
        }
        TriggerKind::Dismember => event.was_dismember,
        TriggerKind::Headshot => event.was_headshot,
        TriggerKind::Crit => event.was_crit,
        TriggerKind::LongRange => event.distance >= settings.long_range_distance.0,
        TriggerKind::LowHealth => event.attacker_health_frac * 100.0 <= settings.low_health_pct.0,
        // A target alerted by the killing blow still counted as unaware
        // when the shot was loosed.
        TriggerKind::Sneak => event.was_sneak || event.was_unaware,
        TriggerKind::BasicKill => false,
    }
}

/// Resolve a kill against the trigger table.
///
/// `streak` carries the count before this kill; the session increments it
/// only when a sequence actually starts. `now` is the unscaled clock the
/// cooldown table runs on.
pub fn resolve<R: Rng>(
    settings: &CinematicSettings,
    event: &KillEvent,
    streak: &StreakState,
    cooldowns: &CooldownTable,
    now: f64,
    rng: &mut R,
) -> TriggerDecision {
    let mut cooldown_block = None;
    let mut chance_block = None;

    for kind in TriggerKind::PRIORITY_ORDER {
        let Some(trigger) = settings.triggers.get(kind) else {
            continue;
        };
        if !trigger.enabled || !context_matches(kind, settings, event, streak.count()) {
            continue;
        }

        if !cooldowns.is_ready(kind, now) {
            cooldown_block.get_or_insert(kind);
            continue;
        }
        let chance = if trigger.override_chance {
            trigger.chance
        } else {
            settings.master_trigger_chance.0
        };
        if rng.random_range(0.0..100.0) >= chance {
            chance_block.get_or_insert(kind);
            continue;
        }
        return TriggerDecision::Fire(ResolvedTrigger {
            kind,
            params: settings.effective_params(kind),
            streak: streak.count(),
        });
    }

    // A context on cooldown claims the kill even though it cannot fire.
    if let Some(kind) = cooldown_block {
        return TriggerDecision::Blocked {
            kind,
            reason: BlockReason::Cooldown,
        };
    }

    if settings.require_trigger || !settings.basic_kill.enabled {
        return chance_block.map_or(TriggerDecision::NoMatch, |kind| TriggerDecision::Blocked {
            kind,
            reason: BlockReason::Chance,
        });
    }
    let kind = TriggerKind::BasicKill;
    if !cooldowns.is_ready(kind, now) {
        return TriggerDecision::Blocked {
            kind,
            reason: BlockReason::Cooldown,
        };
    }
    if rng.random_range(0.0..100.0) >= settings.basic_kill.chance {
        return TriggerDecision::Blocked {
            kind,
            reason: BlockReason::Chance,
        };
    }
    TriggerDecision::Fire(ResolvedTrigger {
        kind,
        params: settings.effective_params(kind),
        streak: streak.count(),
    })
}
