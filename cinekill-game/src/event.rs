//! Kill event payload and trigger identities.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque entity handle supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Weapon classification consumed as an opaque label from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeaponCategory {
    #[default]
    Melee,
    Ranged,
    Bow,
    Explosive,
    /// Trap kills never stage a cinematic; the player was not present for
    /// the shot, so a camera sequence would point at nothing.
    Trap,
}

impl WeaponCategory {
    pub const ALL: [Self; 5] = [
        Self::Melee,
        Self::Ranged,
        Self::Bow,
        Self::Explosive,
        Self::Trap,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Ranged => "ranged",
            Self::Bow => "bow",
            Self::Explosive => "explosive",
            Self::Trap => "trap",
        }
    }
}

impl fmt::Display for WeaponCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contextual reasons that can claim a kill, plus the basic-kill fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    LastEnemy,
    Killstreak,
    Dismember,
    Headshot,
    Crit,
    LongRange,
    LowHealth,
    Sneak,
    /// Fallback for kills no contextual trigger claimed. Never part of the
    /// priority scan.
    BasicKill,
}

impl TriggerKind {
    /// Contextual triggers in fixed evaluation order, highest priority first.
    pub const PRIORITY_ORDER: [Self; 8] = [
        Self::LastEnemy,
        Self::Killstreak,
        Self::Dismember,
        Self::Headshot,
        Self::Crit,
        Self::LongRange,
        Self::LowHealth,
        Self::Sneak,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastEnemy => "last_enemy",
            Self::Killstreak => "killstreak",
            Self::Dismember => "dismember",
            Self::Headshot => "headshot",
            Self::Crit => "crit",
            Self::LongRange => "long_range",
            Self::LowHealth => "low_health",
            Self::Sneak => "sneak",
            Self::BasicKill => "basic_kill",
        }
    }

    /// Whether this kind is the fallback rather than a contextual trigger.
    #[must_use]
    pub const fn is_basic(self) -> bool {
        matches!(self, Self::BasicKill)
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last_enemy" => Ok(Self::LastEnemy),
            "killstreak" => Ok(Self::Killstreak),
            "dismember" => Ok(Self::Dismember),
            "headshot" => Ok(Self::Headshot),
            "crit" => Ok(Self::Crit),
            "long_range" => Ok(Self::LongRange),
            "low_health" => Ok(Self::LowHealth),
            "sneak" => Ok(Self::Sneak),
            "basic_kill" => Ok(Self::BasicKill),
            _ => Err(()),
        }
    }
}

/// One damage notification that killed a hostile. Created by the host per
/// kill, consumed once by the session, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    pub victim: EntityId,
    pub weapon: WeaponCategory,
    #[serde(default)]
    pub was_crit: bool,
    #[serde(default)]
    pub was_headshot: bool,
    #[serde(default)]
    pub was_sneak: bool,
    /// Captured before the damage landed; a target alerted by the hit no
    /// longer counts as unaware.
    #[serde(default)]
    pub was_unaware: bool,
    #[serde(default)]
    pub was_dismember: bool,
    /// Attacker-to-victim distance in meters at the moment of the kill.
    #[serde(default)]
    pub distance: f32,
    /// Attacker health fraction in [0, 1] when the kill landed.
    #[serde(default = "default_health_frac")]
    pub attacker_health_frac: f32,
    pub is_last_enemy: bool,
}

const fn default_health_frac() -> f32 {
    1.0
}

impl KillEvent {
    /// Minimal event for a plain kill; flags default to false.
    #[must_use]
    pub fn basic(victim: EntityId, weapon: WeaponCategory) -> Self {
        Self {
            victim,
            weapon,
            was_crit: false,
            was_headshot: false,
            was_sneak: false,
            was_unaware: false,
            was_dismember: false,
            distance: 0.0,
            attacker_health_frac: 1.0,
            is_last_enemy: false,
        }
    }
}
