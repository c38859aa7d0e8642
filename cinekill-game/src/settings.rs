//! Structured trigger/camera/sequence configuration.
//!
//! The tree is supplied by the host as an opaque read-only object at startup
//! and on live reload; its file format and editing UI live outside this
//! crate. A default tree ships as an embedded JSON asset so hosts without a
//! config layer still get sane behavior.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{CameraMode, CameraOverride};
use crate::constants::{
    CHANCE_MAX, CHANCE_MIN, MAX_SEQUENCE_DURATION, MAX_TIME_SCALE, MIN_SEQUENCE_DURATION,
    MIN_TIME_SCALE,
};
use crate::event::{TriggerKind, WeaponCategory};

const DEFAULT_SETTINGS_DATA: &str = include_str!("../assets/default_settings.json");

/// Errors raised while decoding a settings tree supplied by the host.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Randomized parameter range; when disabled the fixed value applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomRange {
    pub enabled: bool,
    pub min: f32,
    pub max: f32,
}

impl RandomRange {
    #[must_use]
    pub const fn fixed() -> Self {
        Self {
            enabled: false,
            min: 0.0,
            max: 0.0,
        }
    }

    fn clamp_to(&mut self, lo: f32, hi: f32) {
        self.min = self.min.clamp(lo, hi);
        self.max = self.max.clamp(self.min, hi);
    }
}

impl Default for RandomRange {
    fn default() -> Self {
        Self::fixed()
    }
}

/// Shared parameters every special trigger inherits unless it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDefaults {
    pub duration: f32,
    pub time_scale: f32,
    pub cooldown: f32,
    pub allow_first_person: bool,
    pub allow_follow: bool,
    /// First-person share of the camera split roll, 0-100.
    pub first_person_chance: f32,
    #[serde(default)]
    pub randomize_duration: RandomRange,
    #[serde(default)]
    pub randomize_time_scale: RandomRange,
}

impl Default for TriggerDefaults {
    fn default() -> Self {
        Self {
            duration: 3.0,
            time_scale: 0.1,
            cooldown: 10.0,
            allow_first_person: false,
            allow_follow: true,
            first_person_chance: 50.0,
            randomize_duration: RandomRange::fixed(),
            randomize_time_scale: RandomRange::fixed(),
        }
    }
}

/// Per-trigger configuration. Read-only at resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSettings {
    pub enabled: bool,
    /// Use this block's duration/scale/cooldown/camera instead of the
    /// shared defaults.
    #[serde(default)]
    pub override_params: bool,
    /// Use this block's chance instead of the master trigger chance.
    #[serde(default)]
    pub override_chance: bool,
    pub chance: f32,
    pub duration: f32,
    pub time_scale: f32,
    pub cooldown: f32,
    pub allow_first_person: bool,
    pub allow_follow: bool,
    pub first_person_chance: f32,
    #[serde(default)]
    pub randomize_duration: RandomRange,
    #[serde(default)]
    pub randomize_time_scale: RandomRange,
    #[serde(default)]
    pub override_hitstop: bool,
    #[serde(default)]
    pub hitstop_duration: f32,
    #[serde(default)]
    pub hitstop_crit_only: bool,
}

impl TriggerSettings {
    #[must_use]
    pub fn disabled_default() -> Self {
        Self {
            enabled: false,
            override_params: false,
            override_chance: false,
            chance: 100.0,
            duration: 1.5,
            time_scale: 0.15,
            cooldown: 2.0,
            allow_first_person: true,
            allow_follow: true,
            first_person_chance: 50.0,
            randomize_duration: RandomRange::fixed(),
            randomize_time_scale: RandomRange::fixed(),
            override_hitstop: false,
            hitstop_duration: 0.15,
            hitstop_crit_only: false,
        }
    }

    #[must_use]
    pub fn enabled_default() -> Self {
        Self {
            enabled: true,
            ..Self::disabled_default()
        }
    }

    fn clamp(&mut self) {
        self.chance = self.chance.clamp(CHANCE_MIN, CHANCE_MAX);
        self.duration = self
            .duration
            .clamp(MIN_SEQUENCE_DURATION, MAX_SEQUENCE_DURATION);
        self.time_scale = self.time_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        self.cooldown = self.cooldown.max(0.0);
        self.first_person_chance = self.first_person_chance.clamp(CHANCE_MIN, CHANCE_MAX);
        self.randomize_duration
            .clamp_to(MIN_SEQUENCE_DURATION, MAX_SEQUENCE_DURATION);
        self.randomize_time_scale
            .clamp_to(MIN_TIME_SCALE, MAX_TIME_SCALE);
        self.hitstop_duration = self.hitstop_duration.max(0.0);
    }
}

/// Fallback trigger used when no contextual trigger claims the kill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicKillSettings {
    pub enabled: bool,
    pub chance: f32,
    pub duration: f32,
    pub time_scale: f32,
    pub cooldown: f32,
    pub allow_first_person: bool,
    pub allow_follow: bool,
    pub first_person_chance: f32,
    #[serde(default)]
    pub randomize_duration: RandomRange,
    #[serde(default)]
    pub randomize_time_scale: RandomRange,
}

impl Default for BasicKillSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            chance: 15.0,
            duration: 2.0,
            time_scale: 0.2,
            cooldown: 10.0,
            allow_first_person: true,
            allow_follow: false,
            first_person_chance: 60.0,
            randomize_duration: RandomRange::fixed(),
            randomize_time_scale: RandomRange::fixed(),
        }
    }
}

/// Table of all contextual triggers, keyed statically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerTable {
    pub last_enemy: TriggerSettings,
    pub killstreak: TriggerSettings,
    pub dismember: TriggerSettings,
    pub headshot: TriggerSettings,
    pub crit: TriggerSettings,
    pub long_range: TriggerSettings,
    pub low_health: TriggerSettings,
    pub sneak: TriggerSettings,
}

impl Default for TriggerTable {
    fn default() -> Self {
        let mut last_enemy = TriggerSettings::enabled_default();
        last_enemy.override_params = true;
        last_enemy.duration = 2.0;
        last_enemy.time_scale = 0.1;
        last_enemy.cooldown = 0.0;
        Self {
            last_enemy,
            killstreak: TriggerSettings::disabled_default(),
            dismember: TriggerSettings::disabled_default(),
            headshot: TriggerSettings::enabled_default(),
            crit: TriggerSettings::disabled_default(),
            long_range: TriggerSettings::disabled_default(),
            low_health: TriggerSettings::disabled_default(),
            sneak: TriggerSettings::disabled_default(),
        }
    }
}

impl TriggerTable {
    #[must_use]
    pub fn get(&self, kind: TriggerKind) -> Option<&TriggerSettings> {
        match kind {
            TriggerKind::LastEnemy => Some(&self.last_enemy),
            TriggerKind::Killstreak => Some(&self.killstreak),
            TriggerKind::Dismember => Some(&self.dismember),
            TriggerKind::Headshot => Some(&self.headshot),
            TriggerKind::Crit => Some(&self.crit),
            TriggerKind::LongRange => Some(&self.long_range),
            TriggerKind::LowHealth => Some(&self.low_health),
            TriggerKind::Sneak => Some(&self.sneak),
            TriggerKind::BasicKill => None,
        }
    }

    pub fn get_mut(&mut self, kind: TriggerKind) -> Option<&mut TriggerSettings> {
        match kind {
            TriggerKind::LastEnemy => Some(&mut self.last_enemy),
            TriggerKind::Killstreak => Some(&mut self.killstreak),
            TriggerKind::Dismember => Some(&mut self.dismember),
            TriggerKind::Headshot => Some(&mut self.headshot),
            TriggerKind::Crit => Some(&mut self.crit),
            TriggerKind::LongRange => Some(&mut self.long_range),
            TriggerKind::LowHealth => Some(&mut self.low_health),
            TriggerKind::Sneak => Some(&mut self.sneak),
            TriggerKind::BasicKill => None,
        }
    }

    fn clamp(&mut self) {
        for kind in TriggerKind::PRIORITY_ORDER {
            if let Some(trigger) = self.get_mut(kind) {
                trigger.clamp();
            }
        }
    }
}

/// Per-weapon-category gate and camera override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponModeSettings {
    pub enabled: bool,
    #[serde(default)]
    pub camera_override: CameraOverride,
}

impl Default for WeaponModeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            camera_override: CameraOverride::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WeaponModes {
    pub melee: WeaponModeSettings,
    pub ranged: WeaponModeSettings,
    pub bow: WeaponModeSettings,
    pub explosive: WeaponModeSettings,
    pub trap: WeaponModeSettings,
}

impl WeaponModes {
    #[must_use]
    pub fn get(&self, category: WeaponCategory) -> &WeaponModeSettings {
        match category {
            WeaponCategory::Melee => &self.melee,
            WeaponCategory::Ranged => &self.ranged,
            WeaponCategory::Bow => &self.bow,
            WeaponCategory::Explosive => &self.explosive,
            WeaponCategory::Trap => &self.trap,
        }
    }
}

/// Hitstop configuration for one camera kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitstopChannel {
    pub enabled: bool,
    pub duration: f32,
    /// Restrict the full-freeze to critical kills.
    #[serde(default)]
    pub crit_only: bool,
}

impl Default for HitstopChannel {
    fn default() -> Self {
        Self {
            enabled: false,
            duration: 0.15,
            crit_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HitstopSettings {
    pub first_person: HitstopChannel,
    pub follow: HitstopChannel,
}

impl HitstopSettings {
    #[must_use]
    pub fn channel(&self, mode: CameraMode) -> &HitstopChannel {
        match mode {
            CameraMode::FirstPerson => &self.first_person,
            CameraMode::Follow => &self.follow,
        }
    }
}

/// What happens when a freeze-frame expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PostFreezeAction {
    /// End the whole sequence immediately.
    End,
    /// Resume the slow-motion cinematic.
    #[default]
    ContinueCinematic,
    /// Resume and re-place the follow camera on a fresh preset.
    SwitchCamera,
    /// End the freeze and skip the remaining cinematic.
    Skip,
}

/// Freeze-frame configuration for one camera kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreezeFrameChannel {
    pub enabled: bool,
    pub chance: f32,
    /// Seconds of unscaled time before the freeze lands. Zero freezes on
    /// the next tick.
    pub delay: f32,
    pub duration: f32,
    /// Near-zero multiplier held during the freeze; a true zero stalls
    /// particle cleanup in most engines.
    pub time_scale: f32,
    pub post_action: PostFreezeAction,
    pub on_basic_kill: bool,
    pub on_special_trigger: bool,
}

impl Default for FreezeFrameChannel {
    fn default() -> Self {
        Self {
            enabled: false,
            chance: 100.0,
            delay: 0.0,
            duration: 1.0,
            time_scale: 0.02,
            post_action: PostFreezeAction::ContinueCinematic,
            on_basic_kill: true,
            on_special_trigger: true,
        }
    }
}

impl FreezeFrameChannel {
    fn clamp(&mut self) {
        self.chance = self.chance.clamp(CHANCE_MIN, CHANCE_MAX);
        self.delay = self.delay.max(0.0);
        self.duration = self.duration.clamp(0.1, 5.0);
        self.time_scale = self.time_scale.clamp(MIN_TIME_SCALE, 0.1);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FreezeFrameSettings {
    pub first_person: FreezeFrameChannel,
    pub follow: FreezeFrameChannel,
}

impl FreezeFrameSettings {
    #[must_use]
    pub fn channel(&self, mode: CameraMode) -> &FreezeFrameChannel {
        match mode {
            CameraMode::FirstPerson => &self.first_person,
            CameraMode::Follow => &self.follow,
        }
    }
}

/// One killstreak tier; thresholds are kept ascending by `clamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillstreakTier {
    pub kills: u32,
    pub bonus_duration: f32,
    /// Slow-scale divisor; higher intensity means a smaller, more dramatic
    /// scale.
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillstreakSettings {
    pub enabled: bool,
    /// Scaled-time window after which an idle streak resets.
    pub timeout: f32,
    /// Streak size at which the Killstreak trigger context matches.
    pub kills_required: u32,
    pub tiers: Vec<KillstreakTier>,
}

impl Default for KillstreakSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout: 8.0,
            kills_required: 3,
            tiers: vec![
                KillstreakTier {
                    kills: 3,
                    bonus_duration: 0.5,
                    intensity: 1.2,
                },
                KillstreakTier {
                    kills: 5,
                    bonus_duration: 0.8,
                    intensity: 1.5,
                },
                KillstreakTier {
                    kills: 8,
                    bonus_duration: 1.0,
                    intensity: 1.8,
                },
            ],
        }
    }
}

impl KillstreakSettings {
    fn clamp(&mut self) {
        self.timeout = self.timeout.max(0.0);
        self.kills_required = self.kills_required.max(1);
        for tier in &mut self.tiers {
            tier.kills = tier.kills.max(1);
            tier.bonus_duration = tier.bonus_duration.max(0.0);
            tier.intensity = tier.intensity.max(1.0);
        }
        self.tiers.sort_by_key(|tier| tier.kills);
    }
}

/// Ragdoll-settle dynamic duration, keyed by trigger class and camera kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagdollSettings {
    pub basic_first_person: bool,
    pub basic_follow: bool,
    pub trigger_first_person: bool,
    pub trigger_follow: bool,
    /// Peak proxy speed below which the victim counts as settling.
    pub settle_speed_threshold: f32,
    /// Uninterrupted settled seconds required before the post-land delay.
    pub settle_duration: f32,
    pub post_land_delay: f32,
    /// Ceiling the sequence timer is extended to so the settle loop has
    /// room to fire; also the hard cap when no settle signal ever arrives.
    pub fallback_duration: f32,
    /// Position jumps beyond this per tick are treated as stale data.
    pub max_teleport_per_tick: f32,
}

impl Default for RagdollSettings {
    fn default() -> Self {
        Self {
            basic_first_person: false,
            basic_follow: false,
            trigger_first_person: false,
            trigger_follow: false,
            settle_speed_threshold: 0.25,
            settle_duration: 0.4,
            post_land_delay: 0.3,
            fallback_duration: 5.0,
            max_teleport_per_tick: 8.0,
        }
    }
}

impl RagdollSettings {
    #[must_use]
    pub fn enabled_for(&self, is_basic: bool, mode: CameraMode) -> bool {
        match (is_basic, mode) {
            (true, CameraMode::FirstPerson) => self.basic_first_person,
            (true, CameraMode::Follow) => self.basic_follow,
            (false, CameraMode::FirstPerson) => self.trigger_first_person,
            (false, CameraMode::Follow) => self.trigger_follow,
        }
    }

    fn clamp(&mut self) {
        self.settle_speed_threshold = self.settle_speed_threshold.max(0.0);
        self.settle_duration = self.settle_duration.max(0.0);
        self.post_land_delay = self.post_land_delay.max(0.0);
        self.fallback_duration = self
            .fallback_duration
            .clamp(MIN_SEQUENCE_DURATION, MAX_SEQUENCE_DURATION);
        self.max_teleport_per_tick = self.max_teleport_per_tick.max(0.1);
    }
}

/// Multi-victim chain reaction continuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainReactionSettings {
    pub enabled: bool,
    /// Pending-victim cap; kills beyond it are dropped, not queued.
    pub max_kills: u32,
    /// Seconds granted to each chained segment.
    pub transition_time: f32,
    /// Slow time further with each chained victim.
    pub slow_mo_ramp: bool,
    pub scale_multiplier: f32,
    pub min_scale: f32,
}

impl Default for ChainReactionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_kills: 5,
            transition_time: 0.5,
            slow_mo_ramp: true,
            scale_multiplier: 0.8,
            min_scale: 0.05,
        }
    }
}

impl ChainReactionSettings {
    fn clamp(&mut self) {
        self.max_kills = self.max_kills.max(1);
        self.transition_time = self.transition_time.clamp(0.1, 5.0);
        self.scale_multiplier = self.scale_multiplier.clamp(0.1, 1.0);
        self.min_scale = self.min_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
    }
}

/// Exit easing for one camera kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnTiming {
    /// Elapsed active seconds at which the time-scale restore begins.
    pub return_start: f32,
    /// Restore window as a fraction of the sequence duration, 0-1.
    pub return_percent: f32,
}

impl Default for ReturnTiming {
    fn default() -> Self {
        Self {
            return_start: 1.0,
            return_percent: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TimingSettings {
    pub first_person: ReturnTiming,
    pub follow: ReturnTiming,
}

impl TimingSettings {
    #[must_use]
    pub fn channel(&self, mode: CameraMode) -> &ReturnTiming {
        match mode {
            CameraMode::FirstPerson => &self.first_person,
            CameraMode::Follow => &self.follow,
        }
    }

    fn clamp(&mut self) {
        for timing in [&mut self.first_person, &mut self.follow] {
            timing.return_start = timing.return_start.max(0.0);
            timing.return_percent = timing.return_percent.clamp(0.0, 1.0);
        }
    }
}

/// Audio duck during slow motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub duck_during_slow_mo: bool,
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            duck_during_slow_mo: true,
            volume: 0.5,
        }
    }
}

/// Screen-effect command gating; rendering stays with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectsSettings {
    pub kill_flash: bool,
    pub kill_flash_chance: f32,
    pub kill_flash_first_person: bool,
    pub kill_flash_follow: bool,
}

impl Default for EffectsSettings {
    fn default() -> Self {
        Self {
            kill_flash: true,
            kill_flash_chance: 100.0,
            kill_flash_first_person: true,
            kill_flash_follow: true,
        }
    }
}

/// Complete configuration consumed by [`crate::session::CinematicSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CinematicSettings {
    pub enabled: EnabledFlag,
    /// Shared chance for special triggers without their own override, 0-100.
    pub master_trigger_chance: MasterChance,
    /// Abort kills no trigger claimed instead of trying the basic fallback.
    pub require_trigger: bool,
    pub long_range_distance: LongRangeDistance,
    /// Attacker health percentage at or below which LowHealth matches.
    pub low_health_pct: LowHealthPct,
    pub smart_indoor_outdoor: SmartProbeFlag,
    pub basic_kill: BasicKillSettings,
    pub trigger_defaults: TriggerDefaults,
    pub triggers: TriggerTable,
    pub weapon_modes: WeaponModes,
    pub hitstop: HitstopSettings,
    pub freeze_frame: FreezeFrameSettings,
    pub killstreak: KillstreakSettings,
    pub ragdoll: RagdollSettings,
    pub chain: ChainReactionSettings,
    pub timing: TimingSettings,
    pub audio: AudioSettings,
    pub effects: EffectsSettings,
}

// Newtype defaults so `#[serde(default)]` on the container produces the
// shipped defaults rather than zeroed primitives.
macro_rules! default_wrapper {
    ($name:ident, $ty:ty, $value:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $ty);

        impl Default for $name {
            fn default() -> Self {
                Self($value)
            }
        }
    };
}

default_wrapper!(EnabledFlag, bool, true);
default_wrapper!(SmartProbeFlag, bool, true);
default_wrapper!(MasterChance, f32, 100.0);
default_wrapper!(LongRangeDistance, f32, 25.0);
default_wrapper!(LowHealthPct, f32, 30.0);

impl CinematicSettings {
    /// Decode a settings tree from JSON supplied by the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a settings tree. The
    /// decoded tree is clamped to its valid domain before being returned.
    pub fn from_json(data: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = serde_json::from_str(data)?;
        settings.clamp();
        Ok(settings)
    }

    /// The embedded default configuration.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_SETTINGS_DATA).unwrap_or_default()
    }

    /// Clamp every tunable to its valid domain. Out-of-range values are
    /// recovered, never rejected.
    pub fn clamp(&mut self) {
        self.master_trigger_chance.0 = self.master_trigger_chance.0.clamp(CHANCE_MIN, CHANCE_MAX);
        self.long_range_distance.0 = self.long_range_distance.0.max(0.0);
        self.low_health_pct.0 = self.low_health_pct.0.clamp(0.0, 100.0);

        self.basic_kill.chance = self.basic_kill.chance.clamp(CHANCE_MIN, CHANCE_MAX);
        self.basic_kill.duration = self
            .basic_kill
            .duration
            .clamp(MIN_SEQUENCE_DURATION, MAX_SEQUENCE_DURATION);
        self.basic_kill.time_scale = self.basic_kill.time_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        self.basic_kill.cooldown = self.basic_kill.cooldown.max(0.0);
        self.basic_kill.first_person_chance = self
            .basic_kill
            .first_person_chance
            .clamp(CHANCE_MIN, CHANCE_MAX);
        self.basic_kill
            .randomize_duration
            .clamp_to(MIN_SEQUENCE_DURATION, MAX_SEQUENCE_DURATION);
        self.basic_kill
            .randomize_time_scale
            .clamp_to(MIN_TIME_SCALE, MAX_TIME_SCALE);

        self.trigger_defaults.duration = self
            .trigger_defaults
            .duration
            .clamp(MIN_SEQUENCE_DURATION, MAX_SEQUENCE_DURATION);
        self.trigger_defaults.time_scale = self
            .trigger_defaults
            .time_scale
            .clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        self.trigger_defaults.cooldown = self.trigger_defaults.cooldown.max(0.0);
        self.trigger_defaults.first_person_chance = self
            .trigger_defaults
            .first_person_chance
            .clamp(CHANCE_MIN, CHANCE_MAX);
        self.trigger_defaults
            .randomize_duration
            .clamp_to(MIN_SEQUENCE_DURATION, MAX_SEQUENCE_DURATION);
        self.trigger_defaults
            .randomize_time_scale
            .clamp_to(MIN_TIME_SCALE, MAX_TIME_SCALE);

        self.triggers.clamp();
        for channel in [&mut self.hitstop.first_person, &mut self.hitstop.follow] {
            channel.duration = channel.duration.clamp(0.0, 1.0);
        }
        self.freeze_frame.first_person.clamp();
        self.freeze_frame.follow.clamp();
        self.killstreak.clamp();
        self.ragdoll.clamp();
        self.chain.clamp();
        self.timing.clamp();
        self.audio.volume = self.audio.volume.clamp(0.0, 1.0);
        self.effects.kill_flash_chance = self.effects.kill_flash_chance.clamp(CHANCE_MIN, CHANCE_MAX);
    }

    /// Resolve the effective shared-or-override parameters for a trigger.
    #[must_use]
    pub fn effective_params(&self, kind: TriggerKind) -> EffectiveParams {
        match self.triggers.get(kind) {
            Some(trigger) if trigger.override_params => EffectiveParams {
                duration: trigger.duration,
                time_scale: trigger.time_scale,
                cooldown: trigger.cooldown,
                allow_first_person: trigger.allow_first_person,
                allow_follow: trigger.allow_follow,
                first_person_chance: trigger.first_person_chance,
                has_override: true,
                randomize_duration: trigger.randomize_duration,
                randomize_time_scale: trigger.randomize_time_scale,
            },
            Some(trigger) => EffectiveParams {
                duration: self.trigger_defaults.duration,
                time_scale: self.trigger_defaults.time_scale,
                cooldown: self.trigger_defaults.cooldown,
                // The trigger's own allow flags still count without an
                // override; the camera selector intersects them with the
                // shared defaults.
                allow_first_person: trigger.allow_first_person,
                allow_follow: trigger.allow_follow,
                first_person_chance: self.trigger_defaults.first_person_chance,
                has_override: false,
                randomize_duration: if trigger.randomize_duration.enabled {
                    trigger.randomize_duration
                } else {
                    self.trigger_defaults.randomize_duration
                },
                randomize_time_scale: if trigger.randomize_time_scale.enabled {
                    trigger.randomize_time_scale
                } else {
                    self.trigger_defaults.randomize_time_scale
                },
            },
            None => EffectiveParams {
                duration: self.basic_kill.duration,
                time_scale: self.basic_kill.time_scale,
                cooldown: self.basic_kill.cooldown,
                allow_first_person: self.basic_kill.allow_first_person,
                allow_follow: self.basic_kill.allow_follow,
                first_person_chance: self.basic_kill.first_person_chance,
                has_override: true,
                randomize_duration: self.basic_kill.randomize_duration,
                randomize_time_scale: self.basic_kill.randomize_time_scale,
            },
        }
    }
}

/// Effective cinematic parameters after the defaults-or-override decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParams {
    pub duration: f32,
    pub time_scale: f32,
    pub cooldown: f32,
    pub allow_first_person: bool,
    pub allow_follow: bool,
    pub first_person_chance: f32,
    /// Whether the trigger declared its own camera block. When unset, the
    /// camera selector intersects the allow flags with the shared defaults.
    pub has_override: bool,
    pub randomize_duration: RandomRange,
    pub randomize_time_scale: RandomRange,
}
