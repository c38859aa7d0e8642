//! Session façade: the single entry point hosts drive every frame.
//!
//! A session owns the settings, the seeded RNG, both clocks, the cooldown
//! table, the streak counter, and at most one active sequence. Hosts call
//! [`CinematicSession::on_kill_event`] when a hostile dies and
//! [`CinematicSession::advance`] once per frame with both delta times;
//! both return command buffers to apply in order.
//!
//! Identical seeds and identical call sequences produce identical command
//! streams, which is what the replay harness leans on.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::camera::{select_camera, CameraMode};
use crate::command::{Command, Commands, ScreenEffectKind};
use crate::constants::{
    LOG_SEQUENCE_CANCELLED, LOG_SEQUENCE_END, LOG_SEQUENCE_START, LOG_TIME_RESTORED,
    LOG_TRIGGER_BLOCKED_COOLDOWN, LOG_TRIGGER_FIRED_PREFIX, MIN_RETURN_DURATION, MIN_TIME_SCALE,
    SMOOTH_RESTORE_SECONDS, ZOOM_AMOUNT,
};
use crate::cooldown::{active_tier, CooldownTable, StreakState};
use crate::event::{KillEvent, TriggerKind, WeaponCategory};
use crate::ragdoll::RagdollTracking;
use crate::sequence::{
    ChainQueue, FreezeFrameState, FreezePhase, HitstopState, SequenceState, SequenceTick,
};
use crate::settings::{CinematicSettings, EffectiveParams, RandomRange};
use crate::triggers::{self, BlockReason, TriggerDecision};
use crate::world::WorldAdapter;

/// Why a kill produced no cinematic, or what it did instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// A sequence started for this reason under this camera.
    Started {
        reason: TriggerKind,
        camera: CameraMode,
    },
    /// Queued onto the running sequence as a chain-reaction victim.
    Chained,
    /// A trigger claimed the kill but a gate said no.
    Blocked {
        kind: TriggerKind,
        reason: BlockReason,
    },
    /// Feature disabled, weapon gated out, or the kill arrived while a
    /// sequence was running with chaining off.
    Suppressed,
    /// Nothing claimed the kill.
    NoMatch,
    /// A collaborator needed at start time was missing; nothing changed.
    Aborted(AbortReason),
}

/// Start-time aborts. Recovery is always "leave the world untouched".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// No camera pose to restore to later.
    MissingCameraPose,
    /// Every camera mode was ruled out by configuration.
    NoCameraMode,
}

/// Smooth time-scale restore that outlives the sequence that needed it.
#[derive(Debug, Clone, Copy)]
struct TimeRestore {
    from: f32,
    elapsed: f32,
    duration: f32,
}

/// Frame-driven cinematic state machine.
#[derive(Debug)]
pub struct CinematicSession {
    settings: CinematicSettings,
    rng: ChaCha20Rng,
    seed: u64,
    /// Real seconds since session start.
    unscaled_clock: f64,
    /// Game-time seconds; advances slower while a sequence slows the world.
    scaled_clock: f64,
    cooldowns: CooldownTable,
    streak: StreakState,
    sequence: Option<SequenceState>,
    restore: Option<TimeRestore>,
    audio_ducked: bool,
    logs: Vec<String>,
}

impl CinematicSession {
    #[must_use]
    pub fn new(mut settings: CinematicSettings, seed: u64) -> Self {
        settings.clamp();
        Self {
            settings,
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed,
            unscaled_clock: 0.0,
            scaled_clock: 0.0,
            cooldowns: CooldownTable::new(),
            streak: StreakState::new(),
            sequence: None,
            restore: None,
            audio_ducked: false,
            logs: Vec::new(),
        }
    }

    /// Session with the embedded default configuration.
    #[must_use]
    pub fn with_default_settings(seed: u64) -> Self {
        Self::new(CinematicSettings::load_from_static(), seed)
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.sequence.is_some()
    }

    /// Reason behind the running sequence, if any.
    #[must_use]
    pub fn current_reason(&self) -> Option<TriggerKind> {
        self.sequence.as_ref().map(|seq| seq.reason)
    }

    /// Current global time multiplier this session believes is applied.
    #[must_use]
    pub fn time_scale(&self) -> f32 {
        if let Some(seq) = &self.sequence {
            return seq.current_scale;
        }
        if let Some(restore) = &self.restore {
            let progress = (restore.elapsed / restore.duration).clamp(0.0, 1.0);
            return restore.from + (1.0 - restore.from) * progress;
        }
        1.0
    }

    #[must_use]
    pub const fn settings(&self) -> &CinematicSettings {
        &self.settings
    }

    /// Live-reload the configuration. The running sequence, if any, keeps
    /// the parameters it started with.
    pub fn apply_settings(&mut self, mut settings: CinematicSettings) {
        settings.clamp();
        self.settings = settings;
    }

    /// Structured log keys accumulated since the last drain.
    pub fn drain_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    /// Feed one kill. Returns what happened plus commands to apply.
    pub fn on_kill_event<W: WorldAdapter + ?Sized>(
        &mut self,
        event: &KillEvent,
        world: &W,
    ) -> (KillOutcome, Commands) {
        let mut commands = Commands::new();
        if !self.settings.enabled.0 {
            return (KillOutcome::Suppressed, commands);
        }
        // The player never witnessed a trap kill; a cinematic would frame
        // an empty room.
        if event.weapon == WeaponCategory::Trap
            || !self.settings.weapon_modes.get(event.weapon).enabled
        {
            return (KillOutcome::Suppressed, commands);
        }

        if self.settings.killstreak.enabled {
            // The streak itself only grows when a sequence starts; here a
            // stale one is dropped before it can satisfy the context.
            self.streak
                .expire_if_idle(self.scaled_clock, self.settings.killstreak.timeout);
        }

        if let Some(seq) = &mut self.sequence {
            if self.settings.chain.enabled
                && seq.enqueue_chain(event.victim, self.settings.chain.max_kills)
            {
                return (KillOutcome::Chained, commands);
            }
            return (KillOutcome::Suppressed, commands);
        }

        let decision = triggers::resolve(
            &self.settings,
            event,
            &self.streak,
            &self.cooldowns,
            self.unscaled_clock,
            &mut self.rng,
        );
        match decision {
            TriggerDecision::NoMatch => (KillOutcome::NoMatch, commands),
            TriggerDecision::Blocked { kind, reason } => {
                if reason == BlockReason::Cooldown {
                    self.logs.push(LOG_TRIGGER_BLOCKED_COOLDOWN.to_string());
                }
                (KillOutcome::Blocked { kind, reason }, commands)
            }
            TriggerDecision::Fire(fired) => {
                let outcome = self.start_sequence(fired.kind, fired.params, event, world, &mut commands);
                (outcome, commands)
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_sequence<W: WorldAdapter + ?Sized>(
        &mut self,
        reason: TriggerKind,
        params: EffectiveParams,
        event: &KillEvent,
        world: &W,
        commands: &mut Commands,
    ) -> KillOutcome {
        // Nothing may change before every collaborator is confirmed.
        if world.camera_pose().is_none() {
            return KillOutcome::Aborted(AbortReason::MissingCameraPose);
        }
        let Some(camera) = select_camera(&self.settings, &params, event.weapon, world, &mut self.rng)
        else {
            return KillOutcome::Aborted(AbortReason::NoCameraMode);
        };

        // Only kills that actually stage a cinematic feed the streak; the
        // one starting this sequence counts toward its own tier.
        let streak = if self.settings.killstreak.enabled {
            self.streak
                .register_kill(self.scaled_clock, self.settings.killstreak.timeout)
        } else {
            0
        };

        let base_duration = self.roll(params.randomize_duration, params.duration);
        let mut duration = base_duration;
        let mut slow_scale = self.roll(params.randomize_time_scale, params.time_scale);

        if self.settings.killstreak.enabled && !reason.is_basic() {
            if let Some(tier) = active_tier(&self.settings.killstreak, streak) {
                duration += tier.bonus_duration;
                slow_scale = (slow_scale / tier.intensity).max(MIN_TIME_SCALE);
            }
        }

        let ragdoll = self
            .settings
            .ragdoll
            .enabled_for(reason.is_basic(), camera)
            .then(|| {
                duration = duration.max(self.settings.ragdoll.fallback_duration);
                RagdollTracking::new(event.victim)
            });

        let timing = self.settings.timing.channel(camera);
        let return_duration = (duration * timing.return_percent).max(MIN_RETURN_DURATION);
        // Tier bonuses and the ragdoll ceiling stretch the restore point
        // with the window, like the zoom hold below.
        let stretch = duration / base_duration;
        let return_start = (timing.return_start * stretch)
            .min(duration - return_duration)
            .max(0.0);

        let hitstop_channel = self.settings.hitstop.channel(camera);
        let trigger = self.settings.triggers.get(reason);
        let (hitstop_on, hitstop_duration, hitstop_crit_only) = match trigger {
            Some(t) if t.override_hitstop => (true, t.hitstop_duration, t.hitstop_crit_only),
            _ => (
                hitstop_channel.enabled,
                hitstop_channel.duration,
                hitstop_channel.crit_only,
            ),
        };
        let hitstop = (hitstop_on
            && hitstop_duration > 0.0
            && (!hitstop_crit_only || event.was_crit))
        .then_some(HitstopState {
            remaining: hitstop_duration,
        });

        let freeze_channel = self.settings.freeze_frame.channel(camera);
        let freeze_applies = freeze_channel.enabled
            && if reason.is_basic() {
                freeze_channel.on_basic_kill
            } else {
                freeze_channel.on_special_trigger
            };
        let freeze = (freeze_applies
            && self.rng.random_range(0.0..100.0) < freeze_channel.chance)
        .then_some(FreezeFrameState {
            phase: FreezePhase::Waiting {
                delay_remaining: freeze_channel.delay,
            },
            duration: freeze_channel.duration,
            time_scale: freeze_channel.time_scale,
            post_action: freeze_channel.post_action,
        });

        let opening_scale = if hitstop.is_some() {
            MIN_TIME_SCALE
        } else {
            slow_scale
        };
        commands.push(Command::SetTimeScale(opening_scale));
        commands.push(Command::SwitchCamera {
            mode: camera,
            victim: event.victim,
        });
        if camera == CameraMode::FirstPerson {
            commands.push(Command::BeginZoom {
                amount: ZOOM_AMOUNT,
                hold_frac: (duration / base_duration).max(1.0),
            });
        }
        let flash_allowed = self.settings.effects.kill_flash
            && match camera {
                CameraMode::FirstPerson => self.settings.effects.kill_flash_first_person,
                CameraMode::Follow => self.settings.effects.kill_flash_follow,
            };
        if flash_allowed
            && self.rng.random_range(0.0..100.0) < self.settings.effects.kill_flash_chance
        {
            commands.push(Command::ScreenEffect(ScreenEffectKind::KillFlash));
        }
        if self.settings.audio.duck_during_slow_mo {
            commands.push(Command::SetAudioVolume(self.settings.audio.volume));
            self.audio_ducked = true;
        }
        commands.push(Command::HudNotify {
            log_key: format!("{LOG_TRIGGER_FIRED_PREFIX}{reason}"),
            streak,
        });

        // Cooldown arms only now that the start cannot fail, and covers
        // the whole sequence plus the configured gap.
        self.cooldowns
            .arm(reason, self.unscaled_clock, duration, params.cooldown);

        self.logs.push(format!("{LOG_TRIGGER_FIRED_PREFIX}{reason}"));
        self.logs.push(LOG_SEQUENCE_START.to_string());
        if hitstop.is_some() {
            self.logs
                .push(crate::constants::LOG_HITSTOP_START.to_string());
        }

        self.restore = None;
        self.sequence = Some(SequenceState {
            reason,
            victim: event.victim,
            camera,
            duration,
            elapsed: 0.0,
            slow_scale,
            current_scale: opening_scale,
            return_start,
            return_duration,
            hitstop,
            freeze,
            ragdoll,
            chain: ChainQueue::new(),
            victims_played: 1,
        });
        KillOutcome::Started { reason, camera }
    }

    /// Advance by one frame.
    ///
    /// `dt` is the scaled game-time delta the host actually applied this
    /// frame; only the killstreak window runs on it. `unscaled_dt` is real
    /// seconds and drives every sequence timer, so a 0.1x world still ends
    /// a two second cinematic after two real seconds.
    pub fn advance<W: WorldAdapter + ?Sized>(
        &mut self,
        dt: f32,
        unscaled_dt: f32,
        world: &W,
    ) -> Commands {
        let mut commands = Commands::new();
        let dt = dt.max(0.0);
        let unscaled_dt = unscaled_dt.max(0.0);
        self.unscaled_clock += f64::from(unscaled_dt);
        self.scaled_clock += f64::from(dt);

        if let Some(seq) = &mut self.sequence {
            let outcome =
                seq.advance(&self.settings, world, unscaled_dt, &mut commands, &mut self.logs);
            if let SequenceTick::Finished { at_rest } = outcome {
                self.teardown(at_rest, LOG_SEQUENCE_END, &mut commands);
            }
            return commands;
        }

        if let Some(restore) = &mut self.restore {
            restore.elapsed += unscaled_dt;
            let progress = (restore.elapsed / restore.duration).clamp(0.0, 1.0);
            let eased = restore.from + (1.0 - restore.from) * progress;
            commands.push(Command::SetTimeScale(eased));
            if progress >= 1.0 {
                self.restore = None;
                self.logs.push(LOG_TIME_RESTORED.to_string());
            }
            return commands;
        }

        if self.settings.killstreak.enabled {
            self.streak
                .expire_if_idle(self.scaled_clock, self.settings.killstreak.timeout);
        }
        commands
    }

    /// Tear the running sequence down right now. Safe to call when idle.
    ///
    /// The returned commands restore camera and audio only; the world is
    /// still slowed when this returns. Keep calling [`Self::advance`] until
    /// [`Self::time_scale`] reads 1.0 again, or apply full speed directly
    /// when the host is about to stop ticking (a pause menu, a level exit).
    pub fn cancel(&mut self) -> Commands {
        let mut commands = Commands::new();
        if self.sequence.is_some() {
            self.teardown(false, LOG_SEQUENCE_CANCELLED, &mut commands);
        }
        commands
    }

    fn teardown(&mut self, at_rest: bool, log_key: &str, commands: &mut Commands) {
        let Some(seq) = self.sequence.take() else {
            return;
        };
        commands.push(Command::RestoreCamera);
        if self.audio_ducked {
            commands.push(Command::RestoreAudio);
            self.audio_ducked = false;
        }
        if at_rest {
            commands.push(Command::SetTimeScale(1.0));
            self.restore = None;
            self.logs.push(LOG_TIME_RESTORED.to_string());
        } else {
            // Snapping back to full speed reads as a glitch; ease out over
            // a short fixed window instead.
            self.restore = Some(TimeRestore {
                from: seq.current_scale,
                elapsed: 0.0,
                duration: SMOOTH_RESTORE_SECONDS,
            });
        }
        self.logs.push(log_key.to_string());
    }

    fn roll(&mut self, range: RandomRange, fixed: f32) -> f32 {
        if range.enabled && range.max > range.min {
            self.rng.random_range(range.min..=range.max)
        } else {
            fixed
        }
    }
}
