//! The active cinematic sequence state machine.
//!
//! A sequence owns the global time scale while it runs. Phases, in order:
//! optional hitstop (hard freeze), slow motion, optional freeze-frame
//! (delayed near-zero hold with a configurable exit), smooth time-scale
//! restore over the tail of the sequence. A ragdoll settle watch or a
//! queued chain-reaction victim can cut the timeline short or extend it.
//!
//! All phase timers run on unscaled wall time so a 0.1x world still ends a
//! two second cinematic after two real seconds.

use smallvec::SmallVec;

use crate::camera::CameraMode;
use crate::command::{Command, Commands};
use crate::constants::{
    LOG_FREEZE_END_PREFIX, LOG_FREEZE_START, LOG_HITSTOP_END, LOG_RAGDOLL_SETTLED,
    LOG_SEQUENCE_CHAINED, MIN_RETURN_DURATION, MIN_TIME_SCALE, ZOOM_AMOUNT,
};
use crate::event::{EntityId, TriggerKind};
use crate::ragdoll::{RagdollTracking, RagdollVerdict};
use crate::settings::{CinematicSettings, PostFreezeAction};
use crate::world::WorldAdapter;

/// Hard freeze at the start of a sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitstopState {
    pub remaining: f32,
}

/// Scheduled or running freeze-frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreezePhase {
    /// Counting down unscaled seconds until the freeze lands.
    Waiting { delay_remaining: f32 },
    Frozen { remaining: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezeFrameState {
    pub phase: FreezePhase,
    pub duration: f32,
    pub time_scale: f32,
    pub post_action: PostFreezeAction,
}

/// Victims waiting for a chain-reaction continuation.
pub type ChainQueue = SmallVec<[EntityId; 4]>;

/// How one tick left the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceTick {
    Running,
    /// Sequence over. `at_rest` means the restore easing already brought
    /// the scale back to normal; otherwise the caller owes a smooth
    /// restore from [`SequenceState::current_scale`].
    Finished { at_rest: bool },
}

/// Live sequence. Built by the session once a trigger fires and a camera
/// mode is chosen; destroyed on finish or cancel.
#[derive(Debug)]
pub struct SequenceState {
    pub reason: TriggerKind,
    pub victim: EntityId,
    pub camera: CameraMode,
    /// Total active window in unscaled seconds, bonuses included.
    pub duration: f32,
    pub elapsed: f32,
    /// Target slow-motion multiplier for the main phase.
    pub slow_scale: f32,
    /// Multiplier currently applied to the world.
    pub current_scale: f32,
    /// Elapsed seconds at which the restore easing begins.
    pub return_start: f32,
    pub return_duration: f32,
    pub hitstop: Option<HitstopState>,
    pub freeze: Option<FreezeFrameState>,
    pub ragdoll: Option<RagdollTracking>,
    pub chain: ChainQueue,
    /// Victims already consumed through chaining, the initial one included.
    pub victims_played: u32,
}

impl SequenceState {
    /// Whether the restore easing has begun.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.hitstop.is_none() && self.elapsed >= self.return_start
    }

    /// Queue a chain-reaction victim; drops the victim when the pending
    /// backlog has hit `max_kills`. Victims already played do not count
    /// against the cap, only the waiting ones do.
    pub fn enqueue_chain(&mut self, victim: EntityId, max_kills: u32) -> bool {
        if self.chain.len() as u32 >= max_kills {
            return false;
        }
        self.chain.push(victim);
        true
    }

    /// Advance the sequence by one unscaled-time step.
    pub fn advance<W: WorldAdapter + ?Sized>(
        &mut self,
        settings: &CinematicSettings,
        world: &W,
        dt: f32,
        commands: &mut Commands,
        logs: &mut Vec<String>,
    ) -> SequenceTick {
        // Hitstop holds the world completely; its expiry tick is consumed
        // so the slow-motion window starts on the next frame.
        if let Some(hitstop) = &mut self.hitstop {
            hitstop.remaining -= dt;
            if hitstop.remaining <= 0.0 {
                self.hitstop = None;
                self.current_scale = self.slow_scale;
                commands.push(Command::SetTimeScale(self.slow_scale));
                logs.push(LOG_HITSTOP_END.to_string());
            }
            return SequenceTick::Running;
        }

        if let Some(tick) = self.advance_freeze(dt, commands, logs) {
            return tick;
        }

        if let Some(tracking) = &mut self.ragdoll {
            match tracking.update(&settings.ragdoll, world, dt) {
                RagdollVerdict::Tracking => {}
                RagdollVerdict::Settled => {
                    logs.push(LOG_RAGDOLL_SETTLED.to_string());
                    return self.finish_or_chain(settings, commands, logs);
                }
            }
        }

        self.elapsed += dt;
        if self.elapsed >= self.return_start {
            let progress =
                ((self.elapsed - self.return_start) / self.return_duration).clamp(0.0, 1.0);
            let eased = self.slow_scale + (1.0 - self.slow_scale) * progress;
            // Skip sub-visible deltas so float drift cannot spam the host.
            if (eased - self.current_scale).abs() > 1e-4 {
                self.current_scale = eased;
                commands.push(Command::SetTimeScale(eased));
            }
        }
        if self.elapsed >= self.duration {
            return self.finish_or_chain(settings, commands, logs);
        }
        SequenceTick::Running
    }

    fn advance_freeze(
        &mut self,
        dt: f32,
        commands: &mut Commands,
        logs: &mut Vec<String>,
    ) -> Option<SequenceTick> {
        let freeze = self.freeze.as_mut()?;
        match &mut freeze.phase {
            FreezePhase::Waiting { delay_remaining } => {
                // The delay owns the tick: countdown, ragdoll watch and
                // easing all wait for the freeze to land and resolve.
                *delay_remaining -= dt;
                if *delay_remaining <= 0.0 {
                    freeze.phase = FreezePhase::Frozen {
                        remaining: freeze.duration,
                    };
                    let time_scale = freeze.time_scale;
                    self.current_scale = time_scale;
                    commands.push(Command::SetTimeScale(time_scale));
                    commands.push(Command::ScreenEffect(
                        crate::command::ScreenEffectKind::FreezeContrast,
                    ));
                    match self.camera {
                        CameraMode::FirstPerson => commands.push(Command::BeginZoom {
                            amount: ZOOM_AMOUNT,
                            hold_frac: 1.0,
                        }),
                        CameraMode::Follow => commands.push(Command::PlaceFollowPreset {
                            victim: self.victim,
                        }),
                    }
                    logs.push(LOG_FREEZE_START.to_string());
                }
                Some(SequenceTick::Running)
            }
            FreezePhase::Frozen { remaining } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return Some(SequenceTick::Running);
                }
                let action = freeze.post_action;
                self.freeze = None;
                logs.push(format!("{LOG_FREEZE_END_PREFIX}{}", action_key(action)));
                match action {
                    PostFreezeAction::End | PostFreezeAction::Skip => {
                        Some(SequenceTick::Finished { at_rest: false })
                    }
                    PostFreezeAction::ContinueCinematic => {
                        self.current_scale = self.slow_scale;
                        commands.push(Command::SetTimeScale(self.slow_scale));
                        Some(SequenceTick::Running)
                    }
                    PostFreezeAction::SwitchCamera => {
                        self.current_scale = self.slow_scale;
                        commands.push(Command::SetTimeScale(self.slow_scale));
                        if self.camera == CameraMode::Follow {
                            commands.push(Command::PlaceFollowPreset {
                                victim: self.victim,
                            });
                        }
                        Some(SequenceTick::Running)
                    }
                }
            }
        }
    }

    /// End the current segment, continuing into a queued chain victim when
    /// one is waiting.
    fn finish_or_chain(
        &mut self,
        settings: &CinematicSettings,
        commands: &mut Commands,
        logs: &mut Vec<String>,
    ) -> SequenceTick {
        let Some(next) = (settings.chain.enabled).then(|| self.chain.first().copied()).flatten()
        else {
            let at_rest = (self.current_scale - 1.0).abs() < 1e-3;
            return SequenceTick::Finished { at_rest };
        };
        self.chain.remove(0);
        self.victims_played += 1;
        self.victim = next;

        if settings.chain.slow_mo_ramp {
            self.slow_scale = (self.slow_scale * settings.chain.scale_multiplier)
                .clamp(settings.chain.min_scale.max(MIN_TIME_SCALE), 1.0);
        }
        self.current_scale = self.slow_scale;
        commands.push(Command::SetTimeScale(self.slow_scale));

        // A fresh, shorter window for the new victim; the restore easing
        // keeps its width and slides to the new tail.
        self.duration = self.elapsed + settings.chain.transition_time;
        self.return_duration = self
            .return_duration
            .min(settings.chain.transition_time)
            .max(MIN_RETURN_DURATION);
        self.return_start = self.duration - self.return_duration;

        match self.camera {
            CameraMode::Follow => commands.push(Command::PlaceFollowPreset { victim: next }),
            CameraMode::FirstPerson => commands.push(Command::SwitchCamera {
                mode: CameraMode::FirstPerson,
                victim: next,
            }),
        }
        if self.ragdoll.is_some() {
            self.ragdoll = Some(RagdollTracking::new(next));
        }
        logs.push(LOG_SEQUENCE_CHAINED.to_string());
        SequenceTick::Running
    }
}

fn action_key(action: PostFreezeAction) -> &'static str {
    match action {
        PostFreezeAction::End => "end",
        PostFreezeAction::ContinueCinematic => "continue",
        PostFreezeAction::SwitchCamera => "switch_camera",
        PostFreezeAction::Skip => "skip",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::StaticWorld;

    fn sequence() -> SequenceState {
        SequenceState {
            reason: TriggerKind::Headshot,
            victim: EntityId(1),
            camera: CameraMode::FirstPerson,
            duration: 1.25,
            elapsed: 0.0,
            slow_scale: 0.2,
            current_scale: 0.2,
            return_start: 1.0,
            return_duration: 0.25,
            hitstop: None,
            freeze: None,
            ragdoll: None,
            chain: ChainQueue::new(),
            victims_played: 1,
        }
    }

    fn tick(seq: &mut SequenceState, settings: &CinematicSettings, dt: f32) -> (Commands, SequenceTick) {
        let world = StaticWorld::outdoors();
        let mut commands = Commands::new();
        let mut logs = Vec::new();
        let outcome = seq.advance(settings, &world, dt, &mut commands, &mut logs);
        (commands, outcome)
    }

    #[test]
    fn restore_eases_linearly_over_the_tail() {
        let settings = CinematicSettings::default();
        let mut seq = sequence();
        // 0.0 .. 1.0: steady slow motion, no scale commands. Steps of
        // 0.125 are exact in binary, so elapsed hits 1.0 and 1.25 dead on.
        for _ in 0..8 {
            let (commands, outcome) = tick(&mut seq, &settings, 0.125);
            assert_eq!(outcome, SequenceTick::Running);
            assert!(commands.iter().all(|c| !c.is_time_scale()));
        }
        // Halfway through the restore window the scale is halfway home.
        let (commands, _) = tick(&mut seq, &settings, 0.125);
        match commands.as_slice() {
            [Command::SetTimeScale(scale)] => assert!((scale - 0.6).abs() < 1e-3),
            other => panic!("expected one scale command, got {other:?}"),
        }
        // End of window: the final easing step lands with the finish.
        let (commands, outcome) = tick(&mut seq, &settings, 0.125);
        match commands.as_slice() {
            [Command::SetTimeScale(scale)] => assert!((scale - 1.0).abs() < 1e-3),
            other => panic!("expected one scale command, got {other:?}"),
        }
        assert_eq!(outcome, SequenceTick::Finished { at_rest: true });
    }

    #[test]
    fn hitstop_holds_then_hands_off_to_slow_motion() {
        let settings = CinematicSettings::default();
        let mut seq = sequence();
        seq.hitstop = Some(HitstopState { remaining: 0.15 });
        seq.current_scale = 0.0;
        let (commands, outcome) = tick(&mut seq, &settings, 0.1);
        assert_eq!(outcome, SequenceTick::Running);
        assert!(commands.is_empty());
        assert_eq!(seq.elapsed, 0.0);
        let (commands, _) = tick(&mut seq, &settings, 0.1);
        assert_eq!(commands.as_slice(), [Command::SetTimeScale(0.2)]);
        // The expiry tick did not advance the main timeline.
        assert_eq!(seq.elapsed, 0.0);
    }

    #[test]
    fn freeze_end_action_terminates_early() {
        let settings = CinematicSettings::default();
        let mut seq = sequence();
        seq.freeze = Some(FreezeFrameState {
            phase: FreezePhase::Waiting {
                delay_remaining: 0.1,
            },
            duration: 0.2,
            time_scale: 0.02,
            post_action: PostFreezeAction::End,
        });
        let (commands, _) = tick(&mut seq, &settings, 0.1);
        assert!(commands.iter().any(|c| matches!(c, Command::SetTimeScale(s) if *s < 0.05)));
        tick(&mut seq, &settings, 0.1);
        let (_, outcome) = tick(&mut seq, &settings, 0.1);
        assert_eq!(outcome, SequenceTick::Finished { at_rest: false });
    }

    #[test]
    fn freeze_delay_suspends_the_countdown() {
        let settings = CinematicSettings::default();
        let mut seq = sequence();
        // Delay outlasting the remaining window still lands the freeze.
        seq.freeze = Some(FreezeFrameState {
            phase: FreezePhase::Waiting {
                delay_remaining: 2.0,
            },
            duration: 0.2,
            time_scale: 0.02,
            post_action: PostFreezeAction::ContinueCinematic,
        });
        for _ in 0..3 {
            let (commands, outcome) = tick(&mut seq, &settings, 0.5);
            assert_eq!(outcome, SequenceTick::Running);
            assert!(commands.is_empty());
            assert_eq!(seq.elapsed, 0.0);
        }
        // Fourth tick exhausts the delay; the hold begins with its camera
        // treatment and the main timeline still has not moved.
        let (commands, outcome) = tick(&mut seq, &settings, 0.5);
        assert_eq!(outcome, SequenceTick::Running);
        assert!(commands.iter().any(|c| matches!(c, Command::SetTimeScale(s) if *s < 0.05)));
        assert!(commands.iter().any(|c| matches!(c, Command::BeginZoom { .. })));
        assert_eq!(seq.elapsed, 0.0);
        // Hold expires, slow motion resumes, countdown picks back up.
        let (commands, _) = tick(&mut seq, &settings, 0.25);
        assert_eq!(commands.as_slice(), [Command::SetTimeScale(0.2)]);
        tick(&mut seq, &settings, 0.25);
        assert!(seq.elapsed > 0.0);
    }

    #[test]
    fn freeze_landing_places_the_follow_preset() {
        let settings = CinematicSettings::default();
        let mut seq = sequence();
        seq.camera = CameraMode::Follow;
        seq.freeze = Some(FreezeFrameState {
            phase: FreezePhase::Waiting {
                delay_remaining: 0.1,
            },
            duration: 0.2,
            time_scale: 0.02,
            post_action: PostFreezeAction::ContinueCinematic,
        });
        let (commands, _) = tick(&mut seq, &settings, 0.1);
        assert!(commands
            .iter()
            .any(|c| matches!(c, Command::PlaceFollowPreset { victim } if *victim == EntityId(1))));
    }

    #[test]
    fn freeze_continue_resumes_slow_motion() {
        let settings = CinematicSettings::default();
        let mut seq = sequence();
        seq.freeze = Some(FreezeFrameState {
            phase: FreezePhase::Frozen { remaining: 0.1 },
            duration: 0.1,
            time_scale: 0.02,
            post_action: PostFreezeAction::ContinueCinematic,
        });
        let (commands, outcome) = tick(&mut seq, &settings, 0.15);
        assert_eq!(outcome, SequenceTick::Running);
        assert_eq!(commands.as_slice(), [Command::SetTimeScale(0.2)]);
        assert!(seq.freeze.is_none());
    }

    #[test]
    fn chain_pops_next_victim_and_ramps_scale() {
        let mut settings = CinematicSettings::default();
        settings.chain.enabled = true;
        settings.chain.transition_time = 0.5;
        let mut seq = sequence();
        seq.camera = CameraMode::Follow;
        assert!(seq.enqueue_chain(EntityId(9), settings.chain.max_kills));
        seq.elapsed = 1.24;
        let (commands, outcome) = tick(&mut seq, &settings, 0.02);
        assert_eq!(outcome, SequenceTick::Running);
        assert_eq!(seq.victim, EntityId(9));
        assert!((seq.slow_scale - 0.16).abs() < 1e-4);
        assert!(commands
            .iter()
            .any(|c| matches!(c, Command::PlaceFollowPreset { victim } if *victim == EntityId(9))));
        // The new segment ends transition_time later.
        assert!((seq.duration - (seq.elapsed + 0.5)).abs() < 1e-4);
    }

    #[test]
    fn chain_queue_caps_pending_victims() {
        let mut seq = sequence();
        // Played victims do not eat into the cap; only the backlog does.
        seq.victims_played = 2;
        assert!(seq.enqueue_chain(EntityId(2), 3));
        assert!(seq.enqueue_chain(EntityId(3), 3));
        assert!(seq.enqueue_chain(EntityId(4), 3));
        assert!(!seq.enqueue_chain(EntityId(5), 3));
        assert_eq!(seq.chain.len(), 3);
    }

    #[test]
    fn settle_ends_a_tracked_sequence_early() {
        let mut settings = CinematicSettings::default();
        settings.ragdoll.settle_duration = 0.15;
        settings.ragdoll.post_land_delay = 0.0;
        let mut seq = sequence();
        seq.duration = 5.0;
        seq.return_start = 4.0;
        seq.ragdoll = Some(RagdollTracking::new(EntityId(1)));
        let mut world = StaticWorld::outdoors();
        world.sample = Some(crate::world::RagdollSample {
            position: crate::world::Vec3::new(1.0, 0.0, 1.0),
            peak_speed: 0.0,
            asleep_fraction: 1.0,
        });
        let mut commands = Commands::new();
        let mut logs = Vec::new();
        seq.advance(&settings, &world, 0.1, &mut commands, &mut logs);
        let outcome = seq.advance(&settings, &world, 0.1, &mut commands, &mut logs);
        assert_eq!(outcome, SequenceTick::Finished { at_rest: false });
        assert!(logs.iter().any(|l| l.contains("ragdoll.settled")));
    }
}
