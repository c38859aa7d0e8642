//! Deterministic kill-cinematic core.
//!
//! Everything here is platform-agnostic and frame-driven: the host feeds
//! kill events and per-frame delta time into a [`session::CinematicSession`]
//! and applies the [`command::Command`] buffers it gets back. The session
//! decides whether a kill deserves a cinematic (trigger priorities,
//! cooldowns, probability gates), which camera treatment to use, and runs
//! the slow-motion sequence state machine with hitstop, freeze-frames,
//! ragdoll-settle endings and chain-reaction continuations.
//!
//! All randomness flows through one seeded RNG, so identical seeds and
//! inputs replay identical command streams.

pub mod camera;
pub mod command;
mod constants;
pub mod cooldown;
pub mod event;
pub mod ragdoll;
pub mod sequence;
pub mod session;
pub mod settings;
pub mod triggers;
pub mod world;

pub use camera::{CameraMode, CameraOverride};
pub use command::{Command, Commands, ScreenEffectKind};
pub use event::{EntityId, KillEvent, TriggerKind, WeaponCategory};
pub use session::{AbortReason, CinematicSession, KillOutcome};
pub use settings::{CinematicSettings, PostFreezeAction, SettingsError};
pub use triggers::{BlockReason, TriggerDecision};
pub use world::{CameraPose, RagdollSample, StaticWorld, Vec3, WorldAdapter};
