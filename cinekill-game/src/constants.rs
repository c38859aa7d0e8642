//! Centralized tuning constants and log keys for the cinematic core.
//!
//! These values define the deterministic math for the sequence state
//! machine. Keeping them together ensures that pacing can only be adjusted
//! via code changes reviewed in version control, rather than scattered
//! magic numbers.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_TRIGGER_FIRED_PREFIX: &str = "log.trigger.fired.";
pub(crate) const LOG_TRIGGER_BLOCKED_COOLDOWN: &str = "log.trigger.blocked.cooldown";
pub(crate) const LOG_SEQUENCE_START: &str = "log.sequence.start";
pub(crate) const LOG_SEQUENCE_END: &str = "log.sequence.end";
pub(crate) const LOG_SEQUENCE_CANCELLED: &str = "log.sequence.cancelled";
pub(crate) const LOG_SEQUENCE_CHAINED: &str = "log.sequence.chained";
pub(crate) const LOG_HITSTOP_START: &str = "log.hitstop.start";
pub(crate) const LOG_HITSTOP_END: &str = "log.hitstop.end";
pub(crate) const LOG_FREEZE_START: &str = "log.freeze.start";
pub(crate) const LOG_FREEZE_END_PREFIX: &str = "log.freeze.end.";
pub(crate) const LOG_RAGDOLL_SETTLED: &str = "log.ragdoll.settled";
pub(crate) const LOG_TIME_RESTORED: &str = "log.time.restored";

// Time-scale domain --------------------------------------------------------
pub(crate) const MIN_TIME_SCALE: f32 = 0.01;
pub(crate) const MAX_TIME_SCALE: f32 = 1.0;

// Sequence bounds ----------------------------------------------------------
pub(crate) const MIN_SEQUENCE_DURATION: f32 = 0.1;
pub(crate) const MAX_SEQUENCE_DURATION: f32 = 30.0;
pub(crate) const MIN_RETURN_DURATION: f32 = 0.05;

// Chance domain ------------------------------------------------------------
pub(crate) const CHANCE_MIN: f32 = 0.0;
pub(crate) const CHANCE_MAX: f32 = 100.0;

// Sequence staging ---------------------------------------------------------
/// First-person dramatic zoom strength, in normalized FOV fraction.
pub(crate) const ZOOM_AMOUNT: f32 = 0.35;
/// Easing window for restoring the time scale after a cancel or an early
/// sequence end.
pub(crate) const SMOOTH_RESTORE_SECONDS: f32 = 0.35;

// Ragdoll settle -----------------------------------------------------------
/// Fraction of physics proxies that must be asleep for a body resting
/// against geometry to count as settled even above the speed threshold.
pub(crate) const ASLEEP_MAJORITY: f32 = 0.6;
