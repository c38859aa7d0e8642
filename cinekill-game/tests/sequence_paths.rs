//! Sequence timeline paths: restore easing, freeze-frames, chaining,
//! ragdoll-settle endings and camera selection, all through the public API.

use cinekill_game::{
    CameraMode, CameraOverride, CinematicSession, CinematicSettings, Command, EntityId, KillEvent,
    KillOutcome, PostFreezeAction, RagdollSample, StaticWorld, Vec3, WeaponCategory,
};

fn basic_only(duration: f32, time_scale: f32) -> CinematicSettings {
    let mut settings = CinematicSettings::default();
    settings.triggers.last_enemy.enabled = false;
    settings.triggers.headshot.enabled = false;
    settings.basic_kill.chance = 100.0;
    settings.basic_kill.duration = duration;
    settings.basic_kill.time_scale = time_scale;
    settings.basic_kill.allow_first_person = true;
    settings.basic_kill.allow_follow = false;
    settings
}

fn kill(victim: u32) -> KillEvent {
    KillEvent::basic(EntityId(victim), WeaponCategory::Melee)
}

fn scale_trace(session: &mut CinematicSession, world: &StaticWorld, ticks: u32, dt: f32) -> Vec<f32> {
    let mut trace = Vec::new();
    for _ in 0..ticks {
        // The host applies the current multiplier to its game clock.
        let scaled = dt * session.time_scale();
        for command in session.advance(scaled, dt, world) {
            if let Command::SetTimeScale(scale) = command {
                trace.push(scale);
            }
        }
    }
    trace
}

#[test]
fn restore_easing_matches_the_reference_timeline() {
    // duration 1.25s, slow scale 0.2, restore begins at 1.0s elapsed and
    // spans 0.25s (20% of the duration).
    let mut session = CinematicSession::new(basic_only(1.25, 0.2), 31);
    let world = StaticWorld::outdoors();
    let (outcome, start_commands) = session.on_kill_event(&kill(1), &world);
    assert!(matches!(outcome, KillOutcome::Started { .. }));
    assert!(start_commands.contains(&Command::SetTimeScale(0.2)));

    // Steady slow motion for the first second: no scale changes.
    let steady = scale_trace(&mut session, &world, 8, 0.125);
    assert!(steady.is_empty(), "unexpected scale changes: {steady:?}");

    // Halfway through the restore window the scale is halfway home.
    let easing = scale_trace(&mut session, &world, 1, 0.125);
    assert_eq!(easing.len(), 1);
    assert!((easing[0] - 0.6).abs() < 1e-3, "got {}", easing[0]);

    // Final step lands on 1.0 exactly as the sequence ends.
    let tail = scale_trace(&mut session, &world, 1, 0.125);
    assert!((tail.last().copied().unwrap() - 1.0).abs() < 1e-3);
    assert!(!session.is_active());
    assert!((session.time_scale() - 1.0).abs() < 1e-3);
}

#[test]
fn freeze_skip_ends_the_sequence_with_a_smooth_restore() {
    let mut settings = basic_only(3.0, 0.2);
    settings.freeze_frame.first_person.enabled = true;
    settings.freeze_frame.first_person.chance = 100.0;
    settings.freeze_frame.first_person.delay = 0.2;
    settings.freeze_frame.first_person.duration = 0.3;
    settings.freeze_frame.first_person.post_action = PostFreezeAction::Skip;
    let mut session = CinematicSession::new(settings, 37);
    let world = StaticWorld::outdoors();
    session.on_kill_event(&kill(1), &world);

    // Delay elapses, freeze lands near zero, then the skip tears down.
    let mut froze = false;
    for _ in 0..10 {
        for command in session.advance(0.1, 0.1, &world) {
            if let Command::SetTimeScale(scale) = command {
                if scale < 0.05 {
                    froze = true;
                }
            }
        }
        if !session.is_active() {
            break;
        }
    }
    assert!(froze);
    assert!(!session.is_active());
    // The skip happened mid-slow-mo, so time eases back instead of snapping.
    let scales = scale_trace(&mut session, &world, 1, 0.1);
    assert_eq!(scales.len(), 1);
    assert!(scales[0] < 1.0);
    scale_trace(&mut session, &world, 10, 0.1);
    assert!((session.time_scale() - 1.0).abs() < 1e-6);
}

#[test]
fn freeze_continue_resumes_and_runs_to_the_natural_end() {
    let mut settings = basic_only(1.0, 0.2);
    settings.freeze_frame.first_person.enabled = true;
    settings.freeze_frame.first_person.chance = 100.0;
    settings.freeze_frame.first_person.delay = 0.1;
    settings.freeze_frame.first_person.duration = 0.2;
    settings.freeze_frame.first_person.post_action = PostFreezeAction::ContinueCinematic;
    let mut session = CinematicSession::new(settings, 41);
    let world = StaticWorld::outdoors();
    session.on_kill_event(&kill(1), &world);

    let trace = scale_trace(&mut session, &world, 40, 0.05);
    // Frozen then back to slow motion then eased to normal.
    assert!(trace.iter().any(|s| *s < 0.05));
    assert!(trace.iter().any(|s| (*s - 0.2).abs() < 1e-3));
    assert!((trace.last().copied().unwrap() - 1.0).abs() < 1e-3);
    assert!(!session.is_active());
}

#[test]
fn chain_reaction_consumes_queued_victims_and_ramps() {
    let mut settings = basic_only(0.6, 0.4);
    settings.basic_kill.allow_first_person = false;
    settings.basic_kill.allow_follow = true;
    settings.chain.enabled = true;
    settings.chain.transition_time = 0.4;
    settings.chain.scale_multiplier = 0.5;
    let mut session = CinematicSession::new(settings, 43);
    let world = StaticWorld::outdoors();
    session.on_kill_event(&kill(1), &world);
    let (outcome, _) = session.on_kill_event(&kill(2), &world);
    assert_eq!(outcome, KillOutcome::Chained);

    let mut placed = Vec::new();
    let mut scales = Vec::new();
    for _ in 0..40 {
        for command in session.advance(0.05, 0.05, &world) {
            match command {
                Command::PlaceFollowPreset { victim } => placed.push(victim),
                Command::SetTimeScale(scale) => scales.push(scale),
                _ => {}
            }
        }
    }
    assert!(!session.is_active());
    assert_eq!(placed, vec![EntityId(2)]);
    // The chained segment ran at half the original slow scale.
    assert!(scales.iter().any(|s| (*s - 0.2).abs() < 1e-3));
}

#[test]
fn chain_queue_drops_kills_beyond_the_cap() {
    let mut settings = basic_only(5.0, 0.2);
    settings.chain.enabled = true;
    settings.chain.max_kills = 2;
    let mut session = CinematicSession::new(settings, 47);
    let world = StaticWorld::outdoors();
    session.on_kill_event(&kill(1), &world);
    // The initial victim does not count against the cap; two more fit.
    let (first, _) = session.on_kill_event(&kill(2), &world);
    let (second, _) = session.on_kill_event(&kill(3), &world);
    let (third, _) = session.on_kill_event(&kill(4), &world);
    assert_eq!(first, KillOutcome::Chained);
    assert_eq!(second, KillOutcome::Chained);
    assert_eq!(third, KillOutcome::Suppressed);
}

#[test]
fn ragdoll_settle_cuts_a_long_sequence_short() {
    let mut settings = basic_only(1.0, 0.2);
    settings.ragdoll.basic_first_person = true;
    settings.ragdoll.fallback_duration = 10.0;
    settings.ragdoll.settle_duration = 0.2;
    settings.ragdoll.post_land_delay = 0.1;
    let mut session = CinematicSession::new(settings, 53);
    let mut world = StaticWorld::outdoors();
    world.sample = Some(RagdollSample {
        position: Vec3::new(2.0, 0.0, 2.0),
        peak_speed: 0.0,
        asleep_fraction: 1.0,
    });
    session.on_kill_event(&kill(1), &world);

    let mut elapsed = 0.0;
    while session.is_active() {
        session.advance(0.1, 0.1, &world);
        elapsed += 0.1;
        assert!(elapsed < 9.0, "settle never ended the sequence");
    }
    // Ended around settle (0.2s) + delay (0.1s), far below the ceiling.
    assert!(elapsed < 1.5, "took {elapsed}");
}

#[test]
fn lost_ragdoll_data_falls_back_to_the_ceiling() {
    let mut settings = basic_only(0.5, 0.2);
    settings.ragdoll.basic_first_person = true;
    settings.ragdoll.fallback_duration = 2.0;
    let mut session = CinematicSession::new(settings, 59);
    // No sample at all: the watch holds forever and never settles.
    let world = StaticWorld::outdoors();
    session.on_kill_event(&kill(1), &world);

    let mut elapsed = 0.0;
    while session.is_active() {
        session.advance(0.1, 0.1, &world);
        elapsed += 0.1;
        assert!(elapsed < 5.0);
    }
    // The ceiling, not the short base duration, governed the ending.
    assert!(elapsed > 1.5, "ended after {elapsed}");
}

#[test]
fn ragdoll_ceiling_stretches_the_restore_point() {
    let mut settings = basic_only(1.0, 0.2);
    settings.ragdoll.basic_first_person = true;
    settings.ragdoll.fallback_duration = 5.0;
    let mut session = CinematicSession::new(settings, 63);
    // Never settles, so the stretched window runs its full course.
    let world = StaticWorld::outdoors();
    session.on_kill_event(&kill(1), &world);

    // With the base window the restore would begin at 1.0s. Stretched to
    // the ceiling it waits until 4.0s, so 3.5s in the scale is untouched.
    let early = scale_trace(&mut session, &world, 35, 0.1);
    assert!(early.is_empty(), "restore began early: {early:?}");
    assert!(session.is_active());

    let tail = scale_trace(&mut session, &world, 20, 0.1);
    assert!((tail.last().copied().unwrap() - 1.0).abs() < 1e-3);
    assert!(!session.is_active());
}

#[test]
fn weapon_override_and_indoor_probe_steer_the_camera() {
    let mut settings = basic_only(1.0, 0.2);
    settings.basic_kill.allow_first_person = true;
    settings.basic_kill.allow_follow = true;
    settings.basic_kill.first_person_chance = 0.0;
    settings.weapon_modes.bow.camera_override = CameraOverride::ForceFirstPerson;
    let mut session = CinematicSession::new(settings.clone(), 61);
    let world = StaticWorld::outdoors();
    let mut event = kill(1);
    event.weapon = WeaponCategory::Bow;
    let (outcome, _) = session.on_kill_event(&event, &world);
    assert_eq!(
        outcome,
        KillOutcome::Started {
            reason: cinekill_game::TriggerKind::BasicKill,
            camera: CameraMode::FirstPerson,
        }
    );

    // Indoors, with no weapon override, the probe wins over the chance split.
    let mut session = CinematicSession::new(settings, 61);
    let world = StaticWorld::indoors();
    let (outcome, _) = session.on_kill_event(&kill(2), &world);
    assert!(matches!(
        outcome,
        KillOutcome::Started {
            camera: CameraMode::FirstPerson,
            ..
        }
    ));
}

#[test]
fn out_of_range_settings_are_clamped_on_apply() {
    let mut settings = basic_only(1.0, 0.2);
    settings.basic_kill.time_scale = -4.0;
    settings.basic_kill.duration = 500.0;
    settings.master_trigger_chance.0 = 900.0;
    let session = CinematicSession::new(settings, 67);
    let applied = session.settings();
    assert!(applied.basic_kill.time_scale >= 0.01);
    assert!(applied.basic_kill.duration <= 30.0);
    assert!((applied.master_trigger_chance.0 - 100.0).abs() < f32::EPSILON);
}

#[test]
fn cancel_mid_hitstop_still_restores_cleanly() {
    let mut settings = basic_only(2.0, 0.2);
    settings.hitstop.first_person.enabled = true;
    settings.hitstop.first_person.duration = 0.3;
    let mut session = CinematicSession::new(settings, 71);
    let world = StaticWorld::outdoors();
    session.on_kill_event(&kill(1), &world);
    session.advance(0.1, 0.1, &world);
    let commands = session.cancel();
    assert!(commands.iter().any(|c| matches!(c, Command::RestoreCamera)));
    scale_trace(&mut session, &world, 10, 0.1);
    assert!((session.time_scale() - 1.0).abs() < 1e-6);
}
