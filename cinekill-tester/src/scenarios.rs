//! Scripted replay scenarios run against the cinematic core.
//!
//! Each scenario drives a fresh seeded session through a fixed timeline of
//! kills and frames, then asserts the properties the design guarantees.
//! Scenarios are pure logic, so thousands of iterations per second are
//! normal.

use anyhow::{ensure, Context, Result};
use cinekill_game::settings::TriggerSettings;
use cinekill_game::{
    CinematicSession, CinematicSettings, Command, EntityId, KillEvent, KillOutcome, RagdollSample,
    StaticWorld, TriggerKind, Vec3, WeaponCategory,
};

pub type ScenarioFn = fn(u64, bool) -> Result<()>;

pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub run: ScenarioFn,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "smoke",
        description: "Basic kill starts a sequence and tears down cleanly",
        run: smoke,
    },
    Scenario {
        name: "triggers",
        description: "Priority order, trap suppression and cooldown gating",
        run: triggers,
    },
    Scenario {
        name: "restore",
        description: "Time scale always returns to 1.0, smoothly",
        run: restore,
    },
    Scenario {
        name: "chain",
        description: "Chain reactions respect the pending-victim cap",
        run: chain,
    },
    Scenario {
        name: "ragdoll",
        description: "Settle detection ends tracked sequences early",
        run: ragdoll,
    },
    Scenario {
        name: "determinism",
        description: "Identical seeds replay identical command streams",
        run: determinism,
    },
];

pub fn get_scenario(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

fn aggressive_settings() -> CinematicSettings {
    let mut settings = CinematicSettings::default();
    for kind in TriggerKind::PRIORITY_ORDER {
        if let Some(trigger) = settings.triggers.get_mut(kind) {
            *trigger = TriggerSettings::enabled_default();
        }
    }
    settings.trigger_defaults.allow_first_person = true;
    settings.trigger_defaults.allow_follow = false;
    settings.trigger_defaults.cooldown = 1.0;
    settings.basic_kill.chance = 100.0;
    settings.basic_kill.allow_first_person = true;
    settings.basic_kill.allow_follow = false;
    settings
}

fn plain_kill(victim: u32) -> KillEvent {
    KillEvent::basic(EntityId(victim), WeaponCategory::Melee)
}

/// Drain a session until it is idle with time fully restored, collecting
/// every command. Errors out if the sequence never ends.
fn run_to_idle(
    session: &mut CinematicSession,
    world: &StaticWorld,
    dt: f32,
) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for _ in 0..4000 {
        // The host side applies the current multiplier to its game clock.
        let scaled = dt * session.time_scale();
        commands.extend(session.advance(scaled, dt, world));
        if !session.is_active() && (session.time_scale() - 1.0).abs() < 1e-4 {
            return Ok(commands);
        }
    }
    anyhow::bail!("sequence never returned to idle")
}

fn smoke(seed: u64, verbose: bool) -> Result<()> {
    let mut session = CinematicSession::new(aggressive_settings(), seed);
    let world = StaticWorld::outdoors();
    let (outcome, start) = session.on_kill_event(&plain_kill(1), &world);
    ensure!(
        matches!(outcome, KillOutcome::Started { .. }),
        "expected a sequence, got {outcome:?}"
    );
    ensure!(
        start.iter().any(Command::is_time_scale),
        "start emitted no time-scale command"
    );
    let commands = run_to_idle(&mut session, &world, 0.05)?;
    ensure!(
        commands.iter().any(|c| matches!(c, Command::RestoreCamera)),
        "camera was never restored"
    );
    if verbose {
        let logs = session.drain_logs();
        println!("  📋 {} log entries: {logs:?}", logs.len());
    }
    Ok(())
}

fn triggers(seed: u64, verbose: bool) -> Result<()> {
    let world = StaticWorld::outdoors();

    // Trap kills are always suppressed.
    let mut session = CinematicSession::new(aggressive_settings(), seed);
    let trap = KillEvent::basic(EntityId(1), WeaponCategory::Trap);
    let (outcome, commands) = session.on_kill_event(&trap, &world);
    ensure!(outcome == KillOutcome::Suppressed, "trap fired: {outcome:?}");
    ensure!(commands.is_empty(), "trap emitted commands");

    // Last-enemy outranks every other context.
    let mut session = CinematicSession::new(aggressive_settings(), seed);
    let mut stacked = plain_kill(2);
    stacked.was_headshot = true;
    stacked.was_crit = true;
    stacked.is_last_enemy = true;
    let (outcome, _) = session.on_kill_event(&stacked, &world);
    ensure!(
        matches!(
            outcome,
            KillOutcome::Started {
                reason: TriggerKind::LastEnemy,
                ..
            }
        ),
        "wrong winner: {outcome:?}"
    );

    // A blocked claimant never downgrades into the basic fallback.
    let mut session = CinematicSession::new(aggressive_settings(), seed);
    let mut headshot = plain_kill(3);
    headshot.was_headshot = true;
    session.on_kill_event(&headshot, &world);
    run_to_idle(&mut session, &world, 0.05).context("first headshot sequence")?;
    let mut repeat = plain_kill(4);
    repeat.was_headshot = true;
    let (outcome, _) = session.on_kill_event(&repeat, &world);
    ensure!(
        matches!(outcome, KillOutcome::Blocked { kind: TriggerKind::Headshot, .. }),
        "expected a cooldown block, got {outcome:?}"
    );
    if verbose {
        println!("  🎯 trigger gating held for seed {seed}");
    }
    Ok(())
}

fn restore(seed: u64, verbose: bool) -> Result<()> {
    let world = StaticWorld::outdoors();
    for (duration, scale) in [(0.5_f32, 0.1_f32), (1.25, 0.2), (4.0, 0.05)] {
        let mut settings = aggressive_settings();
        settings.basic_kill.duration = duration;
        settings.basic_kill.time_scale = scale;
        let mut session = CinematicSession::new(settings, seed);
        session.on_kill_event(&plain_kill(1), &world);
        let commands = run_to_idle(&mut session, &world, 0.02)?;

        // Scale commands only ever move toward 1.0 after the slow phase.
        let scales: Vec<f32> = commands
            .iter()
            .filter_map(|c| match c {
                Command::SetTimeScale(s) => Some(*s),
                _ => None,
            })
            .collect();
        ensure!(!scales.is_empty(), "no scale commands for {duration}s");
        let last = scales.last().copied().unwrap_or_default();
        ensure!(
            (last - 1.0).abs() < 1e-3,
            "final scale {last} for duration {duration}"
        );
        ensure!(
            scales.windows(2).all(|w| w[1] >= w[0] - 1e-4),
            "restore was not monotonic: {scales:?}"
        );
    }
    if verbose {
        println!("  ⏱️  restore timelines monotonic for seed {seed}");
    }
    Ok(())
}

fn chain(seed: u64, verbose: bool) -> Result<()> {
    let mut settings = aggressive_settings();
    settings.chain.enabled = true;
    settings.chain.max_kills = 3;
    settings.basic_kill.duration = 0.5;
    let mut session = CinematicSession::new(settings, seed);
    let world = StaticWorld::outdoors();

    session.on_kill_event(&plain_kill(1), &world);
    let mut chained = 0;
    let mut dropped = 0;
    for victim in 2..=6 {
        match session.on_kill_event(&plain_kill(victim), &world).0 {
            KillOutcome::Chained => chained += 1,
            KillOutcome::Suppressed => dropped += 1,
            other => anyhow::bail!("unexpected outcome {other:?}"),
        }
    }
    // The cap counts pending victims only, not the one already playing.
    ensure!(chained == 3, "expected 3 chained, got {chained}");
    ensure!(dropped == 2, "expected 2 dropped, got {dropped}");
    run_to_idle(&mut session, &world, 0.05)?;
    if verbose {
        println!("  🔗 chained {chained}, dropped {dropped}");
    }
    Ok(())
}

fn ragdoll(seed: u64, verbose: bool) -> Result<()> {
    let mut settings = aggressive_settings();
    settings.basic_kill.duration = 1.0;
    settings.ragdoll.basic_first_person = true;
    settings.ragdoll.fallback_duration = 12.0;
    settings.ragdoll.settle_duration = 0.2;
    settings.ragdoll.post_land_delay = 0.1;
    let mut session = CinematicSession::new(settings, seed);
    let mut world = StaticWorld::outdoors();
    world.sample = Some(RagdollSample {
        position: Vec3::new(3.0, 0.0, 1.0),
        peak_speed: 0.0,
        asleep_fraction: 1.0,
    });
    session.on_kill_event(&plain_kill(1), &world);

    let mut ticks = 0u32;
    while session.is_active() {
        session.advance(0.05, 0.05, &world);
        ticks += 1;
        ensure!(ticks < 1000, "settle never ended the sequence");
    }
    #[allow(clippy::cast_precision_loss)]
    let active_seconds = ticks as f32 * 0.05;
    ensure!(
        active_seconds < 2.0,
        "tracked sequence ran {active_seconds}s before ending"
    );
    if verbose {
        println!("  🧸 settled after {active_seconds:.2}s");
    }
    Ok(())
}

fn determinism(seed: u64, verbose: bool) -> Result<()> {
    let trace = |seed: u64| -> Result<Vec<String>> {
        let mut settings = aggressive_settings();
        settings.basic_kill.chance = 35.0;
        settings.freeze_frame.first_person.enabled = true;
        settings.freeze_frame.first_person.chance = 50.0;
        let mut session = CinematicSession::new(settings, seed);
        let world = StaticWorld::outdoors();
        let mut out = Vec::new();
        for i in 0u32..400 {
            if i % 37 == 0 {
                let (outcome, commands) = session.on_kill_event(&plain_kill(i), &world);
                out.push(format!("{outcome:?}"));
                out.extend(commands.iter().map(|c| format!("{c:?}")));
            }
            out.extend(
                session
                    .advance(0.016, 0.016, &world)
                    .iter()
                    .map(|c| format!("{c:?}")),
            );
        }
        Ok(out)
    };
    let first = trace(seed)?;
    let second = trace(seed)?;
    ensure!(first == second, "same seed diverged");
    if verbose {
        println!("  🎲 {} trace entries matched", first.len());
    }
    Ok(())
}
