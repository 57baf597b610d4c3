//! Plague Skills Demo Server
//!
//! Runs the skill and regeneration core against a scripted in-memory host
//! on a real-time frame loop. Pass a JSON config path as the first
//! argument to override the defaults.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use plague_skills::{
    game::{
        class::{ClassDef, ClassId, ClassTable},
        events::GameEventData,
        host::{Hint, Velocity},
    },
    Host, Mutator, MutatorConfig, Slot, StableId, TICK_RATE, VERSION,
};

/// Demo length in seconds.
const DEMO_SECONDS: u32 = 16;

const CLASSIC: ClassId = ClassId(0);
const SPRINTER: ClassId = ClassId(1);

/// Host that keeps health and velocity in memory and logs feedback.
#[derive(Default)]
struct DemoHost {
    health: BTreeMap<StableId, u32>,
    velocity: BTreeMap<StableId, Velocity>,
}

impl Host for DemoHost {
    fn health(&self, player: StableId) -> u32 {
        self.health.get(&player).copied().unwrap_or(0)
    }

    fn set_health(&mut self, player: StableId, health: u32) {
        self.health.insert(player, health);
    }

    fn velocity(&self, player: StableId) -> Velocity {
        self.velocity.get(&player).copied().unwrap_or_default()
    }

    fn skill_over(&mut self, player: StableId) {
        info!("Player {} skill over", player);
    }

    fn hint(&mut self, player: StableId, hint: Hint) {
        match hint {
            Hint::SkillReady => info!("Player {} skill ready", player),
            Hint::Countdown(secs) => info!("Player {} skill ready in {}s", player, secs),
        }
    }
}

fn classes() -> ClassTable {
    ClassTable::new()
        .with(
            CLASSIC,
            ClassDef::new("classic", 2000)
                .with_skill(Duration::from_secs(5), 10)
                .with_regen(Duration::from_secs(2), 100),
        )
        .with(
            SPRINTER,
            ClassDef::new("sprinter", 1500)
                .with_skill(Duration::from_secs(3), 4)
                .with_regen(Duration::from_millis(500), 25),
        )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let default_level = if cfg!(feature = "debug-tracing") {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    let config = match std::env::args().nth(1) {
        Some(path) => MutatorConfig::load(&path).with_context(|| format!("loading config {}", path))?,
        None => MutatorConfig::default(),
    };

    info!("Plague Skills v{}", VERSION);
    info!("Tick Rate: {} Hz (default {})", config.tick_rate, TICK_RATE);

    run_demo(config).await
}

/// Scripted round: two infected, one human, one mid-skill disconnect.
async fn run_demo(config: MutatorConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Round ===");

    let frame = config.frame_duration();
    let frames_per_second = config.tick_rate;
    let mut mutator = Mutator::with_scheduler(config, classes());
    let mut host = DemoHost::default();

    if let Some(reset) = mutator.on_round_start() {
        info!("Voice partition switched, {} overrides reset", reset.len());
    }

    let slots = [Slot::new(1)?, Slot::new(2)?, Slot::new(3)?];
    let mut ids = Vec::with_capacity(slots.len());
    for slot in slots {
        ids.push(mutator.connect(slot)?);
    }

    mutator.on_class_changed(ids[0], CLASSIC)?;
    mutator.on_infected(ids[0], false)?;
    mutator.on_class_changed(ids[1], SPRINTER)?;
    mutator.on_infected(ids[1], false)?;
    host.health.insert(ids[0], 1400);
    host.health.insert(ids[1], 900);
    host.health.insert(ids[2], 100);

    for id in &ids {
        if let Some(update) = mutator.voice_update(&host, *id) {
            info!("Player {} voice: {} overrides", id, update.overrides.len());
        }
    }

    let mut tick_interval = interval(frame);
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut total_events = 0;
    let mut stale = 0;
    for t in 0..DEMO_SECONDS * frames_per_second {
        tick_interval.tick().await;

        let second = t / frames_per_second;
        let first_frame = t % frames_per_second == 0;
        if first_frame {
            script(&mut mutator, &mut host, second, &slots, &mut ids)?;
        }

        let result = mutator.run_frame(&mut host, frame);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::SkillStarted { duration } => {
                    info!("Player {} skill started ({:?})", event.player, duration);
                }
                GameEventData::HealthRegenerated { from, to } => {
                    info!("Player {} regenerated {} -> {}", event.player, from, to);
                }
                GameEventData::StaleTimerDropped { kind } => {
                    stale += 1;
                    info!("Dropped {:?} timer of departed player {}", kind, event.player);
                }
                _ => {}
            }
        }
    }

    info!("=== Round Over ===");
    let all_talk = mutator.on_round_end(&host);
    info!("All-talk restored with {} overrides", all_talk.len());
    mutator.on_map_end();

    info!("Total events: {}", total_events);
    info!("Stale firings dropped: {}", stale);
    info!("Pending timers after map end: {}", mutator.timers().pending());
    Ok(())
}

/// Once-per-second scripted inputs.
fn script(
    mutator: &mut Mutator<ClassTable>,
    host: &mut DemoHost,
    second: u32,
    slots: &[Slot],
    ids: &mut [StableId],
) -> anyhow::Result<()> {
    match second {
        0 => {
            for slot in slots {
                let action = mutator.on_drop_command(host, *slot);
                info!("Slot {} drop -> {:?}", slot.index(), action);
            }
        }
        2 => {
            host.velocity.insert(ids[0], Velocity::new(250.0, 0.0, 0.0));
            // Second press while active is swallowed.
            let action = mutator.on_drop_command(host, slots[0]);
            info!("Slot {} drop while active -> {:?}", slots[0].index(), action);
        }
        3 => {
            // Sprinter leaves; a new player takes the same slot.
            mutator.disconnect(slots[1])?;
            ids[1] = mutator.connect(slots[1])?;
            host.health.insert(ids[1], 100);
        }
        6 => {
            host.velocity.remove(&ids[0]);
        }
        12 => {
            let outcome = mutator.try_activate(host, ids[0]);
            info!("Player {} retries skill: {:?}", ids[0], outcome);
        }
        _ => {}
    }
    Ok(())
}
