//! Headless demo: толпа + босс, случайный урон, лог фаз
//!
//! `boss_revenge [config.ron]`
//!
//! Уровень лога: `BOSS_REVENGE_LOG=debug|info|warning|error` (по умолчанию info).

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use boss_revenge::logger::{self, LogLevel};
use boss_revenge::{
    create_headless_app, BossPhaseChanged, BossRevengeConfig, BossRevengePlugin, BossRevengeSet,
    BossTracker, DeterministicRng, MemberValue, ReflectMembers, RegisterMembersExt, TauntOverlay, ValueKind,
};
use rand::Rng;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(100);
const MAX_FRAMES: u32 = 2_000;

/// HP-компонент «чужой» симуляции: plugin про него ничего не знает
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
struct CreatureHealth {
    max_health: f32,
    current_health: f32,
}

impl CreatureHealth {
    fn new(max_health: f32) -> Self {
        Self {
            max_health,
            current_health: max_health,
        }
    }

    fn heal(&mut self, amount: f32) {
        self.current_health = (self.current_health + amount).min(self.max_health);
    }
}

#[derive(Component)]
struct Nickname(&'static str);

fn creature_members() -> ReflectMembers {
    ReflectMembers::new()
        .property(
            "CurrentHealth",
            |h: &CreatureHealth| h.current_health,
            |h: &mut CreatureHealth, value: f32| h.current_health = value,
        )
        .method("Heal", &[ValueKind::F32], |h: &mut CreatureHealth, args: &[MemberValue]| {
            match args {
                [MemberValue::F32(amount)] => {
                    h.heal(*amount);
                    Ok(())
                }
                _ => Err("Heal expects one f32".to_string()),
            }
        })
}

fn load_config(path: &str) -> BossRevengeConfig {
    let loaded = std::fs::read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|text| BossRevengeConfig::from_ron(&text).map_err(|err| err.to_string()));

    match loaded {
        Ok(config) => {
            logger::log_info(&format!("Config loaded from {}", path));
            config
        }
        Err(err) => {
            logger::log_error(&format!("Config {} rejected ({}), using defaults", path, err));
            BossRevengeConfig::default()
        }
    }
}

fn spawn_population(mut commands: Commands) {
    for _ in 0..6 {
        commands.spawn((Nickname("minion"), CreatureHealth::new(50.0)));
    }
    commands.spawn((Nickname("elite"), CreatureHealth::new(250.0)));
    commands.spawn((Nickname("warlord"), CreatureHealth::new(1000.0)));
}

/// System: каждый живой entity с шансом 50% получает удар
fn apply_random_damage(mut rng: ResMut<DeterministicRng>, mut creatures: Query<&mut CreatureHealth>) {
    for mut health in creatures.iter_mut() {
        if health.current_health <= 0.0 || !rng.rng.gen_bool(0.5) {
            continue;
        }
        let damage: f32 = rng.rng.gen_range(10.0..70.0);
        health.current_health = (health.current_health - damage).max(0.0);
    }
}

/// System: печать смены фаз и taunt'а
fn report_phase_changes(
    time: Res<Time>,
    overlay: Res<TauntOverlay>,
    mut events: EventReader<BossPhaseChanged>,
    names: Query<(&Nickname, &CreatureHealth)>,
) {
    let now = time.elapsed_secs();

    for event in events.read() {
        let (name, hp) = names
            .get(event.entity)
            .map(|(name, health)| (name.0, health.current_health))
            .unwrap_or(("<gone>", 0.0));
        logger::log_info(&format!(
            "t={:.1} {} ({:?}): {} -> {} [hp {}]",
            now,
            name,
            event.entity,
            event.from.name(),
            event.to.name(),
            hp
        ));
    }

    if let Some(size) = overlay.font_size(now) {
        logger::log(&format!("HUD: \"{}\" @ {}px", overlay.text, size));
    }
}

/// Уровень из `BOSS_REVENGE_LOG`; покадровый debug по умолчанию скрыт
fn log_level_from_env() -> LogLevel {
    match std::env::var("BOSS_REVENGE_LOG").as_deref() {
        Ok("debug") => LogLevel::Debug,
        Ok("warning") => LogLevel::Warning,
        Ok("error") => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

fn main() {
    // Логгер до конфига: ошибки разбора должны быть видны
    logger::init_logger();
    logger::set_log_level(log_level_from_env());

    let config = std::env::args()
        .nth(1)
        .map(|path| load_config(&path))
        .unwrap_or_default();

    let mut app = create_headless_app(42);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .register_members::<CreatureHealth>(creature_members())
        .add_plugins(BossRevengePlugin::<CreatureHealth>::with_config(config))
        .add_systems(Startup, spawn_population)
        .add_systems(
            Update,
            (
                apply_random_damage.before(BossRevengeSet::Scan),
                report_phase_changes.after(BossRevengeSet::Phase),
            ),
        );

    let mut frames = 0;
    while frames < MAX_FRAMES {
        app.update();
        frames += 1;

        if app.world().resource::<BossTracker>().encounter_over() {
            break;
        }
    }

    let tracker = app.world().resource::<BossTracker>();
    match tracker.boss.as_ref() {
        Some(boss) => logger::log_info(&format!(
            "Encounter finished after {} frames: {:?} in {} (original max hp {})",
            frames,
            boss.entity,
            boss.phase.name(),
            boss.original_max_hp
        )),
        None => logger::log_warning(&format!("No boss selected after {} frames", frames)),
    }
}
