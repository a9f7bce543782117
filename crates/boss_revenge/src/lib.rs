//! Boss Revenge
//!
//! Boss-механика поверх чужой Bevy-симуляции (Bevy 0.16):
//! - самый «толстый» entity (max HP ≥ floor) становится боссом
//! - на 30% HP: полное лечение, grace окно, taunt, фаза 2
//! - в фазе 2 проходит только половина урона
//!
//! HP-компонент хоста `H` нам неизвестен: значения находятся через
//! `bevy_reflect` (поля) и `ReflectMembers` (properties/methods), см. `adapter`.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;
use bevy::reflect::{GetTypeRegistration, TypePath};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::marker::PhantomData;

pub mod adapter;
pub mod boss;
pub mod config;
pub mod error;
pub mod hud;
pub mod logger;
pub mod schedule;

pub use adapter::{
    AdapterBinding, AdapterCache, BindingStrategy, BoundHealth, HealthAccess, MemberValue, ReflectMembers,
    RegisterMembersExt, ValueKind,
};
pub use boss::{BossPhase, BossPhaseChanged, BossTracker, PhaseStep, TrackedBoss};
pub use config::BossRevengeConfig;
pub use error::{AdapterError, Capability, ConfigError};
pub use hud::{TauntOverlay, TauntRequested};
pub use logger::init_logger;
pub use schedule::{BossRevengeSet, ScanTimer};

/// Главный plugin: ресурсы, события и системы для host health типа `H`
pub struct BossRevengePlugin<H> {
    pub config: BossRevengeConfig,
    _health: PhantomData<fn() -> H>,
}

impl<H> Default for BossRevengePlugin<H> {
    fn default() -> Self {
        Self::with_config(BossRevengeConfig::default())
    }
}

impl<H> BossRevengePlugin<H> {
    pub fn with_config(config: BossRevengeConfig) -> Self {
        Self {
            config,
            _health: PhantomData,
        }
    }
}

impl<H> Plugin for BossRevengePlugin<H>
where
    H: Component<Mutability = Mutable> + Reflect + TypePath + GetTypeRegistration,
{
    fn build(&self, app: &mut App) {
        // Невалидный конфиг не ставим: например fraction > 1 усиливал бы урон
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(err) => {
                logger::log_error(&format!(
                    "BossRevengeConfig is invalid ({}), falling back to defaults",
                    err
                ));
                BossRevengeConfig::default()
            }
        };

        app
            // Resources
            .insert_resource(AdapterCache::new(config.adapter.clone()))
            .insert_resource(config)
            .init_resource::<BossTracker>()
            .init_resource::<ScanTimer>()
            .init_resource::<TauntOverlay>()
            // Events
            .add_event::<BossPhaseChanged>()
            .add_event::<TauntRequested>()
            // Reflect: поля H для adapter'а (ReflectMembers хоста не затираются)
            .register_type::<H>()
            // Scan → Phase в одном кадре
            .configure_sets(Update, (BossRevengeSet::Scan, BossRevengeSet::Phase).chain())
            .add_systems(
                Update,
                boss::scan_for_boss::<H>
                    .in_set(BossRevengeSet::Scan)
                    .run_if(schedule::scan_due),
            )
            .add_systems(
                Update,
                (
                    boss::tick_boss_phase::<H>.run_if(schedule::boss_tracked),
                    hud::apply_taunt_requests,
                )
                    .chain()
                    .in_set(BossRevengeSet::Phase),
            );

        logger::log_info(&format!(
            "BossRevengePlugin ready for {}",
            <H as TypePath>::type_path()
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless прогона
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}
