//! Boss domain: выбор босса, phase machine, ослабление урона
//!
//! Чистая логика (tracked/selector/phase/damage) не знает про ECS;
//! `systems` связывает её с Bevy через adapter.

pub mod damage;
pub mod phase;
pub mod selector;
pub mod systems;
pub mod tracked;

#[cfg(test)]
mod phase_tests;

pub use damage::{rewrite_damage, DamageCorrection};
pub use phase::{tick_phase, PhaseStep, TickReport};
pub use selector::{best_candidate, decide_selection, Candidate, Selection};
pub use systems::{scan_for_boss, tick_boss_phase};
pub use tracked::{BossPhase, BossTracker, PhaseTransition, TrackedBoss};

use bevy::prelude::*;

/// Event: фаза босса сменилась
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BossPhaseChanged {
    pub entity: Entity,
    pub from: BossPhase,
    pub to: BossPhase,
}
