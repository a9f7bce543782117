//! ECS-системы босса (generic по host health component `H`)
//!
//! - scan_for_boss: BossRevengeSet::Scan, раз в scan_interval
//! - tick_boss_phase: BossRevengeSet::Phase, каждый кадр пока есть босс

use bevy::ecs::component::Mutable;
use bevy::prelude::*;
use bevy::reflect::TypePath;

use super::phase::{tick_phase, PhaseStep};
use super::selector::{best_candidate, decide_selection, Candidate, Selection};
use super::tracked::{BossPhase, BossTracker, PhaseTransition, TrackedBoss};
use super::BossPhaseChanged;
use crate::adapter::{read_current_hp, read_max_hp, AdapterCache, BoundHealth};
use crate::config::BossRevengeConfig;
use crate::hud::TauntRequested;
use crate::schedule::ScanTimer;

/// System: скан популяции и выбор босса
///
/// Binding резолвится по первому entity типа `H` (один раз на тип).
pub fn scan_for_boss<H>(
    time: Res<Time>,
    config: Res<BossRevengeConfig>,
    registry: Res<AppTypeRegistry>,
    mut cache: ResMut<AdapterCache>,
    mut timer: ResMut<ScanTimer>,
    mut tracker: ResMut<BossTracker>,
    population: Query<(Entity, &H)>,
) where
    H: Component + Reflect + TypePath,
{
    let now = time.elapsed_secs();
    timer.schedule_next(now, config.scan_interval_secs);

    let binding = match cache.get::<H>() {
        Some(binding) => binding,
        None => {
            let Some((_, sample)) = population.iter().next() else {
                return;
            };
            cache.binding_for(sample, &registry.read())
        }
    };

    // Босс, умерший в Phase1, в кандидаты не возвращается
    let fallen = tracker
        .boss
        .as_ref()
        .filter(|boss| boss.phase == BossPhase::Defeated)
        .map(|boss| boss.entity);

    let best = best_candidate(
        population
            .iter()
            .filter(|(entity, _)| Some(*entity) != fallen)
            .map(|(entity, health)| Candidate {
                entity,
                max_hp: read_max_hp(&binding, health),
            }),
        config.min_boss_max_hp,
    );

    let live_max_hp = tracker
        .boss
        .as_ref()
        .and_then(|boss| population.get(boss.entity).ok())
        .map(|(_, health)| read_max_hp(&binding, health));

    let selection = decide_selection(tracker.boss.as_ref(), live_max_hp, best, &config);

    let adopted = match selection {
        Selection::Adopt(candidate) => {
            crate::logger::log_info(&format!(
                "Boss selected: {:?} (max_hp={})",
                candidate.entity, candidate.max_hp
            ));
            candidate
        }
        Selection::Replace {
            previous,
            previous_max_hp,
            candidate,
        } => {
            crate::logger::log_info(&format!(
                "Boss replaced: {:?} (max_hp={}) -> {:?} (max_hp={})",
                previous, previous_max_hp, candidate.entity, candidate.max_hp
            ));
            candidate
        }
        Selection::NoCandidate | Selection::Keep | Selection::Frozen => return,
    };

    let current_hp = population
        .get(adopted.entity)
        .map(|(_, health)| read_current_hp(&binding, health))
        .unwrap_or(0.0);

    tracker.boss = Some(TrackedBoss::adopt(adopted.entity, adopted.max_hp, current_hp));
}

/// System: один тик phase machine для выбранного босса
///
/// Запись в компонент идёт мимо change detection; `set_changed` только
/// если adapter реально что-то записал.
pub fn tick_boss_phase<H>(
    time: Res<Time>,
    config: Res<BossRevengeConfig>,
    registry: Res<AppTypeRegistry>,
    mut cache: ResMut<AdapterCache>,
    mut tracker: ResMut<BossTracker>,
    mut bosses: Query<&mut H>,
    mut phase_events: EventWriter<BossPhaseChanged>,
    mut taunts: EventWriter<TauntRequested>,
) where
    H: Component<Mutability = Mutable> + Reflect + TypePath,
{
    let Some(boss) = tracker.boss.as_mut() else {
        return;
    };

    let Ok(mut health) = bosses.get_mut(boss.entity) else {
        if let Some(transition) = boss.mark_vanished() {
            crate::logger::log_info(&format!(
                "Boss {:?} vanished after phase 2, encounter over",
                boss.entity
            ));
            emit_transition(&mut phase_events, boss.entity, transition);
        }
        return;
    };

    let binding = cache.binding_for(&*health, &registry.read());
    let now = time.elapsed_secs();

    let (report, wrote) = {
        let mut access = BoundHealth::new(&binding, health.bypass_change_detection());
        let report = tick_phase(boss, &mut access, now, &config);
        (report, access.wrote())
    };

    if wrote {
        health.set_changed();
    }

    match report.step {
        PhaseStep::Initialized { original_max_hp } => {
            crate::logger::log_info(&format!(
                "Boss {:?} initialized: original_max_hp={}",
                boss.entity, original_max_hp
            ));
        }
        PhaseStep::Phase2Triggered {
            base_max_hp,
            threshold,
            hp_before_heal,
            hp_after_heal,
            grace_until,
        } => {
            crate::logger::log_info(&format!(
                "Boss {:?} PHASE 2: hp {} <= {} (base {}), healed to {}, grace until t={:.2}",
                boss.entity, hp_before_heal, threshold, base_max_hp, hp_after_heal, grace_until
            ));
            taunts.write(TauntRequested {
                text: config.taunt_text.clone(),
                duration_secs: config.taunt_duration_secs,
            });
        }
        PhaseStep::GraceHeal(outcome) => {
            if !outcome.skipped {
                crate::logger::log(&format!(
                    "Grace heal: {} -> {} (heal op: {})",
                    outcome.before, outcome.after, outcome.used_heal_operation
                ));
            }
        }
        PhaseStep::DamageRewritten(correction) => {
            crate::logger::log(&format!(
                "Damage rewritten: {} -> {} (raw {}, taken {})",
                correction.previous_hp,
                correction.corrected_hp,
                correction.raw_damage,
                correction.effective_damage
            ));
        }
        PhaseStep::Defeated => {
            crate::logger::log_info(&format!("Boss {:?} defeated", boss.entity));
        }
        PhaseStep::Observed { .. } | PhaseStep::Finished => {}
    }

    for transition in report.transitions {
        emit_transition(&mut phase_events, boss.entity, transition);
    }
}

fn emit_transition(
    events: &mut EventWriter<BossPhaseChanged>,
    entity: Entity,
    transition: PhaseTransition,
) {
    crate::logger::log(&format!(
        "Boss {:?} phase: {} -> {}",
        entity,
        transition.from.name(),
        transition.to.name()
    ));
    events.write(BossPhaseChanged {
        entity,
        from: transition.from,
        to: transition.to,
    });
}
