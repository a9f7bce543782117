//! Phase state machine (один тик на кадр)
//!
//! Uninitialized → Phase1 → Phase2Entering → Phase2Steady (+ Defeated)
//!
//! - Первый тик после выбора только фиксирует original_max_hp и last HP
//! - Phase1: HP ≤ порог (30% original max) → полное лечение, grace окно,
//!   taunt
//! - Phase2Entering: каждый тик лечим до original max, урон не режем
//! - Phase2Steady: любое падение HP режется `rewrite_damage`
//! - prev ≤ 0 и cur ≤ 0 → Defeated, больше никаких записей
//!
//! Логика чистая: HP читается/пишется только через `HealthAccess`,
//! время приходит аргументом.

use super::damage::{rewrite_damage, DamageCorrection};
use super::tracked::{BossPhase, PhaseTransition, TrackedBoss};
use crate::adapter::{HealOutcome, HealthAccess};
use crate::config::BossRevengeConfig;

/// Что произошло за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseStep {
    /// Первый тик: зафиксирован original max HP
    Initialized { original_max_hp: f32 },
    /// Ничего не делали, только запомнили HP
    Observed { hp: f32 },
    /// Порог пройден, вход в фазу 2
    Phase2Triggered {
        base_max_hp: f32,
        threshold: f32,
        hp_before_heal: f32,
        hp_after_heal: f32,
        grace_until: f32,
    },
    /// Grace окно: принудительное лечение
    GraceHeal(HealOutcome),
    /// Фаза 2: урон урезан
    DamageRewritten(DamageCorrection),
    /// Босс мёртв (prev и cur ≤ 0)
    Defeated,
    /// Уже Defeated: тик ничего не трогает
    Finished,
}

/// Итог тика: шаг + переходы фаз (0..=2 за тик)
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub step: PhaseStep,
    pub transitions: Vec<PhaseTransition>,
}

impl TickReport {
    fn new(step: PhaseStep, transitions: Vec<PhaseTransition>) -> Self {
        Self { step, transitions }
    }
}

/// Один тик phase machine
pub fn tick_phase(
    boss: &mut TrackedBoss,
    health: &mut impl HealthAccess,
    now: f32,
    config: &BossRevengeConfig,
) -> TickReport {
    let mut transitions = Vec::new();

    if boss.phase == BossPhase::Defeated {
        return TickReport::new(PhaseStep::Finished, transitions);
    }

    let current_hp = health.current_hp();

    // Первый тик: только снимок
    if !boss.have_initial_hp {
        let max_hp = health.max_hp();
        boss.original_max_hp = if max_hp > 0.0 {
            max_hp
        } else if current_hp > 0.0 {
            current_hp
        } else {
            1.0
        };
        boss.last_observed_hp = current_hp;
        boss.have_initial_hp = true;

        return TickReport::new(
            PhaseStep::Initialized {
                original_max_hp: boss.original_max_hp,
            },
            transitions,
        );
    }

    let previous_hp = boss.last_observed_hp;

    // Уже мёртв на обоих снимках: смерть остаётся
    if current_hp <= 0.0 && previous_hp <= 0.0 {
        boss.last_observed_hp = current_hp;
        transitions.extend(boss.advance(BossPhase::Defeated));
        return TickReport::new(PhaseStep::Defeated, transitions);
    }

    if let BossPhase::Phase2Entering { grace_until } = boss.phase {
        if now < grace_until {
            let target = heal_target(boss, &*health);
            let outcome = health.force_heal_to(target);
            boss.last_observed_hp = health.current_hp();
            return TickReport::new(PhaseStep::GraceHeal(outcome), transitions);
        }

        // Окно закончилось: в этом же тике уже режем урон
        transitions.extend(boss.advance(BossPhase::Phase2Steady));
    }

    let step = match boss.phase {
        BossPhase::Phase1 => tick_phase1(boss, health, previous_hp, current_hp, now, config, &mut transitions),
        BossPhase::Phase2Steady => tick_steady(boss, health, previous_hp, current_hp, config),
        // Phase2Entering обработан выше, Defeated: в начале
        BossPhase::Phase2Entering { .. } | BossPhase::Defeated => {
            boss.last_observed_hp = current_hp;
            PhaseStep::Observed { hp: current_hp }
        }
    };

    TickReport::new(step, transitions)
}

fn tick_phase1(
    boss: &mut TrackedBoss,
    health: &mut impl HealthAccess,
    previous_hp: f32,
    current_hp: f32,
    now: f32,
    config: &BossRevengeConfig,
    transitions: &mut Vec<PhaseTransition>,
) -> PhaseStep {
    let mut base_max_hp = boss.original_max_hp;
    if base_max_hp <= 0.0 {
        base_max_hp = health.max_hp();
    }
    if base_max_hp <= 0.0 {
        base_max_hp = [previous_hp, current_hp]
            .into_iter()
            .find(|hp| *hp > 0.0)
            .unwrap_or(1.0);
    }

    let threshold = (base_max_hp * config.phase2_hp_fraction).max(1.0);

    if !(current_hp > 0.0 && current_hp <= threshold) {
        boss.last_observed_hp = current_hp;
        return PhaseStep::Observed { hp: current_hp };
    }

    // Порог пройден: полное лечение + grace окно
    let outcome = health.force_heal_to(base_max_hp.max(1.0));
    let hp_after_heal = health.current_hp();
    boss.last_observed_hp = hp_after_heal;

    let grace_until = now + config.grace_window_secs;
    transitions.extend(boss.advance(BossPhase::Phase2Entering { grace_until }));

    PhaseStep::Phase2Triggered {
        base_max_hp,
        threshold,
        hp_before_heal: outcome.before,
        hp_after_heal,
        grace_until,
    }
}

fn tick_steady(
    boss: &mut TrackedBoss,
    health: &mut impl HealthAccess,
    previous_hp: f32,
    current_hp: f32,
    config: &BossRevengeConfig,
) -> PhaseStep {
    match rewrite_damage(
        previous_hp,
        current_hp,
        config.damage_taken_fraction,
        config.min_corrected_hp,
    ) {
        Some(correction) => {
            health.set_current_hp(correction.corrected_hp);
            boss.last_observed_hp = correction.corrected_hp;
            PhaseStep::DamageRewritten(correction)
        }
        None => {
            boss.last_observed_hp = current_hp;
            PhaseStep::Observed { hp: current_hp }
        }
    }
}

/// Цель лечения в grace окне: original max → live max → 1
fn heal_target(boss: &TrackedBoss, health: &impl HealthAccess) -> f32 {
    if boss.original_max_hp > 0.0 {
        return boss.original_max_hp;
    }
    let live_max = health.max_hp();
    if live_max > 0.0 {
        live_max
    } else {
        1.0
    }
}
