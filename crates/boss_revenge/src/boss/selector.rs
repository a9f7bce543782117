//! BossSelector: выбор босса по max HP
//!
//! - Кандидат: max HP ≥ floor (200 по умолчанию)
//! - Лучший: наибольший max HP (при равенстве: первый найденный)
//! - Смена до фазы 2 только с гистерезисом: new > current × 1.5 + 1
//! - После фазы 2 выбор заморожен
//! - Умерший в Phase1 босс заменяется любым кандидатом, без гистерезиса

use bevy::prelude::*;

use super::tracked::{BossPhase, TrackedBoss};
use crate::config::BossRevengeConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub entity: Entity,
    pub max_hp: f32,
}

/// Решение скана
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Никто не проходит floor (босс ещё не заспавнился)
    NoCandidate,
    /// Босса не было (или он исчез до фазы 2): берём лучшего
    Adopt(Candidate),
    /// Заметно более толстый кандидат до фазы 2 (или любой, если босс умер в Phase1)
    Replace {
        previous: Entity,
        previous_max_hp: f32,
        candidate: Candidate,
    },
    /// Текущий босс остаётся
    Keep,
    /// Фаза 2 была достигнута: выбор не меняем
    Frozen,
}

/// Лучший кандидат популяции
pub fn best_candidate(
    population: impl IntoIterator<Item = Candidate>,
    min_boss_max_hp: f32,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for candidate in population {
        // Маленькие пулы HP пропускаем целиком
        if !(candidate.max_hp >= min_boss_max_hp) {
            continue;
        }
        if best.map_or(true, |b| candidate.max_hp > b.max_hp) {
            best = Some(candidate);
        }
    }

    best.filter(|b| b.max_hp > 0.0)
}

/// Решение по текущему боссу и лучшему кандидату
///
/// `live_max_hp`: max HP текущего босса сейчас; `None` если entity пропал.
pub fn decide_selection(
    tracked: Option<&TrackedBoss>,
    live_max_hp: Option<f32>,
    best: Option<Candidate>,
    config: &BossRevengeConfig,
) -> Selection {
    if tracked.is_some_and(TrackedBoss::selection_frozen) {
        return Selection::Frozen;
    }

    let Some(best) = best else {
        return Selection::NoCandidate;
    };

    let Some(boss) = tracked else {
        return Selection::Adopt(best);
    };

    if boss.phase == BossPhase::Defeated {
        return if best.entity != boss.entity {
            Selection::Replace {
                previous: boss.entity,
                previous_max_hp: boss.original_max_hp,
                candidate: best,
            }
        } else {
            Selection::Keep
        };
    }

    let Some(live_max_hp) = live_max_hp else {
        return Selection::Adopt(best);
    };

    let current_max_hp = if live_max_hp > 0.0 {
        live_max_hp
    } else {
        boss.original_max_hp
    };

    let replace_above = current_max_hp * config.reselect_ratio + config.reselect_margin;
    if best.entity != boss.entity && best.max_hp > replace_above {
        Selection::Replace {
            previous: boss.entity,
            previous_max_hp: current_max_hp,
            candidate: best,
        }
    } else {
        Selection::Keep
    }
}
