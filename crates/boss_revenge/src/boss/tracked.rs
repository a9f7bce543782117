//! TrackedBoss: единственная запись о выбранном боссе

use bevy::prelude::*;

/// Фаза босса
///
/// Только вперёд: Phase1 → Phase2Entering → Phase2Steady → Defeated.
/// Defeated достижим из любой фазы (смерть / пропажа entity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossPhase {
    /// До порога, урон проходит как есть
    Phase1,
    /// Окно принудительного лечения после порога
    Phase2Entering {
        /// До какого момента (elapsed secs) длится окно
        grace_until: f32,
    },
    /// Урон режется навсегда
    Phase2Steady,
    /// Терминальное состояние: HP больше не трогаем
    Defeated,
}

impl BossPhase {
    pub fn rank(&self) -> u8 {
        match self {
            BossPhase::Phase1 => 0,
            BossPhase::Phase2Entering { .. } => 1,
            BossPhase::Phase2Steady => 2,
            BossPhase::Defeated => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BossPhase::Phase1 => "Phase1",
            BossPhase::Phase2Entering { .. } => "Phase2Entering",
            BossPhase::Phase2Steady => "Phase2Steady",
            BossPhase::Defeated => "Defeated",
        }
    }

    pub fn reached_phase2(&self) -> bool {
        matches!(self, BossPhase::Phase2Entering { .. } | BossPhase::Phase2Steady)
    }
}

/// Переход между фазами
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTransition {
    pub from: BossPhase,
    pub to: BossPhase,
}

/// Состояние выбранного босса
///
/// `entity`: слабая ссылка: босс может исчезнуть в любой кадр,
/// запись это переживает.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedBoss {
    pub entity: Entity,
    /// Снимок max HP, база для порога и цели лечения
    pub original_max_hp: f32,
    /// HP прошлого кадра (для дельты)
    pub last_observed_hp: f32,
    pub phase: BossPhase,
    /// original_max_hp уже зафиксирован первым тиком
    pub have_initial_hp: bool,
    /// Фаза 2 была достигнута (остаётся true и после Defeated)
    pub phase2_reached: bool,
}

impl TrackedBoss {
    /// Новый босс из скана; original_max_hp уточнится первым тиком
    pub fn adopt(entity: Entity, max_hp: f32, current_hp: f32) -> Self {
        Self {
            entity,
            original_max_hp: max_hp,
            last_observed_hp: current_hp,
            phase: BossPhase::Phase1,
            have_initial_hp: false,
            phase2_reached: false,
        }
    }

    /// Переход только вперёд; попытка откатить фазу игнорируется
    pub fn advance(&mut self, next: BossPhase) -> Option<PhaseTransition> {
        if next.rank() <= self.phase.rank() {
            crate::logger::log_warning(&format!(
                "Refused phase regression for {:?}: {} -> {}",
                self.entity,
                self.phase.name(),
                next.name()
            ));
            return None;
        }

        let transition = PhaseTransition {
            from: self.phase,
            to: next,
        };
        self.phase = next;
        self.phase2_reached |= next.reached_phase2();
        Some(transition)
    }

    /// Выбор босса заморожен: только если фаза 2 была достигнута
    ///
    /// Умерший в Phase1 босс выбор не замораживает: скан его заменит.
    pub fn selection_frozen(&self) -> bool {
        self.phase2_reached
    }

    /// Бой окончен: босс побеждён после фазы 2
    pub fn encounter_over(&self) -> bool {
        self.phase2_reached && self.phase == BossPhase::Defeated
    }

    /// Entity босса больше не резолвится
    ///
    /// До фазы 2 запись остаётся (следующий скан выберет нового),
    /// после фазы 2 бой считается оконченным.
    pub fn mark_vanished(&mut self) -> Option<PhaseTransition> {
        if self.phase.reached_phase2() {
            self.advance(BossPhase::Defeated)
        } else {
            None
        }
    }
}

/// Resource: текущий босс (или никого)
#[derive(Resource, Debug, Default)]
pub struct BossTracker {
    pub boss: Option<TrackedBoss>,
}

impl BossTracker {
    pub fn selection_frozen(&self) -> bool {
        self.boss.as_ref().is_some_and(TrackedBoss::selection_frozen)
    }

    pub fn encounter_over(&self) -> bool {
        self.boss.as_ref().is_some_and(TrackedBoss::encounter_over)
    }

    pub fn phase(&self) -> Option<BossPhase> {
        self.boss.as_ref().map(|b| b.phase)
    }

    pub fn entity(&self) -> Option<Entity> {
        self.boss.as_ref().map(|b| b.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_only_moves_forward() {
        let mut boss = TrackedBoss::adopt(Entity::PLACEHOLDER, 1000.0, 1000.0);

        let t = boss.advance(BossPhase::Phase2Entering { grace_until: 5.0 });
        assert!(t.is_some());
        assert!(boss.advance(BossPhase::Phase1).is_none());
        assert!(boss
            .advance(BossPhase::Phase2Entering { grace_until: 9.0 })
            .is_none());
        assert_eq!(boss.phase, BossPhase::Phase2Entering { grace_until: 5.0 });

        let t = boss.advance(BossPhase::Phase2Steady).expect("forward");
        assert_eq!(t.from, BossPhase::Phase2Entering { grace_until: 5.0 });
        assert_eq!(t.to, BossPhase::Phase2Steady);
        assert!(boss.advance(BossPhase::Phase2Entering { grace_until: 1.0 }).is_none());
        assert_eq!(boss.phase, BossPhase::Phase2Steady);
    }

    #[test]
    fn test_vanish_before_phase2_keeps_record() {
        let mut boss = TrackedBoss::adopt(Entity::PLACEHOLDER, 500.0, 500.0);
        assert!(boss.mark_vanished().is_none());
        assert_eq!(boss.phase, BossPhase::Phase1);
        assert!(!boss.selection_frozen());
    }

    #[test]
    fn test_vanish_after_phase2_ends_encounter() {
        let mut boss = TrackedBoss::adopt(Entity::PLACEHOLDER, 500.0, 500.0);
        boss.advance(BossPhase::Phase2Steady);

        let t = boss.mark_vanished().expect("defeated");
        assert_eq!(t.to, BossPhase::Defeated);
        assert!(boss.selection_frozen());
        assert!(boss.encounter_over());
    }

    #[test]
    fn test_death_in_phase1_keeps_selection_open() {
        let mut boss = TrackedBoss::adopt(Entity::PLACEHOLDER, 250.0, 250.0);
        boss.advance(BossPhase::Defeated).expect("forward");

        assert_eq!(boss.phase, BossPhase::Defeated);
        assert!(!boss.phase2_reached);
        assert!(!boss.selection_frozen());
        assert!(!boss.encounter_over());
        // Пропажа мёртвого Phase1 босса ничего не меняет
        assert!(boss.mark_vanished().is_none());
    }

    #[test]
    fn test_tracker_frozen_only_past_phase1() {
        let mut tracker = BossTracker::default();
        assert!(!tracker.selection_frozen());

        tracker.boss = Some(TrackedBoss::adopt(Entity::PLACEHOLDER, 300.0, 300.0));
        assert!(!tracker.selection_frozen());

        if let Some(boss) = tracker.boss.as_mut() {
            boss.advance(BossPhase::Phase2Steady);
        }
        assert!(tracker.selection_frozen());
        assert_eq!(tracker.phase(), Some(BossPhase::Phase2Steady));
    }
}
