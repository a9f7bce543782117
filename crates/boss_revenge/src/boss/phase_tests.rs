//! Tests for the phase state machine (pure, через fake HealthAccess).

#[cfg(test)]
mod tests {
    use crate::adapter::HealthAccess;
    use crate::boss::*;
    use crate::config::BossRevengeConfig;
    use bevy::prelude::*;

    /// HP в памяти + журнал всех записей
    #[derive(Debug)]
    struct FakeHealth {
        max: f32,
        current: f32,
        has_heal_op: bool,
        writes: Vec<f32>,
        heals: Vec<f32>,
    }

    impl FakeHealth {
        fn new(max: f32) -> Self {
            Self {
                max,
                current: max,
                has_heal_op: true,
                writes: Vec::new(),
                heals: Vec::new(),
            }
        }

        fn without_heal_op(mut self) -> Self {
            self.has_heal_op = false;
            self
        }
    }

    impl HealthAccess for FakeHealth {
        fn max_hp(&self) -> f32 {
            self.max
        }

        fn current_hp(&self) -> f32 {
            self.current
        }

        fn set_current_hp(&mut self, value: f32) -> bool {
            self.writes.push(value);
            self.current = value;
            true
        }

        fn try_heal(&mut self, amount: f32) -> bool {
            if !self.has_heal_op {
                return false;
            }
            self.heals.push(amount);
            self.current = (self.current + amount).min(self.max);
            true
        }
    }

    /// Босс после init-тика в t=0
    fn initialized(health: &mut FakeHealth, config: &BossRevengeConfig) -> TrackedBoss {
        let mut boss = TrackedBoss::adopt(Entity::from_raw(1), health.max, health.current);
        let report = tick_phase(&mut boss, health, 0.0, config);
        assert!(matches!(report.step, PhaseStep::Initialized { .. }));
        boss
    }

    /// Босс, только что вошедший в фазу 2 в момент `now`
    fn triggered(health: &mut FakeHealth, now: f32, config: &BossRevengeConfig) -> TrackedBoss {
        let mut boss = initialized(health, config);
        health.current = health.max * 0.1;
        let report = tick_phase(&mut boss, health, now, config);
        assert!(matches!(report.step, PhaseStep::Phase2Triggered { .. }));
        boss
    }

    #[test]
    fn test_first_tick_only_captures_snapshot() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(1000.0);
        health.current = 100.0; // уже ниже порога

        let mut boss = TrackedBoss::adopt(Entity::from_raw(1), 1000.0, 100.0);
        let report = tick_phase(&mut boss, &mut health, 0.0, &config);

        assert_eq!(report.step, PhaseStep::Initialized { original_max_hp: 1000.0 });
        assert!(report.transitions.is_empty());
        assert!(boss.have_initial_hp);
        assert_eq!(boss.last_observed_hp, 100.0);
        assert_eq!(boss.phase, BossPhase::Phase1);
        assert!(health.writes.is_empty());
    }

    #[test]
    fn test_initial_max_fallbacks() {
        let config = BossRevengeConfig::default();

        let mut health = FakeHealth::new(0.0);
        health.current = 40.0;
        let mut boss = TrackedBoss::adopt(Entity::from_raw(1), 0.0, 40.0);
        tick_phase(&mut boss, &mut health, 0.0, &config);
        assert_eq!(boss.original_max_hp, 40.0);

        let mut health = FakeHealth::new(0.0);
        let mut boss = TrackedBoss::adopt(Entity::from_raw(1), 0.0, 0.0);
        tick_phase(&mut boss, &mut health, 0.0, &config);
        assert_eq!(boss.original_max_hp, 1.0);
    }

    #[test]
    fn test_phase2_triggers_exactly_at_threshold() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(1000.0);
        let mut boss = initialized(&mut health, &config);

        for (frame, hp) in [1000.0, 500.0, 301.0].into_iter().enumerate() {
            health.current = hp;
            let report = tick_phase(&mut boss, &mut health, 0.1 * (frame + 1) as f32, &config);
            assert_eq!(report.step, PhaseStep::Observed { hp });
            assert_eq!(boss.phase, BossPhase::Phase1);
        }
        assert!(health.writes.is_empty());

        health.current = 300.0;
        let report = tick_phase(&mut boss, &mut health, 1.0, &config);

        assert_eq!(
            report.step,
            PhaseStep::Phase2Triggered {
                base_max_hp: 1000.0,
                threshold: 300.0,
                hp_before_heal: 300.0,
                hp_after_heal: 1000.0,
                grace_until: 2.0,
            }
        );
        assert_eq!(
            report.transitions,
            vec![PhaseTransition {
                from: BossPhase::Phase1,
                to: BossPhase::Phase2Entering { grace_until: 2.0 },
            }]
        );
        assert_eq!(health.current, 1000.0);
        assert_eq!(boss.last_observed_hp, 1000.0);
        assert_eq!(health.heals, vec![700.0]);

        // 150 приходит уже в grace окне: лечим, не режем
        health.current = 150.0;
        let report = tick_phase(&mut boss, &mut health, 1.1, &config);
        assert!(matches!(report.step, PhaseStep::GraceHeal(_)));
        assert_eq!(health.current, 1000.0);
    }

    #[test]
    fn test_one_shot_kill_in_phase1_does_not_trigger() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(1000.0);
        let mut boss = initialized(&mut health, &config);

        health.current = 0.0;
        let report = tick_phase(&mut boss, &mut health, 0.1, &config);
        assert_eq!(report.step, PhaseStep::Observed { hp: 0.0 });
        assert_eq!(boss.phase, BossPhase::Phase1);

        let report = tick_phase(&mut boss, &mut health, 0.2, &config);
        assert_eq!(report.step, PhaseStep::Defeated);
        assert_eq!(boss.phase, BossPhase::Defeated);
        assert!(health.writes.is_empty());
        assert!(health.heals.is_empty());
    }

    #[test]
    fn test_grace_window_converges_to_original_max() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(1000.0);
        let mut boss = triggered(&mut health, 1.0, &config);

        for (step, hp) in [600.0, 20.0, 999.0].into_iter().enumerate() {
            health.current = hp;
            let now = 1.2 + 0.2 * step as f32;
            let report = tick_phase(&mut boss, &mut health, now, &config);

            let PhaseStep::GraceHeal(outcome) = report.step else {
                panic!("expected grace heal, got {:?}", report.step);
            };
            assert_eq!(outcome.before, hp);
            assert_eq!(outcome.after, 1000.0);
            assert!(outcome.used_heal_operation);
            assert_eq!(boss.last_observed_hp, 1000.0);
            assert!(matches!(boss.phase, BossPhase::Phase2Entering { .. }));
        }
    }

    #[test]
    fn test_grace_heal_without_heal_operation_still_reaches_target() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(1000.0).without_heal_op();
        let mut boss = triggered(&mut health, 1.0, &config);

        health.current = 250.0;
        let report = tick_phase(&mut boss, &mut health, 1.5, &config);

        let PhaseStep::GraceHeal(outcome) = report.step else {
            panic!("expected grace heal");
        };
        assert!(!outcome.used_heal_operation);
        assert_eq!(health.current, 1000.0);
        assert!(health.heals.is_empty());
    }

    #[test]
    fn test_grace_expiry_attenuates_in_same_tick() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(1000.0);
        let mut boss = triggered(&mut health, 1.0, &config);

        health.current = 800.0;
        let report = tick_phase(&mut boss, &mut health, 2.0, &config);

        assert_eq!(
            report.transitions,
            vec![PhaseTransition {
                from: BossPhase::Phase2Entering { grace_until: 2.0 },
                to: BossPhase::Phase2Steady,
            }]
        );
        let PhaseStep::DamageRewritten(correction) = report.step else {
            panic!("expected damage rewrite, got {:?}", report.step);
        };
        assert_eq!(correction.corrected_hp, 900.0);
        assert_eq!(health.current, 900.0);
        assert_eq!(boss.phase, BossPhase::Phase2Steady);
    }

    #[test]
    fn test_steady_phase_halves_every_hit() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(1000.0);
        let mut boss = triggered(&mut health, 1.0, &config);

        let mut now = 3.0;
        let mut expected = 1000.0;
        for damage in [200.0, 100.0, 400.0, 10.0] {
            health.current -= damage;
            tick_phase(&mut boss, &mut health, now, &config);
            expected -= damage / 2.0;
            assert_eq!(health.current, expected);
            assert_eq!(boss.last_observed_hp, expected);
            now += 0.1;
        }

        // Лечение хоста не трогаем
        health.current += 50.0;
        let writes_before = health.writes.len();
        let report = tick_phase(&mut boss, &mut health, now, &config);
        assert_eq!(report.step, PhaseStep::Observed { hp: expected + 50.0 });
        assert_eq!(health.writes.len(), writes_before);
    }

    #[test]
    fn test_death_in_steady_phase_stops_writes() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(1000.0);
        let mut boss = triggered(&mut health, 1.0, &config);

        health.current = 900.0;
        tick_phase(&mut boss, &mut health, 3.0, &config);
        let writes_before = health.writes.len();

        // Смертельный удар: коррекции нет
        health.current = 0.0;
        let report = tick_phase(&mut boss, &mut health, 3.1, &config);
        assert_eq!(report.step, PhaseStep::Observed { hp: 0.0 });

        let report = tick_phase(&mut boss, &mut health, 3.2, &config);
        assert_eq!(report.step, PhaseStep::Defeated);
        assert_eq!(
            report.transitions,
            vec![PhaseTransition {
                from: BossPhase::Phase2Steady,
                to: BossPhase::Defeated,
            }]
        );

        // Хост «воскресил» entity: мы уже ничего не трогаем
        health.current = 500.0;
        let report = tick_phase(&mut boss, &mut health, 3.3, &config);
        assert_eq!(report.step, PhaseStep::Finished);
        assert!(report.transitions.is_empty());
        assert_eq!(health.writes.len(), writes_before);
        assert_eq!(health.current, 500.0);
    }

    #[test]
    fn test_custom_fractions_from_config() {
        let config = BossRevengeConfig {
            phase2_hp_fraction: 0.5,
            damage_taken_fraction: 0.25,
            grace_window_secs: 0.5,
            ..Default::default()
        };
        let mut health = FakeHealth::new(400.0);
        let mut boss = initialized(&mut health, &config);

        health.current = 200.0;
        let report = tick_phase(&mut boss, &mut health, 1.0, &config);
        assert!(matches!(
            report.step,
            PhaseStep::Phase2Triggered { threshold, grace_until, .. } if threshold == 200.0 && grace_until == 1.5
        ));

        // raw 100 → проходит 25
        health.current = 300.0;
        tick_phase(&mut boss, &mut health, 1.5, &config);
        assert_eq!(health.current, 375.0);
    }

    #[test]
    fn test_threshold_never_below_one_hp() {
        let config = BossRevengeConfig::default();
        let mut health = FakeHealth::new(2.0);
        let mut boss = initialized(&mut health, &config);

        // 2 × 0.3 = 0.6 → порог поднят до 1
        health.current = 1.0;
        let report = tick_phase(&mut boss, &mut health, 0.5, &config);
        assert!(matches!(report.step, PhaseStep::Phase2Triggered { threshold, .. } if threshold == 1.0));
        assert_eq!(health.current, 2.0);
    }
}
