//! Порядок и частота boss-систем
//!
//! **Update** (каждый кадр):
//!   ├─ BossRevengeSet::Scan:  только когда `scan_due` (раз в scan_interval)
//!   └─ BossRevengeSet::Phase: только когда есть босс
//!
//! Скан раньше фазы: новый босс получает первый (init) тик в том же кадре.

use bevy::prelude::*;

use crate::boss::BossTracker;

/// Момент следующего скана (elapsed secs)
///
/// 0 → первый скан в первом же кадре.
#[derive(Resource, Debug, Default)]
pub struct ScanTimer {
    pub next_scan_at: f32,
}

impl ScanTimer {
    pub fn is_due(&self, now: f32) -> bool {
        now >= self.next_scan_at
    }

    pub fn schedule_next(&mut self, now: f32, interval_secs: f32) {
        self.next_scan_at = now + interval_secs;
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BossRevengeSet {
    Scan,
    Phase,
}

/// Run condition: пора сканировать и фаза 2 ещё не достигнута
///
/// Босс, умерший в Phase1, скан не останавливает.
pub fn scan_due(time: Res<Time>, timer: Res<ScanTimer>, tracker: Res<BossTracker>) -> bool {
    !tracker.selection_frozen() && timer.is_due(time.elapsed_secs())
}

/// Run condition: босс выбран
pub fn boss_tracked(tracker: Res<BossTracker>) -> bool {
    tracker.boss.is_some()
}
