//! DamageRewriter: ослабление урона в фазе 2
//!
//! Формула:
//! - raw = prev − cur (> 0)
//! - effective = raw × damage_taken_fraction (0.5 → босс живёт вдвое дольше)
//! - heal_back = raw − effective
//! - corrected = max(cur + heal_back, min_corrected_hp)
//!
//! Нижняя граница 1 HP: неположительное значение хост может принять за
//! мгновенную смерть.

/// Итог одной коррекции
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageCorrection {
    pub previous_hp: f32,
    pub observed_hp: f32,
    pub raw_damage: f32,
    pub effective_damage: f32,
    pub heal_back: f32,
    pub corrected_hp: f32,
}

/// Коррекция для кадра prev → cur; None если урона не было (или он смертельный)
pub fn rewrite_damage(
    previous_hp: f32,
    observed_hp: f32,
    damage_taken_fraction: f32,
    min_corrected_hp: f32,
) -> Option<DamageCorrection> {
    if !(previous_hp > 0.0 && observed_hp > 0.0 && observed_hp < previous_hp) {
        return None;
    }

    let raw_damage = previous_hp - observed_hp;
    let effective_damage = raw_damage * damage_taken_fraction;
    let heal_back = raw_damage - effective_damage;
    let corrected_hp = (observed_hp + heal_back).max(min_corrected_hp);

    Some(DamageCorrection {
        previous_hp,
        observed_hp,
        raw_damage,
        effective_damage,
        heal_back,
        corrected_hp,
    })
}
