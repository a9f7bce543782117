//! Настройки механики (resource)
//!
//! Все константы механики: конфигурация, а не закон: хост может загрузить
//! их из RON-файла мода. Любое поле можно опустить, будет default.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::adapter::BindingStrategy;
use crate::error::ConfigError;

/// Параметры boss-механики
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossRevengeConfig {
    /// Период пересканирования популяции (секунды)
    pub scan_interval_secs: f32,
    /// Минимальный max HP, с которого entity считается кандидатом в боссы
    pub min_boss_max_hp: f32,
    /// Смена босса до фазы 2: new_max > current_max * ratio + margin
    pub reselect_ratio: f32,
    pub reselect_margin: f32,
    /// Порог фазы 2 (доля от original max HP)
    pub phase2_hp_fraction: f32,
    /// Окно принудительного лечения после входа в фазу 2 (секунды)
    pub grace_window_secs: f32,
    /// Доля урона, которая реально проходит в фазе 2
    pub damage_taken_fraction: f32,
    /// Ниже этого значения скорректированный HP не опускается
    pub min_corrected_hp: f32,
    pub taunt_text: String,
    pub taunt_duration_secs: f32,
    /// Как искать HP-члены у чужого типа
    pub adapter: BindingStrategy,
}

impl Default for BossRevengeConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 1.0,
            min_boss_max_hp: 200.0,
            reselect_ratio: 1.5,
            reselect_margin: 1.0,
            phase2_hp_fraction: 0.3,
            grace_window_secs: 1.0,
            damage_taken_fraction: 0.5,
            min_corrected_hp: 1.0,
            taunt_text: "You will pay for that".to_string(),
            taunt_duration_secs: 3.0,
            adapter: BindingStrategy::default(),
        }
    }
}

impl BossRevengeConfig {
    /// Парсит RON и сразу валидирует
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                })
            }
        }

        fn unit_fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be in (0, 1], got {}", value),
                })
            }
        }

        positive("scan_interval_secs", self.scan_interval_secs)?;
        positive("min_boss_max_hp", self.min_boss_max_hp)?;
        positive("grace_window_secs", self.grace_window_secs)?;
        positive("taunt_duration_secs", self.taunt_duration_secs)?;
        positive("min_corrected_hp", self.min_corrected_hp)?;
        unit_fraction("phase2_hp_fraction", self.phase2_hp_fraction)?;
        unit_fraction("damage_taken_fraction", self.damage_taken_fraction)?;

        if !(self.reselect_ratio >= 1.0) {
            return Err(ConfigError::Invalid {
                field: "reselect_ratio",
                reason: format!("must be >= 1.0, got {}", self.reselect_ratio),
            });
        }
        if !(self.reselect_margin >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "reselect_margin",
                reason: format!("must be >= 0.0, got {}", self.reselect_margin),
            });
        }

        self.adapter.validate()
    }
}
