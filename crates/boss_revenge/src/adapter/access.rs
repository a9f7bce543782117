//! HealthAccess: строго типизированный фасад над чужим entity
//!
//! Phase machine работает только с этим trait'ом. Реализация `BoundHealth`
//! глотает ошибки adapter'а: чтение → 0, запись → no-op, с логом для
//! настоящих сбоев вызова (отсутствующий binding молчит).

use bevy::prelude::*;

use super::binding::AdapterBinding;
use crate::error::AdapterError;

/// Итог `force_heal_to`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealOutcome {
    pub target: f32,
    pub before: f32,
    pub after: f32,
    /// Heal-метод вызван и не упал
    pub used_heal_operation: bool,
    /// Уже было >= target, ничего не делали
    pub skipped: bool,
}

/// Чтение/запись HP одного entity
pub trait HealthAccess {
    /// Max HP; 0 если недоступен
    fn max_hp(&self) -> f32;

    /// Current HP; 0 если недоступен
    fn current_hp(&self) -> f32;

    /// Пишет current HP (max не трогаем); false если ничего не записалось
    fn set_current_hp(&mut self, value: f32) -> bool;

    /// Лечение через heal-операцию (best-effort); false если её нет или упала
    fn try_heal(&mut self, amount: f32) -> bool;

    /// Поднимает HP до `target`: heal-операция, затем ВСЕГДА прямая запись
    fn force_heal_to(&mut self, target: f32) -> HealOutcome {
        let before = self.current_hp();
        if before >= target {
            return HealOutcome {
                target,
                before,
                after: before,
                used_heal_operation: false,
                skipped: true,
            };
        }

        let used_heal_operation = self.try_heal(target - before);
        self.set_current_hp(target);

        HealOutcome {
            target,
            before,
            after: self.current_hp(),
            used_heal_operation,
            skipped: false,
        }
    }
}

/// `HealthAccess` поверх reflect-значения и его binding'а
pub struct BoundHealth<'a> {
    binding: &'a AdapterBinding,
    target: &'a mut dyn Reflect,
    wrote: bool,
}

impl<'a> BoundHealth<'a> {
    pub fn new(binding: &'a AdapterBinding, target: &'a mut dyn Reflect) -> Self {
        Self {
            binding,
            target,
            wrote: false,
        }
    }

    /// Была ли хоть одна успешная запись / вызов (для change detection)
    pub fn wrote(&self) -> bool {
        self.wrote
    }

    fn report(&self, operation: &str, err: &AdapterError) {
        if !err.is_silent() {
            crate::logger::log_warning(&format!(
                "{} on {} failed: {}",
                operation,
                self.binding.type_path(),
                err
            ));
        }
    }
}

impl HealthAccess for BoundHealth<'_> {
    fn max_hp(&self) -> f32 {
        self.binding.read_max(&*self.target).unwrap_or_else(|err| {
            self.report("max_hp", &err);
            0.0
        })
    }

    fn current_hp(&self) -> f32 {
        self.binding.read_current(&*self.target).unwrap_or_else(|err| {
            self.report("current_hp", &err);
            0.0
        })
    }

    fn set_current_hp(&mut self, value: f32) -> bool {
        match self.binding.write_current(&mut *self.target, value) {
            Ok(()) => {
                self.wrote = true;
                crate::logger::log(&format!(
                    "set_current_hp: requested={} after={}",
                    value,
                    self.current_hp()
                ));
                true
            }
            Err(err) => {
                self.report("set_current_hp", &err);
                false
            }
        }
    }

    fn try_heal(&mut self, amount: f32) -> bool {
        match self.binding.invoke_heal(&mut *self.target, amount) {
            Ok(()) => {
                self.wrote = true;
                true
            }
            Err(err) => {
                self.report("heal", &err);
                false
            }
        }
    }
}

/// Read-only чтение без `&mut` (скан популяции)
pub fn read_max_hp(binding: &AdapterBinding, target: &dyn Reflect) -> f32 {
    binding.read_max(target).unwrap_or_else(|err| {
        if !err.is_silent() {
            crate::logger::log_warning(&format!("max_hp on {} failed: {}", binding.type_path(), err));
        }
        0.0
    })
}

pub fn read_current_hp(binding: &AdapterBinding, target: &dyn Reflect) -> f32 {
    binding.read_current(target).unwrap_or_else(|err| {
        if !err.is_silent() {
            crate::logger::log_warning(&format!(
                "current_hp on {} failed: {}",
                binding.type_path(),
                err
            ));
        }
        0.0
    })
}
