//! AdapterBinding: результат discovery для одного конкретного типа
//!
//! Resolve делается один раз на тип (см. `AdapterCache`), дальше binding
//! неизменяемый. Все чтения/записи идут через него и возвращают `Result`;
//! «съесть» ошибку и вернуть 0 решает `BoundHealth`, не binding.

use bevy::prelude::*;
use bevy::reflect::{PartialReflect, ReflectMut, ReflectRef, Struct, TypeRegistry};
use std::any::TypeId;

use super::members::{MethodMember, PropertyMember, ReflectMembers};
use super::strategy::{BindingStrategy, ValueRule};
use super::value::{read_numeric, write_numeric, ValueKind};
use crate::error::{AdapterError, Capability};

/// Найденное числовое поле
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub name: String,
    pub kind: ValueKind,
}

/// Accessor одного значения: property и/или поле
#[derive(Debug, Clone, Default)]
pub struct ValueAccessor {
    pub property: Option<PropertyMember>,
    pub field: Option<FieldSlot>,
}

impl ValueAccessor {
    pub fn is_bound(&self) -> bool {
        self.property.is_some() || self.field.is_some()
    }

    fn describe(&self) -> String {
        match (&self.property, &self.field) {
            (Some(p), Some(f)) => format!("prop:{} + field:{}", p.name(), f.name),
            (Some(p), None) => format!("prop:{}", p.name()),
            (None, Some(f)) => format!("field:{}", f.name),
            (None, None) => "none".to_string(),
        }
    }
}

/// Результат discovery для типа
#[derive(Debug, Clone)]
pub struct AdapterBinding {
    type_path: String,
    max_hp: ValueAccessor,
    current_hp: ValueAccessor,
    heal: Option<MethodMember>,
}

impl AdapterBinding {
    /// Discovery по образцу `sample` (тип `type_id`)
    ///
    /// Никогда не падает: что не нашлось, то absent. Ошибки discovery
    /// возвращаются вторым элементом, чтобы вызывающий их залогировал.
    pub fn resolve(
        sample: &dyn Reflect,
        type_id: TypeId,
        type_path: &str,
        registry: &TypeRegistry,
        strategy: &BindingStrategy,
    ) -> (Self, Vec<AdapterError>) {
        let mut problems = Vec::new();

        let members = registry.get_type_data::<ReflectMembers>(type_id);
        let properties = members.map(|m| m.properties()).unwrap_or(&[]);
        let methods = members.map(|m| m.methods()).unwrap_or(&[]);

        let fields = match numeric_fields(sample) {
            Some(fields) => fields,
            None => {
                problems.push(AdapterError::NotAStruct {
                    type_path: type_path.to_string(),
                });
                Vec::new()
            }
        };

        let max_property = find_property(properties, &strategy.max_hp);
        let current_property = find_property(properties, &strategy.current_hp);

        // Поле, взятое под max, уже не рассматривается как current
        let mut max_field = None;
        let mut current_field = None;
        for slot in fields {
            if max_field.is_none() && strategy.max_hp.matches_field(&slot.name) {
                max_field = Some(slot);
            } else if current_field.is_none() && strategy.current_hp.matches_field(&slot.name) {
                current_field = Some(slot);
            }
        }

        let heal = methods
            .iter()
            .find(|m| {
                strategy.heal.matches_name(m.name())
                    && m.params().len() == strategy.heal.arity
                    && m.params().iter().all(|kind| kind.is_numeric())
            })
            .cloned();

        let binding = Self {
            type_path: type_path.to_string(),
            max_hp: ValueAccessor {
                property: max_property,
                field: max_field,
            },
            current_hp: ValueAccessor {
                property: current_property,
                field: current_field,
            },
            heal,
        };

        (binding, problems)
    }

    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    pub fn max_hp(&self) -> &ValueAccessor {
        &self.max_hp
    }

    pub fn current_hp(&self) -> &ValueAccessor {
        &self.current_hp
    }

    pub fn heal(&self) -> Option<&MethodMember> {
        self.heal.as_ref()
    }

    /// Однострочное описание для лога
    pub fn summary(&self) -> String {
        format!(
            "type={} max=[{}] cur=[{}] heal=[{}]",
            self.type_path,
            self.max_hp.describe(),
            self.current_hp.describe(),
            self.heal.as_ref().map(|m| m.name()).unwrap_or("none"),
        )
    }

    pub fn read_max(&self, target: &dyn Reflect) -> Result<f32, AdapterError> {
        self.read_value(&self.max_hp, Capability::MaxHp, target)
    }

    pub fn read_current(&self, target: &dyn Reflect) -> Result<f32, AdapterError> {
        self.read_value(&self.current_hp, Capability::CurrentHp, target)
    }

    /// Пишет current HP через settable property И через поле, если есть оба
    ///
    /// Ok(()) если хотя бы одна запись прошла.
    pub fn write_current(&self, target: &mut dyn Reflect, value: f32) -> Result<(), AdapterError> {
        if !self.current_hp.is_bound() {
            return Err(self.missing(Capability::CurrentHp));
        }

        let mut wrote = false;
        let mut failure = None;

        if let Some(property) = self.current_hp.property.as_ref().filter(|p| p.can_write()) {
            match property.set(target, value) {
                Ok(()) => wrote = true,
                Err(reason) => {
                    failure = Some(AdapterError::InvocationFailed {
                        member: property.name().to_string(),
                        reason,
                    })
                }
            }
        }

        if let Some(slot) = &self.current_hp.field {
            match write_field(target, &slot.name, value) {
                Ok(()) => wrote = true,
                Err(err) => failure = Some(err),
            }
        }

        match (wrote, failure) {
            (true, _) => Ok(()),
            (false, Some(err)) => Err(err),
            // property без setter'а и без поля
            (false, None) => Err(self.missing(Capability::CurrentHp)),
        }
    }

    /// Вызывает heal-метод с одним числовым аргументом
    pub fn invoke_heal(&self, target: &mut dyn Reflect, amount: f32) -> Result<(), AdapterError> {
        let method = self.heal.as_ref().ok_or_else(|| self.missing(Capability::Heal))?;

        let args: Vec<_> = method
            .params()
            .iter()
            .filter_map(|kind| kind.encode(amount))
            .collect();

        method
            .invoke(target, &args)
            .map_err(|reason| AdapterError::InvocationFailed {
                member: method.name().to_string(),
                reason,
            })
    }

    fn read_value(
        &self,
        accessor: &ValueAccessor,
        capability: Capability,
        target: &dyn Reflect,
    ) -> Result<f32, AdapterError> {
        if let Some(property) = accessor.property.as_ref().filter(|p| p.can_read()) {
            let value = property
                .get(target)
                .map_err(|reason| AdapterError::InvocationFailed {
                    member: property.name().to_string(),
                    reason,
                })?;
            if let Some(v) = value.as_f32() {
                return Ok(v);
            }
        }

        if let Some(slot) = &accessor.field {
            return read_field(target, &slot.name);
        }

        Err(self.missing(capability))
    }

    fn missing(&self, capability: Capability) -> AdapterError {
        AdapterError::BindingMissing {
            capability,
            type_path: self.type_path.clone(),
        }
    }
}

fn find_property(properties: &[PropertyMember], rule: &ValueRule) -> Option<PropertyMember> {
    // Приоритет: порядок имён в правиле, не порядок регистрации
    properties
        .iter()
        .filter(|p| p.kind().is_numeric())
        .filter_map(|p| rule.property_rank(p.name()).map(|rank| (rank, p)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, p)| p.clone())
}

/// Числовые поля struct'а в порядке объявления; None если это не struct
fn numeric_fields(sample: &dyn Reflect) -> Option<Vec<FieldSlot>> {
    let ReflectRef::Struct(s) = sample.reflect_ref() else {
        return None;
    };

    let fields = (0..s.field_len())
        .filter_map(|index| {
            let name = s.name_at(index)?;
            let kind = ValueKind::of_field(s.field_at(index)?)?;
            Some(FieldSlot {
                name: name.to_string(),
                kind,
            })
        })
        .collect();

    Some(fields)
}

fn read_field(target: &dyn Reflect, name: &str) -> Result<f32, AdapterError> {
    let ReflectRef::Struct(s) = target.reflect_ref() else {
        return Err(field_failure(name, "target is not a struct"));
    };
    let field = s
        .field(name)
        .ok_or_else(|| field_failure(name, "field disappeared"))?;
    read_numeric(field).ok_or_else(|| field_failure(name, "field is not numeric"))
}

fn write_field(target: &mut dyn Reflect, name: &str, value: f32) -> Result<(), AdapterError> {
    let ReflectMut::Struct(s) = target.reflect_mut() else {
        return Err(field_failure(name, "target is not a struct"));
    };
    let field = s
        .field_mut(name)
        .ok_or_else(|| field_failure(name, "field disappeared"))?;
    if write_numeric(field, value) {
        Ok(())
    } else {
        Err(field_failure(name, "field is not numeric"))
    }
}

fn field_failure(name: &str, reason: &str) -> AdapterError {
    AdapterError::InvocationFailed {
        member: name.to_string(),
        reason: reason.to_string(),
    }
}
