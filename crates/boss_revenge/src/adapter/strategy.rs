//! Правила discovery (какие имена считаем HP)
//!
//! Упорядоченный набор matcher'ов:
//! 1. property с точным именем (case-insensitive) и числовым значением
//! 2. числовое поле, имя которого содержит хотя бы одно слово из КАЖДОЙ группы
//! 3. метод: имя содержит одно из слов, ровно `arity` числовых аргументов

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Как искать одно числовое значение (max HP / current HP)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRule {
    /// Точные имена accessor-свойств, в порядке приоритета
    pub property_names: Vec<String>,
    /// Группы ключевых слов для имени поля (AND между группами, OR внутри)
    pub field_keywords: Vec<Vec<String>>,
}

impl ValueRule {
    /// Приоритет property по имени (0 = лучший); None если имя не из списка
    pub fn property_rank(&self, name: &str) -> Option<usize> {
        self.property_names
            .iter()
            .position(|wanted| wanted.eq_ignore_ascii_case(name))
    }

    pub fn matches_field(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        !self.field_keywords.is_empty()
            && self.field_keywords.iter().all(|group| {
                group
                    .iter()
                    .any(|keyword| name.contains(keyword.to_lowercase().as_str()))
            })
    }
}

/// Как искать heal-подобную операцию
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRule {
    pub name_keywords: Vec<String>,
    pub arity: usize,
}

impl OperationRule {
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.name_keywords
            .iter()
            .any(|keyword| name.contains(keyword.to_lowercase().as_str()))
    }
}

/// Полный набор правил для одного типа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingStrategy {
    pub max_hp: ValueRule,
    pub current_hp: ValueRule,
    pub heal: OperationRule,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for BindingStrategy {
    fn default() -> Self {
        Self {
            max_hp: ValueRule {
                property_names: words(&["MaxHealth"]),
                field_keywords: vec![words(&["max"]), words(&["hp", "health"])],
            },
            current_hp: ValueRule {
                property_names: words(&["CurrentHealth"]),
                field_keywords: vec![words(&["cur", "current"]), words(&["hp", "health"])],
            },
            heal: OperationRule {
                name_keywords: words(&["heal", "addhealth", "addhp"]),
                arity: 1,
            },
        }
    }
}

impl BindingStrategy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = [("adapter.max_hp", &self.max_hp), ("adapter.current_hp", &self.current_hp)];
        for (field, rule) in rules {
            if rule.property_names.is_empty() && rule.field_keywords.is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "rule matches nothing".to_string(),
                });
            }
            if rule.field_keywords.iter().any(|group| group.is_empty()) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "empty keyword group".to_string(),
                });
            }
        }

        if self.heal.arity == 0 {
            return Err(ConfigError::Invalid {
                field: "adapter.heal.arity",
                reason: "heal needs the amount argument".to_string(),
            });
        }

        Ok(())
    }
}
