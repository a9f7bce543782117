//! Ошибки подсистемы
//!
//! Ни одна из них не должна прерывать кадр: adapter возвращает `Result`,
//! системы логируют и продолжают.

use thiserror::Error;

/// Capability, которую adapter пытается найти у чужого типа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    MaxHp,
    CurrentHp,
    Heal,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::MaxHp => "max hp",
            Capability::CurrentHp => "current hp",
            Capability::Heal => "heal",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// Capability не найдена при discovery (навсегда для этого типа)
    #[error("{type_path} exposes no {capability} member")]
    BindingMissing {
        capability: Capability,
        type_path: String,
    },

    /// Найденный member упал при вызове
    #[error("member `{member}` failed: {reason}")]
    InvocationFailed { member: String, reason: String },

    /// Тип не reflect-ится как struct → полей нет
    #[error("{type_path} is not a struct, fields cannot be scanned")]
    NotAStruct { type_path: String },
}

impl AdapterError {
    /// Missing binding is expected; only real call failures are worth a warning.
    pub fn is_silent(&self) -> bool {
        matches!(self, AdapterError::BindingMissing { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
