//! Attribute adapter: HP-члены чужого типа без compile-time контракта
//!
//! - value: числовые значения (f32/f64/i32/u32) и их конверсия
//! - members: host-registered properties/methods (type data `ReflectMembers`)
//! - strategy: правила discovery по именам
//! - binding: результат discovery для типа + чтение/запись
//! - cache: binding'и по TypeId (resource, один resolve на тип)
//! - access: `HealthAccess` фасад для phase machine

pub mod access;
pub mod binding;
pub mod cache;
pub mod members;
pub mod strategy;
pub mod value;


pub use access::{read_current_hp, read_max_hp, BoundHealth, HealOutcome, HealthAccess};
pub use binding::{AdapterBinding, FieldSlot, ValueAccessor};
pub use cache::AdapterCache;
pub use members::{MethodMember, PropertyMember, ReflectMembers, RegisterMembersExt};
pub use strategy::{BindingStrategy, OperationRule, ValueRule};
pub use value::{MemberValue, NumericValue, ValueKind};
