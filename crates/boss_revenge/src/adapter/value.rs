//! Числовые значения чужих членов
//!
//! HP может лежать в f32, f64, i32 или u32: читаем всё как f32,
//! пишем обратно в исходный тип (целые: round + saturating cast).

use bevy::reflect::PartialReflect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    F32,
    F64,
    I32,
    U32,
    Bool,
    Text,
}

impl ValueKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::F32 | ValueKind::F64 | ValueKind::I32 | ValueKind::U32)
    }

    /// Числовой тип reflect-поля, если он числовой
    pub fn of_field(field: &dyn PartialReflect) -> Option<ValueKind> {
        if field.try_downcast_ref::<f32>().is_some() {
            Some(ValueKind::F32)
        } else if field.try_downcast_ref::<f64>().is_some() {
            Some(ValueKind::F64)
        } else if field.try_downcast_ref::<i32>().is_some() {
            Some(ValueKind::I32)
        } else if field.try_downcast_ref::<u32>().is_some() {
            Some(ValueKind::U32)
        } else {
            None
        }
    }

    /// f32 → значение этого типа (для записи и аргументов вызова)
    pub fn encode(&self, value: f32) -> Option<MemberValue> {
        match self {
            ValueKind::F32 => Some(f32::from_f32(value).into_value()),
            ValueKind::F64 => Some(f64::from_f32(value).into_value()),
            ValueKind::I32 => Some(i32::from_f32(value).into_value()),
            ValueKind::U32 => Some(u32::from_f32(value).into_value()),
            ValueKind::Bool | ValueKind::Text => None,
        }
    }
}

/// Значение, которым обмениваются adapter и зарегистрированные хостом члены
#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue {
    F32(f32),
    F64(f64),
    I32(i32),
    U32(u32),
    Bool(bool),
    Text(String),
}

impl MemberValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            MemberValue::F32(_) => ValueKind::F32,
            MemberValue::F64(_) => ValueKind::F64,
            MemberValue::I32(_) => ValueKind::I32,
            MemberValue::U32(_) => ValueKind::U32,
            MemberValue::Bool(_) => ValueKind::Bool,
            MemberValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            MemberValue::F32(v) => Some(v),
            MemberValue::F64(v) => Some(v as f32),
            MemberValue::I32(v) => Some(v as f32),
            MemberValue::U32(v) => Some(v as f32),
            MemberValue::Bool(_) | MemberValue::Text(_) => None,
        }
    }
}

/// Rust-тип, который может стоять за числовым членом
pub trait NumericValue: Copy + Send + Sync + 'static {
    const KIND: ValueKind;

    fn into_value(self) -> MemberValue;

    fn from_f32(value: f32) -> Self;
}

macro_rules! impl_numeric_value {
    ($ty:ty, $kind:ident, $convert:expr) => {
        impl NumericValue for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn into_value(self) -> MemberValue {
                MemberValue::$kind(self)
            }

            fn from_f32(value: f32) -> Self {
                let convert: fn(f32) -> $ty = $convert;
                convert(value)
            }
        }
    };
}

impl_numeric_value!(f32, F32, |v| v);
impl_numeric_value!(f64, F64, |v| v as f64);
impl_numeric_value!(i32, I32, |v| v.round() as i32);
impl_numeric_value!(u32, U32, |v| v.round() as u32);

/// Читает числовое reflect-поле как f32
pub fn read_numeric(field: &dyn PartialReflect) -> Option<f32> {
    if let Some(v) = field.try_downcast_ref::<f32>() {
        Some(*v)
    } else if let Some(v) = field.try_downcast_ref::<f64>() {
        Some(*v as f32)
    } else if let Some(v) = field.try_downcast_ref::<i32>() {
        Some(*v as f32)
    } else {
        field.try_downcast_ref::<u32>().map(|v| *v as f32)
    }
}

/// Пишет f32 в числовое reflect-поле; false если тип поля не числовой
pub fn write_numeric(field: &mut dyn PartialReflect, value: f32) -> bool {
    if let Some(slot) = field.try_downcast_mut::<f32>() {
        *slot = value;
        return true;
    }
    if let Some(slot) = field.try_downcast_mut::<f64>() {
        *slot = value as f64;
        return true;
    }
    if let Some(slot) = field.try_downcast_mut::<i32>() {
        *slot = i32::from_f32(value);
        return true;
    }
    if let Some(slot) = field.try_downcast_mut::<u32>() {
        *slot = u32::from_f32(value);
        return true;
    }
    false
}
