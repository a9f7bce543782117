//! Properties и operations чужого типа
//!
//! `bevy_reflect` отдаёт только поля. Accessor-свойства и методы хост
//! регистрирует сам: как type data (`ReflectMembers`) в `AppTypeRegistry`,
//! рядом с `ReflectComponent`. Adapter видит их только по имени и типам
//! значений, никакого trait-контракта с типом нет.

use bevy::prelude::*;
use bevy::reflect::GetTypeRegistration;
use std::any::TypeId;
use std::sync::Arc;

use super::value::{MemberValue, NumericValue, ValueKind};

type Getter = Arc<dyn Fn(&dyn Reflect) -> Option<MemberValue> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut dyn Reflect, f32) -> Result<(), String> + Send + Sync>;
type Invoker = Arc<dyn Fn(&mut dyn Reflect, &[MemberValue]) -> Result<(), String> + Send + Sync>;

/// Accessor-свойство (аналог getter/setter пары)
#[derive(Clone)]
pub struct PropertyMember {
    name: String,
    kind: ValueKind,
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl PropertyMember {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn can_read(&self) -> bool {
        self.getter.is_some()
    }

    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }

    pub fn get(&self, target: &dyn Reflect) -> Result<MemberValue, String> {
        let getter = self.getter.as_ref().ok_or("property has no getter")?;
        getter(target).ok_or_else(|| "receiver type mismatch".to_string())
    }

    pub fn set(&self, target: &mut dyn Reflect, value: f32) -> Result<(), String> {
        let setter = self.setter.as_ref().ok_or("property has no setter")?;
        setter(target, value)
    }
}

impl std::fmt::Debug for PropertyMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyMember")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("can_read", &self.can_read())
            .field("can_write", &self.can_write())
            .finish()
    }
}

/// Метод с позиционными аргументами
#[derive(Clone)]
pub struct MethodMember {
    name: String,
    params: Vec<ValueKind>,
    invoker: Invoker,
}

impl MethodMember {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ValueKind] {
        &self.params
    }

    pub fn invoke(&self, target: &mut dyn Reflect, args: &[MemberValue]) -> Result<(), String> {
        if args.len() != self.params.len() {
            return Err(format!(
                "expected {} argument(s), got {}",
                self.params.len(),
                args.len()
            ));
        }
        (self.invoker)(target, args)
    }
}

impl std::fmt::Debug for MethodMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodMember")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

/// Type data: таблица свойств и методов одного типа `T`
///
/// Порядок регистрации = порядок, в котором их видит discovery.
#[derive(Clone, Default, Debug)]
pub struct ReflectMembers {
    properties: Vec<PropertyMember>,
    methods: Vec<MethodMember>,
}

impl ReflectMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn properties(&self) -> &[PropertyMember] {
        &self.properties
    }

    pub fn methods(&self) -> &[MethodMember] {
        &self.methods
    }

    /// Read-only свойство
    pub fn getter<T, V>(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Self
    where
        T: Reflect,
        V: NumericValue,
    {
        self.properties.push(PropertyMember {
            name: name.into(),
            kind: V::KIND,
            getter: Some(Self::wrap_getter(get)),
            setter: None,
        });
        self
    }

    /// Read/write свойство
    pub fn property<T, V>(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        T: Reflect,
        V: NumericValue,
    {
        let setter: Setter = Arc::new(move |target: &mut dyn Reflect, value: f32| {
            let target = target
                .downcast_mut::<T>()
                .ok_or_else(|| "receiver type mismatch".to_string())?;
            set(target, V::from_f32(value));
            Ok(())
        });

        self.properties.push(PropertyMember {
            name: name.into(),
            kind: V::KIND,
            getter: Some(Self::wrap_getter(get)),
            setter: Some(setter),
        });
        self
    }

    /// Произвольный метод; `params` описывает типы аргументов
    pub fn method<T>(
        mut self,
        name: impl Into<String>,
        params: &[ValueKind],
        call: impl Fn(&mut T, &[MemberValue]) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self
    where
        T: Reflect,
    {
        let invoker: Invoker = Arc::new(move |target: &mut dyn Reflect, args: &[MemberValue]| {
            let target = target
                .downcast_mut::<T>()
                .ok_or_else(|| "receiver type mismatch".to_string())?;
            call(target, args)
        });

        self.methods.push(MethodMember {
            name: name.into(),
            params: params.to_vec(),
            invoker,
        });
        self
    }

    fn wrap_getter<T, V>(get: impl Fn(&T) -> V + Send + Sync + 'static) -> Getter
    where
        T: Reflect,
        V: NumericValue,
    {
        Arc::new(move |target: &dyn Reflect| target.downcast_ref::<T>().map(|t| get(t).into_value()))
    }
}

/// Регистрация `ReflectMembers` для типа хоста
pub trait RegisterMembersExt {
    fn register_members<T: GetTypeRegistration>(&mut self, members: ReflectMembers) -> &mut Self;
}

impl RegisterMembersExt for App {
    fn register_members<T: GetTypeRegistration>(&mut self, members: ReflectMembers) -> &mut Self {
        self.register_type::<T>();

        let registry = self.world().resource::<AppTypeRegistry>().clone();
        {
            let mut registry = registry.write();
            if let Some(registration) = registry.get_mut(TypeId::of::<T>()) {
                registration.insert(members);
            }
        }

        self
    }
}
