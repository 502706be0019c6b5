// File: src/model.rs
// Purpose: Model type identity, declared property shapes, and the complex-type classifier

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A data-model type whose properties can carry validation rules.
///
/// This replaces runtime reflection: the model lists its own properties
/// together with their declared shapes.
///
/// # Example
///
/// ```ignore
/// struct Address { street: String }
///
/// impl Model for Address {
///     fn properties() -> Vec<Property> {
///         vec![Property::of::<String>("Street")]
///     }
/// }
/// ```
pub trait Model: 'static {
    /// All properties of the model, in declaration order
    fn properties() -> Vec<Property>;
}

/// Identity of a model type. Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct ModelType {
    id: TypeId,
    name: &'static str,
    properties: fn() -> Vec<Property>,
}

impl ModelType {
    /// Identity for a concrete model type
    pub fn of<T: Model>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            properties: T::properties,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without the module path
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    /// Declared properties of the model
    pub fn properties(&self) -> Vec<Property> {
        (self.properties)()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelType").field(&self.name).finish()
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A single declared property of a model
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub shape: TypeShape,
}

impl Property {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Property whose shape is derived from a Rust type
    pub fn of<F: FieldType>(name: impl Into<String>) -> Self {
        Self::new(name, F::shape())
    }

    /// Property holding a nested model
    pub fn model<M: Model>(name: impl Into<String>) -> Self {
        Self::new(name, TypeShape::Object(ModelType::of::<M>()))
    }

    /// Property holding an optional nested model
    pub fn optional_model<M: Model>(name: impl Into<String>) -> Self {
        Self::new(
            name,
            TypeShape::Optional(Box::new(TypeShape::Object(ModelType::of::<M>()))),
        )
    }

    pub fn is_complex(&self) -> bool {
        is_complex(&self.shape)
    }
}

/// Declared type of a property
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Bool,
    Integer,
    Float,
    Decimal,
    Text,
    Char,
    DateTime,
    Uuid,
    Enum,
    Optional(Box<TypeShape>),
    Collection(Box<TypeShape>),
    Object(ModelType),
}

impl TypeShape {
    /// Model type behind this shape, looking through optional wrappers
    pub fn model_type(&self) -> Option<ModelType> {
        match self {
            TypeShape::Object(model) => Some(*model),
            TypeShape::Optional(inner) => inner.model_type(),
            _ => None,
        }
    }
}

/// Whether a declared type needs recursive expansion.
///
/// Scalars, text, dates, identifiers, decimals, enums, collections and
/// optional wrappers of any of those are leaves. Only nested models
/// (directly or behind `Optional`) are complex.
pub fn is_complex(shape: &TypeShape) -> bool {
    match shape {
        TypeShape::Object(_) => true,
        TypeShape::Optional(inner) => is_complex(inner),
        TypeShape::Collection(_) => false,
        TypeShape::Bool
        | TypeShape::Integer
        | TypeShape::Float
        | TypeShape::Decimal
        | TypeShape::Text
        | TypeShape::Char
        | TypeShape::DateTime
        | TypeShape::Uuid
        | TypeShape::Enum => false,
    }
}

/// Maps a Rust type onto its declared [`TypeShape`]
pub trait FieldType {
    fn shape() -> TypeShape;
}

macro_rules! leaf_field_type {
    ($shape:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl FieldType for $ty {
                fn shape() -> TypeShape {
                    TypeShape::$shape
                }
            }
        )+
    };
}

leaf_field_type!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
leaf_field_type!(Float => f32, f64);
leaf_field_type!(Text => String, &'static str);
leaf_field_type!(Bool => bool);
leaf_field_type!(Char => char);
leaf_field_type!(Uuid => uuid::Uuid);
leaf_field_type!(DateTime =>
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::FixedOffset>,
    chrono::DateTime<chrono::Local>,
    std::time::Duration,
);

impl<T: FieldType> FieldType for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::Optional(Box::new(T::shape()))
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(T::shape()))
    }
}

impl<T: FieldType> FieldType for [T] {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(T::shape()))
    }
}

impl<T: FieldType, const N: usize> FieldType for [T; N] {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(T::shape()))
    }
}

impl<T: FieldType> FieldType for HashSet<T> {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(T::shape()))
    }
}

impl<T: FieldType> FieldType for BTreeSet<T> {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(T::shape()))
    }
}

impl<K, V: FieldType> FieldType for HashMap<K, V> {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(V::shape()))
    }
}

impl<K, V: FieldType> FieldType for BTreeMap<K, V> {
    fn shape() -> TypeShape {
        TypeShape::Collection(Box::new(V::shape()))
    }
}
