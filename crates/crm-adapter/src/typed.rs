//! Compile-time narrowed accessors: one `CrmObject` type per object-type key.

use crate::{AdapterError, ObjectAccessor, UpdateAck};
use crm_types::{AssociationPage, CrmBackend, PropertyBag, PropertyWithHistory, OBJECT_ID_PROPERTY};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Property name of a particular object type; usually a fieldless enum.
pub trait PropertyName: Copy + Eq + Send + Sync + 'static {
    fn name(&self) -> &'static str;
}

/// Object type known at compile time. `TYPE_NAME` must be a key of the object-type registry.
pub trait CrmObject: Send + Sync + 'static {
    const TYPE_NAME: &'static str;
    type Property: PropertyName;
}

/// Declare a `CrmObject` and its property enum.
///
/// ```
/// crm_adapter::crm_object! {
///     /// Custom object from a portal.
///     pub Pet("pet") => PetProperty {
///         Name = "pet_name",
///         Species = "species",
///     }
/// }
///
/// use crm_adapter::{CrmObject, PropertyName};
/// assert_eq!(Pet::TYPE_NAME, "pet");
/// assert_eq!(PetProperty::Species.name(), "species");
/// assert_eq!(PetProperty::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! crm_object {
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident($type_name:literal) => $prop:ident {
            $( $(#[$pmeta:meta])* $variant:ident = $field:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $prop {
            $( $(#[$pmeta])* $variant, )+
        }

        impl $prop {
            pub const ALL: &'static [$prop] = &[$( $prop::$variant ),+];
        }

        impl $crate::PropertyName for $prop {
            fn name(&self) -> &'static str {
                match self {
                    $( $prop::$variant => $field, )+
                }
            }
        }

        impl $crate::CrmObject for $name {
            const TYPE_NAME: &'static str = $type_name;
            type Property = $prop;
        }
    };
}

/// Property values of one `T` record.
pub struct Record<T> {
    properties: PropertyBag,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CrmObject> Record<T> {
    fn new(properties: PropertyBag) -> Self {
        Self {
            properties,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, property: T::Property) -> Option<&str> {
        self.properties.get(property.name()).map(String::as_str)
    }

    /// `hs_object_id`, when present.
    pub fn id(&self) -> Option<&str> {
        self.properties.get(OBJECT_ID_PROPERTY).map(String::as_str)
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn into_properties(self) -> PropertyBag {
        self.properties
    }
}

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        Self {
            properties: self.properties.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Record").field(&self.properties).finish()
    }
}

/// Property values to create or update a `T` with.
pub struct Draft<T> {
    properties: PropertyBag,
    _marker: PhantomData<fn() -> T>,
}

impl<T: CrmObject> Draft<T> {
    pub fn new() -> Self {
        Self {
            properties: PropertyBag::new(),
            _marker: PhantomData,
        }
    }

    pub fn set(mut self, property: T::Property, value: impl Into<String>) -> Self {
        self.properties
            .insert(property.name().to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }
}

impl<T: CrmObject> Default for Draft<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed view over an `ObjectAccessor` for `T`.
pub struct TypedObject<'a, B, T> {
    inner: ObjectAccessor<'a, B>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, B: CrmBackend, T: CrmObject> TypedObject<'a, B, T> {
    pub(crate) fn new(inner: ObjectAccessor<'a, B>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    pub fn untyped(&self) -> &ObjectAccessor<'a, B> {
        &self.inner
    }

    pub async fn get(
        &self,
        object_id: &str,
        properties: &[T::Property],
    ) -> Result<Record<T>, AdapterError> {
        let names = names(properties);
        Ok(Record::new(self.inner.get(object_id, &names).await?))
    }

    pub async fn get_with_history(
        &self,
        object_id: &str,
        properties: &[T::Property],
    ) -> Result<BTreeMap<String, PropertyWithHistory>, AdapterError> {
        self.inner.get_with_history(object_id, &names(properties)).await
    }

    /// Returns the echoed draft properties plus `hs_object_id`.
    pub async fn create(&self, draft: Draft<T>) -> Result<Record<T>, AdapterError> {
        Ok(Record::new(self.inner.create(&draft.properties).await?))
    }

    pub async fn update(&self, object_id: &str, draft: Draft<T>) -> Result<UpdateAck, AdapterError> {
        self.inner.update(object_id, &draft.properties).await
    }

    pub async fn list_associations<U: CrmObject>(
        &self,
        from_id: &str,
    ) -> Result<AssociationPage, AdapterError> {
        self.inner.list_associations(from_id, U::TYPE_NAME).await
    }

    pub async fn associate<U: CrmObject>(
        &self,
        from_id: &str,
        to_id: &str,
        label: &str,
    ) -> Result<(), AdapterError> {
        self.inner.associate(from_id, to_id, U::TYPE_NAME, label).await
    }
}

fn names<P: PropertyName>(properties: &[P]) -> Vec<&'static str> {
    properties.iter().map(PropertyName::name).collect()
}
