//! Optional request parameters that are left out of the payload when unset.
//!
//! Request parameter structs use [`Omit<T>`] for every optional field together with
//! `#[serde(skip_serializing_if = "Omit::is_not_given")]`. An unset field never
//! reaches the wire, so an explicit `temperature: 0.0` and "no temperature" stay distinct.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A request parameter that is either explicitly provided or not given at all.
///
/// # Examples
///
/// ```
/// use openai_core::Omit;
///
/// let unset: Omit<f32> = Omit::default();
/// assert!(unset.is_not_given());
///
/// let zero = Omit::from(0.0_f32);
/// assert_eq!(zero.get(), Some(&0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Omit<T> {
    /// The caller never set this parameter.
    #[default]
    NotGiven,
    /// The caller set this parameter to the contained value.
    Given(T),
}

impl<T> Omit<T> {
    /// Builds an `Omit` from an `Option`, treating `None` as not given.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Omit::Given(value),
            None => Omit::NotGiven,
        }
    }

    /// Returns `true` if a value was provided.
    pub fn is_given(&self) -> bool {
        matches!(self, Omit::Given(_))
    }

    /// Returns `true` if no value was provided.
    ///
    /// This is the predicate used by `skip_serializing_if`.
    pub fn is_not_given(&self) -> bool {
        !self.is_given()
    }

    /// Returns a reference to the provided value, if any.
    pub fn get(&self) -> Option<&T> {
        match self {
            Omit::Given(value) => Some(value),
            Omit::NotGiven => None,
        }
    }

    /// Converts into an `Option`, dropping the distinction from a plain `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Omit::Given(value) => Some(value),
            Omit::NotGiven => None,
        }
    }

    /// Returns the provided value or `default`.
    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    /// Borrows the contents as `Omit<&T>`.
    pub fn as_ref(&self) -> Omit<&T> {
        match self {
            Omit::Given(value) => Omit::Given(value),
            Omit::NotGiven => Omit::NotGiven,
        }
    }

    /// Replaces the contents with `value`, marking it as given.
    pub fn set(&mut self, value: T) {
        *self = Omit::Given(value);
    }

    /// Applies `f` to the value, starting from `T::default()` if not given, and marks it given.
    pub fn updated(self, f: impl FnOnce(&mut T)) -> Self
    where
        T: Default,
    {
        let mut value = self.into_option().unwrap_or_default();
        f(&mut value);
        Omit::Given(value)
    }
}

impl<T> From<T> for Omit<T> {
    fn from(value: T) -> Self {
        Omit::Given(value)
    }
}

impl<T: Serialize> Serialize for Omit<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Omit::Given(value) => value.serialize(serializer),
            // Only reachable when a field forgot `skip_serializing_if`.
            Omit::NotGiven => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Omit<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An explicit `null` from the server reads the same as a missing field.
        Option::<T>::deserialize(deserializer).map(Omit::from_option)
    }
}
