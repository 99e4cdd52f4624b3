//! Present/absent wrapper for partial-update fields.

use serde::{Deserialize, Deserializer};

/// One field of a partial update.
///
/// `Keep` leaves the stored value untouched. `Set` overwrites it. For nullable
/// columns use `Patch<Option<T>>`: `Set(None)` clears the column.
///
/// With serde, put `#[serde(default)]` on the field: a missing key becomes
/// `Keep`, an explicit `null` on `Patch<Option<T>>` becomes `Set(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Borrows the new value, if one was provided.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

#[cfg(test)]
mod tests {
    use super::Patch;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct RenameBody {
        #[serde(default)]
        name: Patch<String>,
        #[serde(default)]
        parent: Patch<Option<i64>>,
    }

    #[test]
    fn missing_key_is_keep() {
        let body: RenameBody = serde_json::from_str("{}").unwrap();
        assert!(body.name.is_keep());
        assert!(body.parent.is_keep());
    }

    #[test]
    fn explicit_null_on_nullable_field_clears() {
        let body: RenameBody = serde_json::from_str(r#"{"parent": null}"#).unwrap();
        assert_eq!(body.parent, Patch::Set(None));
        assert!(body.name.is_keep());
    }

    #[test]
    fn value_is_set() {
        let body: RenameBody = serde_json::from_str(r#"{"name": "x", "parent": 4}"#).unwrap();
        assert_eq!(body.name.as_set().map(String::as_str), Some("x"));
        assert_eq!(body.parent, Patch::Set(Some(4)));
    }

    #[test]
    fn explicit_null_on_required_field_is_rejected() {
        let result = serde_json::from_str::<RenameBody>(r#"{"name": null}"#);
        assert!(result.is_err());
    }
}
