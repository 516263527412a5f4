//! Helpers for partial-update (`PATCH`) request bodies.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field of a patch body.
///
/// Used with `#[serde(default, deserialize_with = "double_option")]`:
///
/// - field absent: `None` (leave unchanged)
/// - field `null`: `Some(None)` (clear)
/// - field present: `Some(Some(value))` (set)
///
/// # Errors
///
/// Returns the inner deserializer's error if the value has the wrong type.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrite `target` when the patch carries a value.
pub fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "double_option")]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_absent_and_null() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.note, None);

        let null: Body = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(null.note, Some(None));

        let set: Body = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(set.note, Some(Some("hi".to_owned())));
    }

    #[test]
    fn test_apply_only_overwrites_present_values() {
        let mut value = 3;
        apply(&mut value, None);
        assert_eq!(value, 3);
        apply(&mut value, Some(5));
        assert_eq!(value, 5);
    }
}
