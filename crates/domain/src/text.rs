//! Text and collection helpers used when deriving entities from configuration.

use serde_json::Value;

/// Letters outside ASCII that are kept in entity path segments.
pub const ACCENTED_LETTERS: [char; 7] = ['ä', 'ö', 'ü', 'Ä', 'Ö', 'Ü', 'ß'];

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ACCENTED_LETTERS.contains(&c) || matches!(c, '-' | '_' | '.')
}

/// Strip every character that cannot appear in an entity path segment.
///
/// Keeps ASCII letters, [`ACCENTED_LETTERS`], digits, `-`, `_` and `.`.
#[must_use]
pub fn sanitize_for_path(input: &str) -> String {
    input.chars().filter(|c| is_path_char(*c)).collect()
}

/// Whether a configured value carries nothing useful.
///
/// Missing values and `null` are empty. Anything else is serialized to JSON
/// and considered empty when only whitespace, quotes, brackets and commas
/// remain, so `[]`, `[""]` and `["", " "]` are empty while `["x"]`, `[0]` and
/// `[false]` are not.
#[must_use]
pub fn is_emptyish(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(value) => value
            .to_string()
            .chars()
            .all(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '[' | ']' | ',')),
    }
}

/// Truthiness as used by [`compact`].
///
/// `false`, zero, `NaN`, the empty string, `None` and JSON `null` are falsy.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for i64 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        // NaN compares false
        self.abs() > 0.0
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(|value| value.is_truthy())
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f.is_truthy()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// Drop every falsy element, keeping the order of the rest.
pub fn compact<T: Truthy>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    items.into_iter().filter(|item| item.is_truthy()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_keep_umlauts_and_hyphen_when_sanitizing() {
        assert_eq!(sanitize_for_path("Gästezimmer-PC!"), "Gästezimmer-PC");
    }

    #[test]
    fn should_strip_spaces_and_symbols_when_sanitizing() {
        assert_eq!(sanitize_for_path("Büro PC #2 (alt)"), "BüroPC2alt");
    }

    #[test]
    fn should_leave_clean_input_untouched() {
        let clean = "PC-John_2.local";
        assert_eq!(sanitize_for_path(clean), clean);
        assert_eq!(sanitize_for_path(&sanitize_for_path(clean)), clean);
    }

    #[test]
    fn should_treat_missing_and_null_as_empty() {
        assert!(is_emptyish(None));
        assert!(is_emptyish(Some(&Value::Null)));
    }

    #[test]
    fn should_treat_lists_of_blank_strings_as_empty() {
        assert!(is_emptyish(Some(&json!([]))));
        assert!(is_emptyish(Some(&json!([""]))));
        assert!(is_emptyish(Some(&json!(["", ""]))));
        assert!(is_emptyish(Some(&json!(["  ", "'"]))));
        assert!(is_emptyish(Some(&json!(""))));
    }

    #[test]
    fn should_not_treat_lists_with_content_as_empty() {
        assert!(!is_emptyish(Some(&json!(["x"]))));
        assert!(!is_emptyish(Some(&json!([0]))));
        assert!(!is_emptyish(Some(&json!([false]))));
        assert!(!is_emptyish(Some(&json!({}))));
    }

    #[test]
    fn should_remove_falsy_values_and_keep_order() {
        let items = vec![
            json!("a"),
            json!(""),
            json!(0),
            json!("b"),
            json!(false),
            json!("c"),
            Value::Null,
        ];
        assert_eq!(compact(items), vec![json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn should_compact_string_slices() {
        let own = ["m_hibernate", "", "m_sleep", ""];
        assert_eq!(compact(own), vec!["m_hibernate", "m_sleep"]);
    }

    #[test]
    fn should_treat_nan_and_zero_as_falsy() {
        assert!(!f64::NAN.is_truthy());
        assert!(!0.0_f64.is_truthy());
        assert!(!(-0.0_f64).is_truthy());
        assert!(1.5_f64.is_truthy());
        assert_eq!(compact([Some(1_i64), None, Some(0), Some(3)]), vec![Some(1), Some(3)]);
    }
}
