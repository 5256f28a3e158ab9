//! The [`Record`] trait and string coercion for attribute write-back.

use formwork_core::{FormError, FormResult};

use crate::schema::AttributeSpec;

/// A structured type whose annotated attributes back a form.
///
/// Usually implemented with `#[derive(Record)]`:
///
/// ```ignore
/// #[derive(Default, Record)]
/// struct Signup {
///     #[form(name = "username", rules = "required,min=3")]
///     username: String,
///     #[form(name = "age")]
///     age: u32,
///     #[form(name = "-")]
///     internal_id: u64,
/// }
/// ```
///
/// Implementing it by hand means providing the attribute table and the
/// write-back for every non-excluded attribute.
pub trait Record: 'static {
    /// The annotated attributes, in declaration order.
    fn attributes() -> &'static [AttributeSpec];

    /// Writes a submitted string into the attribute identified by `ident`,
    /// coercing it to the attribute's type.
    fn assign(&mut self, ident: &str, value: &str) -> FormResult<()>;
}

/// Conversion from a submitted string into an attribute value.
pub trait FromFormValue: Sized {
    /// Converts `value`; `attribute` names the target for error reporting.
    fn from_form_value(attribute: &str, value: &str) -> FormResult<Self>;
}

fn coercion_error(attribute: &str, value: &str, expected: &'static str) -> FormError {
    FormError::Coercion {
        attribute: attribute.to_string(),
        value: value.to_string(),
        expected,
    }
}

impl FromFormValue for String {
    fn from_form_value(_attribute: &str, value: &str) -> FormResult<Self> {
        Ok(value.to_string())
    }
}

impl FromFormValue for char {
    fn from_form_value(attribute: &str, value: &str) -> FormResult<Self> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(coercion_error(attribute, value, "character")),
        }
    }
}

/// Checkbox semantics: an unchecked box submits nothing, so empty is `false`.
impl FromFormValue for bool {
    fn from_form_value(attribute: &str, value: &str) -> FormResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "off" | "0" | "no" => Ok(false),
            "true" | "on" | "1" | "yes" => Ok(true),
            _ => Err(coercion_error(attribute, value, "boolean")),
        }
    }
}

macro_rules! impl_from_form_value {
    ($expected:literal => $($ty:ty),+) => {
        $(
            impl FromFormValue for $ty {
                fn from_form_value(attribute: &str, value: &str) -> FormResult<Self> {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| coercion_error(attribute, value, $expected))
                }
            }
        )+
    };
}

impl_from_form_value!("integer" => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_from_form_value!("float" => f32, f64);

/// An empty submission leaves an optional attribute unset.
impl<T: FromFormValue> FromFormValue for Option<T> {
    fn from_form_value(attribute: &str, value: &str) -> FormResult<Self> {
        if value.is_empty() {
            Ok(None)
        } else {
            T::from_form_value(attribute, value).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string() {
        assert_eq!(String::from_form_value("a", " x ").unwrap(), " x ");
    }

    #[test]
    fn test_integer() {
        assert_eq!(i64::from_form_value("age", " 42 ").unwrap(), 42);
        let err = u8::from_form_value("age", "300").unwrap_err();
        match err {
            FormError::Coercion {
                attribute,
                value,
                expected,
            } => {
                assert_eq!(attribute, "age");
                assert_eq!(value, "300");
                assert_eq!(expected, "integer");
            }
            other => panic!("Expected coercion error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_integer_is_error() {
        assert!(i32::from_form_value("age", "").is_err());
    }

    #[test]
    fn test_float() {
        let v = f64::from_form_value("price", "9.5").unwrap();
        assert!((v - 9.5).abs() < f64::EPSILON);
        assert!(f32::from_form_value("price", "cheap").is_err());
    }

    #[test]
    fn test_bool() {
        assert!(bool::from_form_value("b", "on").unwrap());
        assert!(bool::from_form_value("b", "TRUE").unwrap());
        assert!(!bool::from_form_value("b", "").unwrap());
        assert!(!bool::from_form_value("b", "off").unwrap());
        assert!(bool::from_form_value("b", "maybe").is_err());
    }

    #[test]
    fn test_char() {
        assert_eq!(char::from_form_value("c", "é").unwrap(), 'é');
        assert!(char::from_form_value("c", "ab").is_err());
        assert!(char::from_form_value("c", "").is_err());
    }

    #[test]
    fn test_option() {
        assert_eq!(Option::<u32>::from_form_value("n", "").unwrap(), None);
        assert_eq!(Option::<u32>::from_form_value("n", "7").unwrap(), Some(7));
        assert!(Option::<u32>::from_form_value("n", "x").is_err());
    }
}
