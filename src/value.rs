//! The closed set of value kinds an argument can hold.

use std::fmt;
use std::str::FromStr;

/// Message used when a matched argument needs a value but none follows it.
const MISSING_VALUE: &str = "missing value for argument.";

/// The outcome of converting a raw token into a slot's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// The value was updated without using the following token.
    ///
    /// Booleans toggle and characters peek at the token without taking it.
    Unused,
    /// The following token was used as the value.
    Consumed,
    /// The following token could not be converted.
    Failed(Box<str>),
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive type which can be declared as an argument.
///
/// This is sealed and implemented for [String], the fixed width integers,
/// [f32], [f64], [bool] and [char].
pub trait ArgType: Clone + fmt::Debug + 'static + sealed::Sealed {
    /// The kind tag for this type.
    const KIND: Kind;

    /// Wrap the value in its [Value] variant.
    fn into_value(self) -> Value;

    /// Borrow the value out of a [Value], if it holds this type.
    fn from_value(value: &Value) -> Option<&Self>;
}

macro_rules! kinds {
    ($($variant:ident($ty:ty) => $name:literal, $conv:ident;)*) => {
        /// Runtime tag identifying the type held by a slot.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Kind {
            $(
                #[doc = concat!("The `", $name, "` type.")]
                $variant,
            )*
        }

        impl Kind {
            /// The Rust name of the type this kind stands for.
            pub fn name(self) -> &'static str {
                match self {
                    $(Kind::$variant => $name,)*
                }
            }
        }

        /// A value of one of the supported argument types.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Value {
            $(
                #[doc = concat!("A `", $name, "` value.")]
                $variant($ty),
            )*
        }

        impl Value {
            /// The kind of this value.
            pub fn kind(&self) -> Kind {
                match self {
                    $(Value::$variant(..) => Kind::$variant,)*
                }
            }

            /// Update the value from the token following a matched name.
            ///
            /// `raw` is `None` when the name was the last token.
            pub(crate) fn convert(&mut self, raw: Option<&str>) -> Conversion {
                match self {
                    $(Value::$variant(value) => $conv(value, raw),)*
                }
            }
        }

        $(
            impl sealed::Sealed for $ty {}

            impl ArgType for $ty {
                const KIND: Kind = Kind::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Option<&Self> {
                    match value {
                        Value::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

kinds! {
    Str(String) => "String", string;
    I8(i8) => "i8", signed;
    I16(i16) => "i16", signed;
    I32(i32) => "i32", signed;
    I64(i64) => "i64", signed;
    Isize(isize) => "isize", signed;
    U8(u8) => "u8", unsigned;
    U16(u16) => "u16", unsigned;
    U32(u32) => "u32", unsigned;
    U64(u64) => "u64", unsigned;
    Usize(usize) => "usize", unsigned;
    F32(f32) => "f32", number;
    F64(f64) => "f64", number;
    Bool(bool) => "bool", toggle;
    Char(char) => "char", first_char;
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn string(value: &mut String, raw: Option<&str>) -> Conversion {
    match raw {
        Some(raw) => {
            *value = raw.to_owned();
            Conversion::Consumed
        }
        None => Conversion::Failed(MISSING_VALUE.into()),
    }
}

fn signed<T: FromStr>(value: &mut T, raw: Option<&str>) -> Conversion {
    strict(value, raw, "an integer")
}

fn unsigned<T: FromStr>(value: &mut T, raw: Option<&str>) -> Conversion {
    strict(value, raw, "a positive integer")
}

fn number<T: FromStr>(value: &mut T, raw: Option<&str>) -> Conversion {
    strict(value, raw, "a number")
}

/// Whole-string conversion. The stored value is left untouched on failure.
fn strict<T: FromStr>(value: &mut T, raw: Option<&str>, expected: &str) -> Conversion {
    let raw = match raw {
        Some(raw) => raw,
        None => return Conversion::Failed(MISSING_VALUE.into()),
    };

    match raw.parse() {
        Ok(parsed) => {
            *value = parsed;
            Conversion::Consumed
        }
        Err(..) => Conversion::Failed(format!("\"{}\" is not {}.", raw, expected).into()),
    }
}

fn toggle(value: &mut bool, _: Option<&str>) -> Conversion {
    *value = !*value;
    Conversion::Unused
}

fn first_char(value: &mut char, raw: Option<&str>) -> Conversion {
    match raw {
        Some(raw) => {
            *value = raw.chars().next().unwrap_or('\0');
            Conversion::Unused
        }
        None => Conversion::Failed(MISSING_VALUE.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ArgType, Conversion, Kind, Value};
    use rstest::rstest;

    fn failed(message: &str) -> Conversion {
        Conversion::Failed(message.into())
    }

    #[rstest]
    #[case(0i32.into_value(), "42", Value::I32(42))]
    #[case(0i32.into_value(), "-42", Value::I32(-42))]
    #[case(0i64.into_value(), "-9000000000", Value::I64(-9_000_000_000))]
    #[case(0u8.into_value(), "255", Value::U8(255))]
    #[case(0usize.into_value(), "+7", Value::Usize(7))]
    #[case(0f32.into_value(), "1.5", Value::F32(1.5))]
    #[case(0f64.into_value(), "-2.5e3", Value::F64(-2500.0))]
    #[case(String::new().into_value(), "hello world", Value::Str("hello world".into()))]
    #[case(String::new().into_value(), "", Value::Str(String::new()))]
    fn consumes_valid_literals(#[case] mut value: Value, #[case] raw: &str, #[case] expected: Value) {
        assert_eq!(value.convert(Some(raw)), Conversion::Consumed);
        assert_eq!(value, expected);
    }

    #[rstest]
    #[case(5i32.into_value(), "12abc", "\"12abc\" is not an integer.")]
    #[case(5i64.into_value(), "", "\"\" is not an integer.")]
    #[case(5i8.into_value(), "128", "\"128\" is not an integer.")]
    #[case(5u32.into_value(), "-3", "\"-3\" is not a positive integer.")]
    #[case(5u64.into_value(), " 3", "\" 3\" is not a positive integer.")]
    #[case(5f32.into_value(), "1.5x", "\"1.5x\" is not a number.")]
    #[case(5f64.into_value(), "abc", "\"abc\" is not a number.")]
    fn rejects_trailing_garbage(#[case] mut value: Value, #[case] raw: &str, #[case] message: &str) {
        let before = value.clone();
        assert_eq!(value.convert(Some(raw)), failed(message));
        assert_eq!(value, before);
    }

    #[test]
    fn bool_toggles_without_consuming() {
        let mut value = false.into_value();
        assert_eq!(value.convert(Some("ignored")), Conversion::Unused);
        assert_eq!(value, Value::Bool(true));
        assert_eq!(value.convert(None), Conversion::Unused);
        assert_eq!(value, Value::Bool(false));
    }

    #[test]
    fn char_takes_first_character_only() {
        let mut value = 'a'.into_value();
        assert_eq!(value.convert(Some("xyz")), Conversion::Unused);
        assert_eq!(value, Value::Char('x'));
        assert_eq!(value.convert(Some("")), Conversion::Unused);
        assert_eq!(value, Value::Char('\0'));
    }

    #[rstest]
    #[case(String::new().into_value())]
    #[case(1u16.into_value())]
    #[case(1.0f64.into_value())]
    #[case('c'.into_value())]
    fn missing_value_fails(#[case] mut value: Value) {
        assert_eq!(value.convert(None), failed("missing value for argument."));
    }

    #[test]
    fn kinds() {
        assert_eq!(<u32 as ArgType>::KIND, Kind::U32);
        assert_eq!(Value::Str(String::new()).kind(), Kind::Str);
        assert_eq!(Kind::Str.name(), "String");
        assert_eq!(<bool as ArgType>::from_value(&Value::Bool(true)), Some(&true));
        assert_eq!(<i32 as ArgType>::from_value(&Value::Bool(true)), None);
    }
}
