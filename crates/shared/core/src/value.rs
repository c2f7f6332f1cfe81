use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::fmt::Write as _;

/// A value bound to a placeholder.
///
/// Scalars render through their natural `Display`. Lists render as
/// `[a, b, c]` with each element in its [`Value::repr`] form, so string
/// elements are quoted and the boundaries of each element stay visible in
/// the message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value, rendered as `None`.
    Unit,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(Cow<'static, str>),
    List(Vec<Self>),
    /// Text captured from an arbitrary `Display` (or `Debug`) type.
    Display(String),
}

impl Value {
    /// Captures any `Display` type by its rendered text.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Self::Display(value.to_string())
    }

    /// Captures any `Debug` type by its debug representation.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::Display(format!("{value:?}"))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Display(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            Self::UInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::UInt(v) => Some(v),
            Self::Int(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Quoted representation, as used for list elements and the `!r` conversion.
    ///
    /// Strings and chars are quoted with `'` (or `"` when the text contains
    /// `'` but no `"`), with backslashes, the quote and control characters
    /// escaped. Floats keep their fractional part (`1.0`). Captured
    /// `Display` text is already a representation and is left as is.
    #[must_use]
    pub fn repr(&self) -> String {
        struct Repr<'a>(&'a Value);

        impl fmt::Display for Repr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_repr(f)
            }
        }

        Repr(self).to_string()
    }

    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write_quoted(s, f),
            Self::Char(c) => write_quoted(c.encode_utf8(&mut [0; 4]), f),
            Self::Float(v) => write!(f, "{v:?}"),
            other => fmt::Display::fmt(other, f),
        }
    }
}

fn write_quoted(text: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };

    f.write_char(quote)?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if c.is_control() => write!(f, "\\x{:02x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("None"),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::UInt(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
            Self::Str(v) => f.write_str(v),
            Self::Display(v) => f.write_str(v),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_repr(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

// --- Conversions ---

macro_rules! impl_from_lossless {
    ($variant:ident($target:ty): $($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Self::$variant(<$target>::from(v))
                }
            }
        )*
    };
}

impl_from_lossless!(Int(i64): i8, i16, i32, i64);
impl_from_lossless!(UInt(u64): u8, u16, u32, u64);
impl_from_lossless!(Float(f64): f64);

macro_rules! impl_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Self::Display(v.to_string())
                }
            }
        )*
    };
}

// f32 widening would leak binary noise into the message (0.1 -> 0.100000001...).
impl_from_display!(f32, i128, u128);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        i64::try_from(v).map_or_else(|_| Self::Display(v.to_string()), Self::Int)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        u64::try_from(v).map_or_else(|_| Self::Display(v.to_string()), Self::UInt)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    #[inline]
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<()> for Value {
    #[inline]
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Cow::Owned(v.to_owned()))
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Str(Cow::Owned(v.clone()))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(v: String) -> Self {
        Self::Str(Cow::Owned(v))
    }
}

impl From<Cow<'static, str>> for Value {
    #[inline]
    fn from(v: Cow<'static, str>) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Unit, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Self>> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Self::List(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
