//! Conversions and format specifiers applied to a substituted value.
//!
//! After the field name a placeholder may carry
//! `[!conversion][:[[fill]align][sign][#][0][width][.precision][type]]`:
//!
//! * conversion: `s` (display, the default) or `r` (see [`Value::repr`])
//! * align: `<` left, `>` right, `^` center, `=` padding after the sign
//! * sign: `+`, `-` or a space, numbers only
//! * `#` adds `0x`/`0o`/`0b` to hex, octal and binary output
//! * `0` pads numbers with zeros after the sign
//! * precision: digits after the point for numbers, maximum length for text
//! * type: `s`, `?` (same as `!r`), `d`, `x`, `X`, `o`, `b`, `e`, `E`, `f`, `F` or `%`
//!
//! Text is left-aligned and numbers right-aligned unless an alignment is given.

use crate::value::Value;
use std::borrow::Cow;
use std::fmt::Write as _;

type FormatResult<T> = Result<T, Cow<'static, str>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Conversion {
    #[default]
    Display,
    Repr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

impl Align {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Self::Left),
            '>' => Some(Self::Right),
            '^' => Some(Self::Center),
            '=' => Some(Self::AfterSign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Space,
}

impl Sign {
    const fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Minus),
            '+' => Some(Self::Plus),
            ' ' => Some(Self::Space),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presentation {
    Text,
    Repr,
    Decimal,
    HexLower,
    HexUpper,
    Octal,
    Binary,
    ExpLower,
    ExpUpper,
    Fixed,
    FixedUpper,
    Percent,
}

impl Presentation {
    const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            's' => Self::Text,
            '?' => Self::Repr,
            'd' => Self::Decimal,
            'x' => Self::HexLower,
            'X' => Self::HexUpper,
            'o' => Self::Octal,
            'b' => Self::Binary,
            'e' => Self::ExpLower,
            'E' => Self::ExpUpper,
            'f' => Self::Fixed,
            'F' => Self::FixedUpper,
            '%' => Self::Percent,
            _ => return None,
        })
    }

    const fn is_integer(self) -> bool {
        matches!(self, Self::Decimal | Self::HexLower | Self::HexUpper | Self::Octal | Self::Binary)
    }

    const fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::Repr)
    }
}

/// How one placeholder writes its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FieldFormat {
    conversion: Conversion,
    fill: Option<char>,
    align: Option<Align>,
    sign: Option<Sign>,
    alternate: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    presentation: Option<Presentation>,
}

impl FieldFormat {
    /// Parses the text following the field name (`""`, `"!r"`, `":>8"`,
    /// `"!r:>8"`). Errors carry a byte offset into `text`.
    pub(crate) fn parse(text: &str) -> Result<Self, (usize, Cow<'static, str>)> {
        let mut format = Self::default();
        let mut rest = text;

        if let Some(after) = rest.strip_prefix('!') {
            let mut chars = after.chars();
            format.conversion = match chars.next() {
                Some('s') => Conversion::Display,
                Some('r') => Conversion::Repr,
                Some(c) => {
                    return Err((1, format!("unknown conversion {c:?}; expected 's' or 'r'").into()));
                }
                None => return Err((1, "expected a conversion after '!'".into())),
            };
            rest = chars.as_str();
            if !rest.is_empty() && !rest.starts_with(':') {
                return Err((2, "expected ':' or '}' after the conversion".into()));
            }
        }

        if let Some(body) = rest.strip_prefix(':') {
            let base = text.len() - body.len();
            format.parse_specifier(body).map_err(|(offset, reason)| (base + offset, reason))?;
        } else if !rest.is_empty() {
            return Err((0, "expected '!' or ':' after the field name".into()));
        }

        Ok(format)
    }

    fn parse_specifier(&mut self, body: &str) -> Result<(), (usize, Cow<'static, str>)> {
        let at = |rest: &str| body.len() - rest.len();
        let mut rest = body;

        let mut chars = rest.chars();
        let (first, second) = (chars.next(), chars.next());
        if let (Some(fill), Some(align)) = (first, second.and_then(Align::from_char)) {
            self.fill = Some(fill);
            self.align = Some(align);
            rest = &rest[fill.len_utf8() + 1..];
        } else if let Some(align) = first.and_then(Align::from_char) {
            self.align = Some(align);
            rest = &rest[1..];
        }

        if let Some(sign) = rest.chars().next().and_then(Sign::from_char) {
            self.sign = Some(sign);
            rest = &rest[1..];
        }
        if let Some(after) = rest.strip_prefix('#') {
            self.alternate = true;
            rest = after;
        }
        if let Some(after) = rest.strip_prefix('0') {
            self.zero = true;
            rest = after;
        }

        let (digits, after) = split_digits(rest);
        if !digits.is_empty() {
            self.width = parse_count(digits).map_err(|reason| (at(rest), reason))?;
        }
        rest = after;

        if let Some(after) = rest.strip_prefix('.') {
            let (digits, after_digits) = split_digits(after);
            if digits.is_empty() {
                return Err((at(after), "expected a precision after '.'".into()));
            }
            self.precision = Some(parse_count(digits).map_err(|reason| (at(after), reason))?);
            rest = after_digits;
        }

        if let Some(c) = rest.chars().next() {
            let presentation = Presentation::from_char(c)
                .ok_or_else(|| (at(rest), Cow::Owned(format!("unknown format type {c:?}"))))?;
            self.presentation = Some(presentation);
            rest = &rest[c.len_utf8()..];
        }
        if !rest.is_empty() {
            return Err((at(rest), "unexpected text after the format type".into()));
        }

        self.check().map_err(|reason| (0, reason))
    }

    /// Rejects combinations that can never format a value.
    fn check(&self) -> FormatResult<()> {
        let presentation = self.effective_presentation();
        if let Some(p) = presentation {
            if p.is_integer() && self.precision.is_some() {
                return Err("precision is not allowed with integer format types".into());
            }
            if p.is_textual() && (self.sign.is_some() || self.align == Some(Align::AfterSign)) {
                return Err("sign and '=' alignment apply to numbers only".into());
            }
        }
        if self.conversion == Conversion::Repr && self.presentation.is_some_and(|p| !p.is_textual())
        {
            return Err("'!r' produces text; numeric format types do not apply".into());
        }
        Ok(())
    }

    fn effective_presentation(&self) -> Option<Presentation> {
        match self.conversion {
            Conversion::Repr => Some(Presentation::Repr),
            Conversion::Display => self.presentation,
        }
    }

    /// Appends `value` to `out`.
    ///
    /// # Errors
    /// Returns the reason when the value's type does not fit the format type.
    pub(crate) fn write(&self, value: &Value, out: &mut String) -> FormatResult<()> {
        if *self == Self::default() {
            let _ = write!(out, "{value}");
            return Ok(());
        }

        match (self.effective_presentation(), value) {
            (Some(Presentation::Repr), _) => {
                self.pad_text(&self.truncate(value.repr()), out);
                Ok(())
            }
            (Some(Presentation::Text), _) => {
                self.pad_text(&self.truncate(value.to_string()), out);
                Ok(())
            }
            (None, Value::Int(_) | Value::UInt(_) | Value::Float(_)) | (Some(_), _) => {
                let number = self.number(value)?;
                self.pad_number(&number, out);
                Ok(())
            }
            (None, _) => {
                if self.sign.is_some() || self.align == Some(Align::AfterSign) {
                    return Err("sign and '=' alignment apply to numbers only".into());
                }
                self.pad_text(&self.truncate(value.to_string()), out);
                Ok(())
            }
        }
    }

    fn truncate(&self, text: String) -> String {
        match self.precision {
            Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
            _ => text,
        }
    }

    fn number(&self, value: &Value) -> FormatResult<Number> {
        let presentation = self.presentation;
        match (value, presentation) {
            (Value::Int(v), _) if presentation.is_none_or(Presentation::is_integer) => {
                self.integer(*v < 0, v.unsigned_abs())
            }
            (Value::UInt(v), _) if presentation.is_none_or(Presentation::is_integer) => {
                self.integer(false, *v)
            }
            (Value::Float(v), None) => Ok(self.float(*v, Presentation::Fixed, false)),
            (Value::Int(v), Some(p)) => Ok(self.float(int_to_f64(*v), p, true)),
            (Value::UInt(v), Some(p)) => Ok(self.float(uint_to_f64(*v), p, true)),
            (Value::Float(v), Some(p)) if !p.is_integer() => Ok(self.float(*v, p, true)),
            (other, Some(p)) => Err(format!(
                "format type '{}' does not apply to {}",
                presentation_char(p),
                describe(other)
            )
            .into()),
            (other, None) => Err(format!("{} is not a number", describe(other)).into()),
        }
    }

    fn integer(&self, negative: bool, magnitude: u64) -> FormatResult<Number> {
        if self.presentation.is_none() && self.precision.is_some() {
            return Err("precision is not allowed for integers".into());
        }
        let (digits, prefix) = match self.presentation {
            Some(Presentation::HexLower) => (format!("{magnitude:x}"), "0x"),
            Some(Presentation::HexUpper) => (format!("{magnitude:X}"), "0X"),
            Some(Presentation::Octal) => (format!("{magnitude:o}"), "0o"),
            Some(Presentation::Binary) => (format!("{magnitude:b}"), "0b"),
            _ => (magnitude.to_string(), ""),
        };
        let prefix = if self.alternate { prefix } else { "" };
        Ok(Number { negative, prefix, digits })
    }

    /// `explicit` is false when a float is formatted without a type: the
    /// precision, if any, counts decimals and the plain display is used otherwise.
    fn float(&self, value: f64, presentation: Presentation, explicit: bool) -> Number {
        let negative = value.is_sign_negative() && !value.is_nan();
        let magnitude = value.abs();
        let upper = matches!(presentation, Presentation::ExpUpper | Presentation::FixedUpper);

        let digits = if magnitude.is_nan() {
            "nan".to_owned()
        } else if magnitude.is_infinite() {
            "inf".to_owned()
        } else {
            let precision = self.precision.unwrap_or(6);
            match presentation {
                _ if !explicit => match self.precision {
                    Some(precision) => format!("{magnitude:.precision$}"),
                    None => magnitude.to_string(),
                },
                Presentation::ExpLower | Presentation::ExpUpper => {
                    exponent_notation(&format!("{magnitude:.precision$e}"))
                }
                Presentation::Percent => format!("{:.precision$}%", magnitude * 100.0),
                _ => format!("{magnitude:.precision$}"),
            }
        };

        let digits = if upper { digits.to_uppercase() } else { digits };
        Number { negative, prefix: "", digits }
    }

    fn pad_text(&self, text: &str, out: &mut String) {
        let fill = self.fill.unwrap_or(if self.zero { '0' } else { ' ' });
        let align = self.align.unwrap_or(Align::Left);
        self.pad(out, "", text, fill, align);
    }

    fn pad_number(&self, number: &Number, out: &mut String) {
        let sign = match (number.negative, self.sign) {
            (true, _) => "-",
            (false, Some(Sign::Plus)) => "+",
            (false, Some(Sign::Space)) => " ",
            (false, _) => "",
        };
        let lead = format!("{sign}{}", number.prefix);
        let (fill, align) = match (self.fill, self.align) {
            (None, None) if self.zero => ('0', Align::AfterSign),
            (fill, align) => (
                fill.unwrap_or(if self.zero { '0' } else { ' ' }),
                align.unwrap_or(Align::Right),
            ),
        };
        self.pad(out, &lead, &number.digits, fill, align);
    }

    fn pad(&self, out: &mut String, lead: &str, body: &str, fill: char, align: Align) {
        let len = lead.chars().count() + body.chars().count();
        let padding = self.width.saturating_sub(len);
        let fills = |out: &mut String, n: usize| out.extend(std::iter::repeat_n(fill, n));

        match align {
            Align::Left => {
                out.push_str(lead);
                out.push_str(body);
                fills(out, padding);
            }
            Align::Right => {
                fills(out, padding);
                out.push_str(lead);
                out.push_str(body);
            }
            Align::Center => {
                fills(out, padding / 2);
                out.push_str(lead);
                out.push_str(body);
                fills(out, padding - padding / 2);
            }
            Align::AfterSign => {
                out.push_str(lead);
                fills(out, padding);
                out.push_str(body);
            }
        }
    }
}

struct Number {
    negative: bool,
    prefix: &'static str,
    digits: String,
}

fn split_digits(text: &str) -> (&str, &str) {
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    text.split_at(end)
}

fn parse_count(digits: &str) -> FormatResult<usize> {
    digits.parse().map_err(|e| format!("invalid width or precision: {e}").into())
}

/// Rewrites Rust's `1.5e3` as `1.5e+03`.
fn exponent_notation(text: &str) -> String {
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) =
                exponent.strip_prefix('-').map_or(('+', exponent), |digits| ('-', digits));
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text.to_owned(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn int_to_f64(v: i64) -> f64 {
    v as f64
}

#[allow(clippy::cast_precision_loss)]
fn uint_to_f64(v: u64) -> f64 {
    v as f64
}

const fn presentation_char(p: Presentation) -> char {
    match p {
        Presentation::Text => 's',
        Presentation::Repr => '?',
        Presentation::Decimal => 'd',
        Presentation::HexLower => 'x',
        Presentation::HexUpper => 'X',
        Presentation::Octal => 'o',
        Presentation::Binary => 'b',
        Presentation::ExpLower => 'e',
        Presentation::ExpUpper => 'E',
        Presentation::Fixed => 'f',
        Presentation::FixedUpper => 'F',
        Presentation::Percent => '%',
    }
}

const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Unit => "None",
        Value::Bool(_) => "a bool",
        Value::Char(_) => "a char",
        Value::Int(_) | Value::UInt(_) => "an integer",
        Value::Float(_) => "a float",
        Value::Str(_) | Value::Display(_) => "text",
        Value::List(_) => "a list",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(format: &str, value: impl Into<Value>) -> Result<String, Cow<'static, str>> {
        let format = FieldFormat::parse(format).map_err(|(_, reason)| reason)?;
        let mut out = String::new();
        format.write(&value.into(), &mut out)?;
        Ok(out)
    }

    #[test]
    fn fill_align_and_width() {
        assert_eq!(fmt(":>6", "ab").unwrap(), "    ab");
        assert_eq!(fmt(":<6", "ab").unwrap(), "ab    ");
        assert_eq!(fmt(":^6", "ab").unwrap(), "  ab  ");
        assert_eq!(fmt(":*^7", "ab").unwrap(), "**ab***");
        assert_eq!(fmt(":6", "ab").unwrap(), "ab    ");
        assert_eq!(fmt(":4", 42_i32).unwrap(), "  42");
        assert_eq!(fmt(":1", "too long").unwrap(), "too long");
    }

    #[test]
    fn numbers_take_sign_and_zero_padding() {
        assert_eq!(fmt(":+d", 5_i32).unwrap(), "+5");
        assert_eq!(fmt(": d", 5_i32).unwrap(), " 5");
        assert_eq!(fmt(":05", -42_i32).unwrap(), "-0042");
        assert_eq!(fmt(":=+6", 42_u8).unwrap(), "+   42");
        assert_eq!(fmt(":0<4", 7_i32).unwrap(), "7000");
    }

    #[test]
    fn integer_bases() {
        assert_eq!(fmt(":x", 255_u32).unwrap(), "ff");
        assert_eq!(fmt(":#X", 255_u32).unwrap(), "0XFF");
        assert_eq!(fmt(":#o", 8_i32).unwrap(), "0o10");
        assert_eq!(fmt(":#010b", 5_i32).unwrap(), "0b00000101");
        assert_eq!(fmt(":x", -255_i64).unwrap(), "-ff");
    }

    #[test]
    fn floats_and_precision() {
        assert_eq!(fmt(":.2f", 3.14159_f64).unwrap(), "3.14");
        assert_eq!(fmt(":f", 1.5_f64).unwrap(), "1.500000");
        assert_eq!(fmt(":.1", 2.26_f64).unwrap(), "2.3");
        assert_eq!(fmt(":8.3f", -1.0_f64).unwrap(), "  -1.000");
        assert_eq!(fmt(":.2e", 1234.5_f64).unwrap(), "1.23e+03");
        assert_eq!(fmt(":.1E", 0.00025_f64).unwrap(), "2.5E-04");
        assert_eq!(fmt(":.0%", 0.25_f64).unwrap(), "25%");
        assert_eq!(fmt(":.1f", 3_i32).unwrap(), "3.0");
        assert_eq!(fmt(":F", f64::INFINITY).unwrap(), "INF");
    }

    #[test]
    fn text_precision_truncates() {
        assert_eq!(fmt(":.3", "abcdef").unwrap(), "abc");
        assert_eq!(fmt(":>5.2s", "abcdef").unwrap(), "   ab");
    }

    #[test]
    fn repr_conversion_and_debug_type() {
        assert_eq!(fmt("!r", "it").unwrap(), "'it'");
        assert_eq!(fmt(":?", "it").unwrap(), "'it'");
        assert_eq!(fmt("!r:>6", "it").unwrap(), "  'it'");
        assert_eq!(fmt("!s", "it").unwrap(), "it");
        assert_eq!(fmt("!r", 1.0_f64).unwrap(), "1.0");
        assert_eq!(fmt(":?", vec!["a"]).unwrap(), "['a']");
    }

    #[test]
    fn mismatched_types_fail_at_render() {
        assert!(fmt(":d", "text").unwrap_err().contains("'d' does not apply to text"));
        assert!(fmt(":d", 1.5_f64).unwrap_err().contains("to a float"));
        assert!(fmt(":f", true).unwrap_err().contains("to a bool"));
        assert!(fmt(":+", "text").unwrap_err().contains("numbers only"));
        assert!(fmt(":.2", 3_i32).unwrap_err().contains("precision is not allowed"));
    }

    #[test]
    fn invalid_specifiers_report_offsets() {
        let offset = |text: &str| FieldFormat::parse(text).unwrap_err().0;
        assert_eq!(offset("!x"), 1);
        assert_eq!(offset("!"), 1);
        assert_eq!(offset("!rx"), 2);
        assert_eq!(offset(":>>>"), 3);
        assert_eq!(offset(":."), 2);
        assert_eq!(offset(":.2d"), 1);
        assert_eq!(offset("!r:d"), 3);
        assert_eq!(offset(":+s"), 1);
    }
}
