//! Template parsing and rendering.
//!
//! Syntax:
//! * `{name}` is replaced by the value bound to `name`.
//! * `{name[0]}` (or `{name[0][2]}`) indexes into list values.
//! * `{{` and `}}` are literal braces.
//! * `{name!r}`, `{name:>8}`, `{count:+05d}` or `{ratio:.2%}` apply a
//!   conversion and a format specifier to the value, in the usual
//!   `[[fill]align][sign][#][0][width][.precision][type]` form.
//!
//! Names start with a letter or `_` and continue with alphanumerics or `_`.
//! Rendering is a single pass over the parsed template: substituted text is
//! never scanned for placeholders again.

use crate::error::{MissingSubstitutionError, TemplateError};
use crate::format::FieldFormat;
use crate::options::{MissingPolicy, RenderOptions};
use crate::substitutions::Substitutions;
use crate::value::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Field(Field<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field<'a> {
    name: &'a str,
    indices: Vec<usize>,
    format: FieldFormat,
}

impl Field<'_> {
    fn resolve<'v>(&self, value: &'v Value) -> Result<&'v Value, TemplateError> {
        self.indices.iter().try_fold(value, |current, &index| match current {
            Value::List(items) => items.get(index).ok_or_else(|| TemplateError::IndexOutOfBounds {
                name: self.name.to_owned(),
                index,
                len: items.len(),
            }),
            _ => Err(TemplateError::NotIndexable { name: self.name.to_owned() }),
        })
    }
}

/// A parsed message template borrowing its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    /// Parses a template.
    ///
    /// # Errors
    /// Returns [`TemplateError::Syntax`] for unbalanced braces, empty or
    /// invalid placeholder names, malformed indices and malformed format
    /// specifiers.
    pub fn parse(source: &'a str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text_start = 0;
        let mut chars = source.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '{' => {
                    push_text(&mut segments, &source[text_start..pos]);
                    if chars.next_if(|&(_, c)| c == '{').is_some() {
                        segments.push(Segment::Text(&source[pos..=pos]));
                        text_start = pos + 2;
                        continue;
                    }

                    let mut end = None;
                    for (i, c) in chars.by_ref() {
                        match c {
                            '}' => {
                                end = Some(i);
                                break;
                            }
                            '{' => {
                                return Err(TemplateError::syntax(
                                    source,
                                    i,
                                    "unexpected '{' inside a placeholder",
                                ));
                            }
                            _ => {}
                        }
                    }
                    let Some(end) = end else {
                        return Err(TemplateError::syntax(source, pos, "unclosed '{'"));
                    };

                    segments.push(Segment::Field(parse_field(source, pos + 1, end)?));
                    text_start = end + 1;
                }
                '}' => {
                    if chars.next_if(|&(_, c)| c == '}').is_none() {
                        return Err(TemplateError::syntax(
                            source,
                            pos,
                            "single '}' outside a placeholder; use '}}' for a literal brace",
                        ));
                    }
                    push_text(&mut segments, &source[text_start..=pos]);
                    text_start = pos + 2;
                }
                _ => {}
            }
        }
        push_text(&mut segments, &source[text_start..]);

        Ok(Self { source, segments })
    }

    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.source
    }

    /// Distinct placeholder names, in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Field(field) = segment
                && !names.contains(&field.name)
            {
                names.push(field.name);
            }
        }
        names
    }

    /// Placeholder names that have no value in `subs`.
    pub fn missing<'s>(&'s self, subs: &'s Substitutions) -> impl Iterator<Item = &'a str> + 's {
        self.placeholders().into_iter().filter(|name| !subs.contains(name))
    }

    /// Renders strictly: every placeholder must be bound.
    ///
    /// # Errors
    /// See [`Template::render_with`].
    pub fn render(&self, subs: &Substitutions) -> Result<String, TemplateError> {
        self.render_with(subs, &RenderOptions::strict())
    }

    /// Renders with an explicit missing-value policy. Unbound names in `subs`
    /// are ignored.
    ///
    /// # Errors
    /// * [`TemplateError::MissingSubstitution`] if a placeholder is unbound and
    ///   the policy is [`MissingPolicy::Fail`].
    /// * [`TemplateError::NotIndexable`] / [`TemplateError::IndexOutOfBounds`]
    ///   if an indexed placeholder does not resolve.
    /// * [`TemplateError::Format`] if a value does not fit its format type.
    pub fn render_with(
        &self,
        subs: &Substitutions,
        options: &RenderOptions,
    ) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => match (subs.get(field.name), options.missing()) {
                    (Some(value), _) => {
                        let value = field.resolve(value)?;
                        field.format.write(value, &mut out).map_err(|reason| {
                            TemplateError::Format { name: field.name.to_owned(), reason }
                        })?;
                    }
                    (None, MissingPolicy::Marker(marker)) => out.push_str(marker),
                    (None, MissingPolicy::Fail) => {
                        return Err(MissingSubstitutionError::new(field.name, self.source).into());
                    }
                },
            }
        }

        Ok(out)
    }
}

impl fmt::Display for Template<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source)
    }
}

fn push_text<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}

/// Parses the placeholder body `source[start..end]`.
fn parse_field(source: &str, start: usize, end: usize) -> Result<Field<'_>, TemplateError> {
    let body = &source[start..end];
    let split = body.find(|c: char| c == '!' || c == ':').unwrap_or(body.len());
    let (field, format) = body.split_at(split);
    let (name, mut rest) = field.find('[').map_or((field, ""), |i| field.split_at(i));

    if name.is_empty() {
        return Err(TemplateError::syntax(source, start, "empty placeholder name"));
    }
    if let Some((offset, c)) = name.char_indices().find(|&(i, c)| !is_name_char(i, c)) {
        return Err(TemplateError::syntax(
            source,
            start + offset,
            format!("invalid character {c:?} in placeholder name"),
        ));
    }

    let field_end = start + split;
    let mut indices = Vec::new();
    while !rest.is_empty() {
        let position = field_end - rest.len();
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(TemplateError::syntax(source, position, "expected '[' after placeholder"));
        };
        let Some(close) = inner.find(']') else {
            return Err(TemplateError::syntax(source, position, "unclosed '['"));
        };
        let digits = &inner[..close];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TemplateError::syntax(
                source,
                position + 1,
                "index must be a non-negative integer",
            ));
        }
        let index = digits.parse::<usize>().map_err(|e| {
            TemplateError::syntax(source, position + 1, format!("invalid index: {e}"))
        })?;
        indices.push(index);
        rest = &inner[close + 1..];
    }

    let format = FieldFormat::parse(format)
        .map_err(|(offset, reason)| TemplateError::syntax(source, field_end + offset, reason))?;

    Ok(Field { name, indices, format })
}

fn is_name_char(offset: usize, c: char) -> bool {
    c == '_' || if offset == 0 { c.is_alphabetic() } else { c.is_alphanumeric() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, subs: &Substitutions) -> Result<String, TemplateError> {
        Template::parse(template)?.render(subs)
    }

    #[test]
    fn renders_named_placeholders() {
        let subs = Substitutions::new().with("first", "Anon").with("second", "Tokyo");
        assert_eq!(render("{first} {second}", &subs).unwrap(), "Anon Tokyo");
        assert_eq!(render("{first}{first}", &subs).unwrap(), "AnonAnon");
    }

    #[test]
    fn text_only_templates_render_verbatim() {
        let subs = Substitutions::new();
        assert_eq!(render("", &subs).unwrap(), "");
        assert_eq!(render("plain message", &subs).unwrap(), "plain message");
        assert_eq!(render("unicode: žluťoučký kůň", &subs).unwrap(), "unicode: žluťoučký kůň");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let subs = Substitutions::new().with("x", 1_i32);
        assert_eq!(render("{{x}} = {x}", &subs).unwrap(), "{x} = 1");
        assert_eq!(render("{{{x}}}", &subs).unwrap(), "{1}");
        assert_eq!(render("}}{{", &subs).unwrap(), "}{");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let subs = Substitutions::new().with("a", "{b}").with("b", "nope");
        assert_eq!(render("value: {a}", &subs).unwrap(), "value: {b}");
    }

    #[test]
    fn missing_value_fails_strictly() {
        let err = render("Missing field {field}.", &Substitutions::new()).unwrap_err();
        assert_eq!(err.missing_name(), Some("field"));
        assert!(err.to_string().contains("`field`"));
    }

    #[test]
    fn lenient_rendering_uses_marker() {
        let template = Template::parse("{a} and {b}").unwrap();
        let subs = Substitutions::new().with("a", 1_i32);

        let out = template.render_with(&subs, &RenderOptions::lenient()).unwrap();
        assert_eq!(out, "1 and ...");

        let out = template.render_with(&subs, &RenderOptions::with_marker("<?>")).unwrap();
        assert_eq!(out, "1 and <?>");
    }

    #[test]
    fn indexed_placeholders() {
        let subs = Substitutions::new()
            .with("args", vec!["prog", "-e"])
            .with("grid", vec![vec![1_i32, 2], vec![3, 4]])
            .with("n", 5_i32);

        assert_eq!(render("{args[1]}", &subs).unwrap(), "-e");
        assert_eq!(render("{grid[1][0]}", &subs).unwrap(), "3");

        let err = render("{args[2]}", &subs).unwrap_err();
        assert_eq!(
            err,
            TemplateError::IndexOutOfBounds { name: "args".to_owned(), index: 2, len: 2 }
        );

        let err = render("{n[0]}", &subs).unwrap_err();
        assert_eq!(err, TemplateError::NotIndexable { name: "n".to_owned() });
    }

    #[test]
    fn placeholders_are_distinct_in_first_appearance_order() {
        let template = Template::parse("{b} {a} {b[0]} {{c}} {d}").unwrap();
        assert_eq!(template.placeholders(), ["b", "a", "d"]);

        let subs = Substitutions::new().with("a", 1_i32);
        assert_eq!(template.missing(&subs).collect::<Vec<_>>(), ["b", "d"]);
    }

    #[test]
    fn syntax_errors_report_position() {
        let cases = [
            ("open {", 5),
            ("bad } brace", 4),
            ("{}", 1),
            ("{ a}", 1),
            ("{a{b}}", 2),
            ("{1st}", 1),
            ("{a:>>>}", 5),
            ("{a!x}", 3),
            ("{a:.}", 4),
            ("{a:.2d}", 3),
            ("{a[0]:q}", 6),
            ("{a[x]}", 3),
            ("{a[0}", 2),
            ("{a[]}", 3),
            ("{a]}", 2),
        ];

        for (source, expected) in cases {
            match Template::parse(source) {
                Err(TemplateError::Syntax { position, .. }) => {
                    assert_eq!(position, expected, "wrong position for {source:?}");
                }
                other => panic!("expected syntax error for {source:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn format_specifiers_apply_to_values() {
        let subs = Substitutions::new()
            .with("what", "user")
            .with("name", "bob")
            .with("n", 7_i32)
            .with("ratio", 0.125_f64)
            .with("args", vec!["prog", "-e"]);

        assert_eq!(
            render("No {what} named {name!r} width {n:>4}", &subs).unwrap(),
            "No user named 'bob' width    7"
        );
        assert_eq!(render("[{name:^7}] {n:03d} {ratio:.1%}", &subs).unwrap(), "[  bob  ] 007 12.5%");
        assert_eq!(render("{args[1]!r} {args:?}", &subs).unwrap(), "'-e' ['prog', '-e']");
    }

    #[test]
    fn format_type_mismatch_is_reported_with_the_placeholder() {
        let subs = Substitutions::new().with("name", "bob");
        let err = render("{name:d}", &subs).unwrap_err();
        assert!(matches!(&err, TemplateError::Format { name, .. } if name == "name"), "{err:?}");
        assert!(err.to_string().contains("`name`"));
    }

    #[test]
    fn lenient_marker_ignores_format() {
        let template = Template::parse("{count:05d}").unwrap();
        let out = template.render_with(&Substitutions::new(), &RenderOptions::lenient()).unwrap();
        assert_eq!(out, "...");
    }

    #[test]
    fn rendering_is_idempotent() {
        let template = Template::parse("{x}-{y}").unwrap();
        let subs = Substitutions::new().with("x", 1.25_f64).with("y", vec![true, false]);
        let first = template.render(&subs).unwrap();
        assert_eq!(first, "1.25-[true, false]");
        assert_eq!(template.render(&subs).unwrap(), first);
    }

    #[test]
    fn display_shows_source() {
        let template = Template::parse("Missing {{field}} {field}").unwrap();
        assert_eq!(template.to_string(), "Missing {{field}} {field}");
        assert_eq!(template.as_str(), "Missing {{field}} {field}");
    }
}
