use crate::engine::TemplateEngine;
use crate::error::TemplateError;
use crate::substitutions::Substitutions;
use crate::templated::TemplatedError;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// A classification tag shared by error kinds.
///
/// A kind may belong to any number of categories, letting handlers treat
/// unrelated kinds alike (e.g. everything tagged `validation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Category(&'static str);

impl Category {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<&'static str> for Category {
    fn from(name: &'static str) -> Self {
        Self(name)
    }
}

/// A declared error kind: one name, one template, any number of categories.
///
/// Usually implemented with `#[templated_error]`; a manual impl is three
/// constants:
///
/// ```rust
/// use terr_core::{Category, ErrorKind};
///
/// struct MissingField;
///
/// impl ErrorKind for MissingField {
///     const NAME: &'static str = "MissingField";
///     const TEMPLATE: &'static str = "Missing field {field}.";
///     const CATEGORIES: &'static [Category] = &[Category::new("validation")];
/// }
///
/// let err = MissingField::raise([("field", "email")]).unwrap();
/// assert_eq!(err.to_string(), "Missing field email.");
/// ```
pub trait ErrorKind: 'static {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
    const CATEGORIES: &'static [Category] = &[];
    const ENGINE: TemplateEngine = TemplateEngine::Format;

    /// Placeholder names declared by the template.
    ///
    /// # Errors
    /// Returns a [`TemplateError`] if the declared template is malformed.
    fn placeholders() -> Result<Vec<Cow<'static, str>>, TemplateError> {
        Self::ENGINE.placeholders(Self::TEMPLATE)
    }

    #[must_use]
    fn in_category(category: Category) -> bool {
        Self::CATEGORIES.contains(&category)
    }

    /// Renders the template and returns the error, ready to propagate.
    ///
    /// # Errors
    /// Returns a [`TemplateError`] if the substitutions do not fit the template.
    fn raise(substitutions: impl Into<Substitutions>) -> Result<TemplatedError<Self>, TemplateError>
    where
        Self: Sized,
    {
        TemplatedError::new(substitutions)
    }
}
