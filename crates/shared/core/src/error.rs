use std::borrow::Cow;
use thiserror::Error;

/// A placeholder referenced by a template had no value in the substitution set.
///
/// This is a defect at the call site that raised the error, never the
/// modeled failure itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing substitution for placeholder `{name}` in template {template:?}")]
pub struct MissingSubstitutionError {
    name: String,
    template: String,
}

impl MissingSubstitutionError {
    pub(crate) fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self { name: name.into(), template: template.into() }
    }

    /// Name of the placeholder that had no value.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source text of the template being rendered.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// Errors in the use of a template: a malformed template or a substitution
/// set that does not fit it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error(transparent)]
    MissingSubstitution(#[from] MissingSubstitutionError),

    /// The template text itself is malformed (byte `position` into `template`).
    #[error("Invalid template {template:?} at byte {position}: {reason}")]
    Syntax { template: String, position: usize, reason: Cow<'static, str> },

    /// An indexed placeholder (`{name[0]}`) was bound to a value that is not a list.
    #[error("Placeholder `{name}` cannot be indexed: value is not a list")]
    NotIndexable { name: String },

    #[error("Index {index} is out of bounds for placeholder `{name}` with {len} element(s)")]
    IndexOutOfBounds { name: String, index: usize, len: usize },

    /// The value bound to `name` does not fit the placeholder's format type (`{n:d}` given text).
    #[error("Cannot format placeholder `{name}`: {reason}")]
    Format { name: String, reason: Cow<'static, str> },

    /// The Jinja engine rejected the template or failed while rendering it.
    #[error("Jinja template {template:?} failed: {reason}")]
    Engine { template: String, reason: String },
}

impl TemplateError {
    /// Returns the missing placeholder name if this is a missing-substitution failure.
    #[must_use]
    pub fn missing_name(&self) -> Option<&str> {
        match self {
            Self::MissingSubstitution(err) => Some(err.name()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_missing_substitution(&self) -> bool {
        matches!(self, Self::MissingSubstitution(_))
    }

    #[cfg(feature = "jinja")]
    pub(crate) fn engine(template: &str, err: &minijinja::Error) -> Self {
        Self::Engine { template: template.to_owned(), reason: err.to_string() }
    }

    pub(crate) fn syntax(
        template: &str,
        position: usize,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::Syntax { template: template.to_owned(), position, reason: reason.into() }
    }
}
