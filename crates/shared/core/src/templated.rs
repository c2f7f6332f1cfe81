use crate::error::TemplateError;
use crate::kind::{Category, ErrorKind};
use crate::options::RenderOptions;
use crate::substitutions::Substitutions;
use crate::value::Value;
use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// An error of kind `K` carrying its rendered message.
///
/// The message is rendered once, at construction, and never changes. The
/// substitutions it was rendered from stay available for handlers that want
/// the raw values.
pub struct TemplatedError<K> {
    message: String,
    substitutions: Substitutions,
    kind: PhantomData<fn() -> K>,
}

impl<K: ErrorKind> TemplatedError<K> {
    /// Renders `K::TEMPLATE` strictly.
    ///
    /// # Errors
    /// Returns [`TemplateError::MissingSubstitution`] if a placeholder has no
    /// value, or another [`TemplateError`] if the template is malformed or an
    /// indexed placeholder does not resolve.
    pub fn new(substitutions: impl Into<Substitutions>) -> Result<Self, TemplateError> {
        Self::new_with(substitutions, &RenderOptions::strict())
    }

    /// Renders `K::TEMPLATE` under the given options.
    ///
    /// # Errors
    /// See [`TemplatedError::new`]; missing values only fail under a strict policy.
    pub fn new_with(
        substitutions: impl Into<Substitutions>,
        options: &RenderOptions,
    ) -> Result<Self, TemplateError> {
        let substitutions = substitutions.into();
        let message = render_kind::<K>(&substitutions, options)?;
        Ok(Self { message, substitutions, kind: PhantomData })
    }

    /// Uses a ready-made message instead of the template.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self { message: message.into(), substitutions: Substitutions::new(), kind: PhantomData }
    }

    /// Raises the kind without any values; the message is the raw template.
    #[must_use]
    pub fn bare() -> Self {
        Self::with_message(K::TEMPLATE)
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }

    /// The raw value a placeholder was rendered from.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.substitutions.get(name)
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        K::NAME
    }

    #[must_use]
    pub const fn categories(&self) -> &'static [Category] {
        K::CATEGORIES
    }

    #[must_use]
    pub fn in_category(&self, category: Category) -> bool {
        K::in_category(category)
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Substitutions) {
        (self.message, self.substitutions)
    }
}

fn render_kind<K: ErrorKind>(
    substitutions: &Substitutions,
    options: &RenderOptions,
) -> Result<String, TemplateError> {
    let rendered = K::ENGINE.render(K::TEMPLATE, substitutions, options);

    match rendered {
        Ok(message) => {
            trace!(kind = K::NAME, substitutions = substitutions.len(), "Rendered error template");
            Ok(message)
        }
        Err(err) => {
            debug!(kind = K::NAME, error = %err, "Failed to render error template");
            Err(err)
        }
    }
}

impl<K> fmt::Display for TemplatedError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<K: ErrorKind> fmt::Debug for TemplatedError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplatedError")
            .field("kind", &K::NAME)
            .field("message", &self.message)
            .field("substitutions", &self.substitutions)
            .finish()
    }
}

impl<K: ErrorKind> std::error::Error for TemplatedError<K> {}

impl<K> Clone for TemplatedError<K> {
    fn clone(&self) -> Self {
        Self {
            message: self.message.clone(),
            substitutions: self.substitutions.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for TemplatedError<K> {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.substitutions == other.substitutions
    }
}

/// A templated error of any kind.
///
/// Use it where handlers care about categories rather than concrete kinds;
/// [`AnyTemplatedError::downcast`] recovers the typed error.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyTemplatedError {
    kind: &'static str,
    type_id: TypeId,
    categories: &'static [Category],
    message: String,
    substitutions: Substitutions,
}

impl AnyTemplatedError {
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        self.kind
    }

    #[must_use]
    pub const fn categories(&self) -> &'static [Category] {
        self.categories
    }

    #[must_use]
    pub fn in_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    #[must_use]
    pub fn is<K: ErrorKind>(&self) -> bool {
        self.type_id == TypeId::of::<K>()
    }

    /// Recovers the typed error, or returns `self` if it is of another kind.
    ///
    /// # Errors
    /// Returns the original value when the kind does not match `K`.
    pub fn downcast<K: ErrorKind>(self) -> Result<TemplatedError<K>, Self> {
        if self.is::<K>() {
            Ok(TemplatedError {
                message: self.message,
                substitutions: self.substitutions,
                kind: PhantomData,
            })
        } else {
            Err(self)
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.substitutions.get(name)
    }
}

impl<K: ErrorKind> From<TemplatedError<K>> for AnyTemplatedError {
    fn from(err: TemplatedError<K>) -> Self {
        Self {
            kind: K::NAME,
            type_id: TypeId::of::<K>(),
            categories: K::CATEGORIES,
            message: err.message,
            substitutions: err.substitutions,
        }
    }
}

impl fmt::Display for AnyTemplatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AnyTemplatedError {}

#[cfg(test)]
mod tests {
    use super::*;

    struct NotFound;

    impl ErrorKind for NotFound {
        const NAME: &'static str = "NotFound";
        const TEMPLATE: &'static str = "No {what} named {name:?}";
    }

    struct Broken;

    impl ErrorKind for Broken {
        const NAME: &'static str = "Broken";
        const TEMPLATE: &'static str = "Unclosed {";
    }

    #[test]
    fn malformed_kind_template_fails_every_construction() {
        let err = TemplatedError::<Broken>::new(Substitutions::new()).unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn format_specifiers_render_in_kind_templates() {
        let err = NotFound::raise([("what", "user"), ("name", "x")]).unwrap();
        assert_eq!(err.to_string(), "No user named 'x'");
    }

    #[test]
    fn into_parts_returns_message_and_values() {
        let err = TemplatedError::<Broken>::with_message("custom");
        let (message, substitutions) = err.into_parts();
        assert_eq!(message, "custom");
        assert!(substitutions.is_empty());
    }

    #[test]
    fn typed_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplatedError<NotFound>>();
        assert_send_sync::<AnyTemplatedError>();
    }
}
