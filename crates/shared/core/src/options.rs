use std::borrow::Cow;

/// Text rendered in place of a missing value under [`MissingPolicy::Marker`].
pub const DEFAULT_MISSING_MARKER: &str = "...";

/// What rendering does when a placeholder has no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Fail with [`crate::MissingSubstitutionError`].
    #[default]
    Fail,
    /// Render the given marker in place of the value.
    Marker(Cow<'static, str>),
}

/// Options controlling how a template is rendered.
///
/// The default is strict: every placeholder must be bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    missing: MissingPolicy,
}

impl RenderOptions {
    #[must_use]
    pub const fn strict() -> Self {
        Self { missing: MissingPolicy::Fail }
    }

    /// Fills missing values with [`DEFAULT_MISSING_MARKER`].
    #[must_use]
    pub const fn lenient() -> Self {
        Self { missing: MissingPolicy::Marker(Cow::Borrowed(DEFAULT_MISSING_MARKER)) }
    }

    /// Fills missing values with a custom marker.
    #[must_use]
    pub fn with_marker(marker: impl Into<Cow<'static, str>>) -> Self {
        Self { missing: MissingPolicy::Marker(marker.into()) }
    }

    #[must_use]
    pub const fn missing(&self) -> &MissingPolicy {
        &self.missing
    }

    #[must_use]
    pub const fn is_strict(&self) -> bool {
        matches!(self.missing, MissingPolicy::Fail)
    }
}
