//! Facade crate for templated errors.
//! Re-exports the core types and the `#[templated_error]` macro.
//! Keep this crate thin: it should compose other crates, not implement rendering logic.
//!
//! ## Usage
//! - Declare kinds with `#[templated_error("...")]` (feature `derive`, on by default).
//! - Raise them with [`subs!`] or with the kind's own fields.
//! - Write templates in Jinja with `engine = "jinja"` (feature `jinja`, on by default).
//! - Load render settings from files/env with [`config`] (feature `config`).
//!
//! ```rust
//! use terr::prelude::*;
//!
//! #[templated_error("Missing field {field}.", categories("validation"))]
//! struct MissingField;
//!
//! let err = MissingField::raise(subs! { field = "email", extra = 1 })?;
//! assert_eq!(err.to_string(), "Missing field email.");
//! assert!(err.in_category(Category::new("validation")));
//!
//! let broken = MissingField::raise(subs! {});
//! assert!(broken.is_err_and(|e| e.is_missing_substitution()));
//! # Ok::<(), TemplateError>(())
//! ```

#[cfg(feature = "config")]
pub use terr_core::config;
#[cfg(feature = "jinja")]
pub use terr_core::JinjaTemplate;
pub use terr_core::{
    AnyTemplatedError, Category, DEFAULT_MISSING_MARKER, ErrorKind, MissingPolicy,
    MissingSubstitutionError, RenderOptions, Substitutions, Template, TemplateEngine,
    TemplateError, TemplatedError, Value,
};
#[cfg(feature = "derive")]
pub use terr_derive::templated_error;

/// Common imports for declaring and raising templated errors.
pub mod prelude {
    pub use crate::subs;
    #[cfg(feature = "derive")]
    pub use crate::templated_error;
    pub use crate::{
        AnyTemplatedError, Category, ErrorKind, Substitutions, TemplateEngine, TemplateError,
        TemplatedError, Value,
    };
}

/// Builds a [`Substitutions`] set from `name = value` pairs.
///
/// Values go through `Value::from`, so anything convertible into a [`Value`] works.
///
/// ```rust
/// let subs = terr::subs! { args = vec!["myprogram", "-e"], code = 2 };
/// assert_eq!(subs.len(), 2);
/// assert!(terr::subs! {}.is_empty());
/// ```
#[macro_export]
macro_rules! subs {
    () => {
        $crate::Substitutions::new()
    };
    ($($name:ident = $value:expr),+ $(,)?) => {
        $crate::Substitutions::new()$(.with(stringify!($name), $value))+
    };
}
