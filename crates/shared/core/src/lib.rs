//! # Templated errors (core)
//!
//! Error kinds that declare a message *template* instead of a fixed string.
//! The template is filled from named values when the error is raised, so each
//! failure is explained once, at its declaration, and call sites only pass
//! what differs.
//!
//! * [`ErrorKind`] declares a kind: name, template, categories and the
//!   [`TemplateEngine`] its template is written for.
//! * [`TemplatedError`] is the raised error; [`AnyTemplatedError`] erases the
//!   kind for category-level handling.
//! * [`TemplateError`] reports misuse of a template (missing values, bad
//!   syntax). It is never the modeled failure itself.
//!
//! ## Example
//!
//! ```rust
//! use terr_core::{ErrorKind, Substitutions, TemplateError};
//!
//! struct ProgramFailed;
//!
//! impl ErrorKind for ProgramFailed {
//!     const NAME: &'static str = "ProgramFailed";
//!     const TEMPLATE: &'static str = "Program unexpectedly failed with input args: {args}.";
//! }
//!
//! let err = ProgramFailed::raise(
//!     Substitutions::new().with("args", vec!["myprogram", "-e", "--badflag"]),
//! )?;
//! assert_eq!(
//!     err.to_string(),
//!     "Program unexpectedly failed with input args: ['myprogram', '-e', '--badflag']."
//! );
//! # Ok::<(), TemplateError>(())
//! ```

#[cfg(feature = "config")]
pub mod config;
mod engine;
mod error;
mod format;
#[cfg(feature = "jinja")]
mod jinja;
mod kind;
mod options;
mod substitutions;
mod template;
mod templated;
mod value;

pub use crate::engine::TemplateEngine;
pub use crate::error::{MissingSubstitutionError, TemplateError};
#[cfg(feature = "jinja")]
pub use crate::jinja::JinjaTemplate;
pub use crate::kind::{Category, ErrorKind};
pub use crate::options::{DEFAULT_MISSING_MARKER, MissingPolicy, RenderOptions};
pub use crate::substitutions::Substitutions;
pub use crate::template::Template;
pub use crate::templated::{AnyTemplatedError, TemplatedError};
pub use crate::value::Value;
