#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros for declaring templated error kinds.
//! Templates are parsed while the macro expands, so a malformed template or a
//! placeholder without a matching field is reported by the compiler instead
//! of at the first raise.
//!
//! ## Usage
//! Depend on the `terr` facade and use the re-exported macro; the generated
//! code refers to items through `::terr`:
//! ```toml
//! [dependencies]
//! terr = { path = "../crates/terr" }
//! ```
//!
//! The examples below are `ignore`d to avoid compiling in this crate; the
//! `terr` crate's tests exercise them.

mod macros;

use proc_macro::TokenStream;
use syn::{ItemStruct, parse_macro_input};

/// Attribute macro declaring an error kind with a message template.
///
/// # Arguments
///
/// * `"..."` or `template = "..."` - The message template (required). Placeholders are
///   `{name}`, `{name[0]}` for list elements, `{name:>8}` or `{name!r}` with a format
///   specifier, and `{{`/`}}` for literal braces.
/// * `name = "..."` - Kind name reported by `ErrorKind::NAME` (defaults to the struct name).
/// * `categories("a", "b")` - Classification tags for category-level handling.
/// * `engine = "jinja"` - Write the template in Jinja instead (`terr` feature `jinja`).
///   Jinja templates are not checked at compile time.
///
/// # Field Attributes
///
/// * `#[templated(display)]` - Substitute the field's `Display` text, for types without a
///   `Value` conversion (`IpAddr`, `Url`, ...).
/// * `#[templated(debug)]` - Substitute the field's `Debug` text (`PathBuf`, ...).
///
/// # Generated Items
///
/// * `impl terr::ErrorKind` with the declared name, template and categories.
/// * `#[derive(Debug)]` unless the struct already derives it.
/// * For structs with named fields: `From<Self> for terr::Substitutions`, converting each
///   field with `terr::Value::from`, and an inherent `into_error(self)`.
///
/// # Errors
///
/// Emits a compile-time error if:
/// * the template is missing or malformed;
/// * a placeholder has no matching field (named-field structs only);
/// * an argument or field attribute is unknown or repeated;
/// * the struct is a tuple struct or has generic parameters.
///
/// # Example
///
/// ```rust,ignore
/// use terr::templated_error;
///
/// #[templated_error("Missing field {field}.", categories("validation"))]
/// pub struct MissingField;
///
/// #[templated_error(template = "Program unexpectedly failed with input args: {args}.")]
/// pub struct ProgramFailed {
///     pub args: Vec<String>,
/// }
///
/// let err = MissingField::raise(terr::subs! { field = "email" })?;
/// let err = ProgramFailed { args: vec!["myprogram".into()] }.into_error()?;
/// ```
#[proc_macro_attribute]
pub fn templated_error(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::templated::expand_templated_error(args.into(), input).into()
}
