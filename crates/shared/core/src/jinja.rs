//! Jinja templates, for kinds that need filters, conditionals or loops in
//! their message.
//!
//! Missing values follow the same policy as the format engine: a strict
//! render reports [`TemplateError::MissingSubstitution`] for the first unbound
//! top-level variable (by name), a lenient render binds the marker instead.
//! Any other engine failure is reported as [`TemplateError::Engine`].

use crate::error::{MissingSubstitutionError, TemplateError};
use crate::options::{MissingPolicy, RenderOptions};
use crate::substitutions::Substitutions;
use minijinja::{Environment, UndefinedBehavior};
use std::fmt;

const TEMPLATE_NAME: &str = "message";

/// Globals every environment provides; never expected as substitutions.
const BUILTIN_GLOBALS: &[&str] = &["debug", "dict", "namespace", "range"];

/// A compiled Jinja template borrowing its source text.
pub struct JinjaTemplate<'a> {
    source: &'a str,
    env: Environment<'a>,
}

impl<'a> JinjaTemplate<'a> {
    /// Compiles a template. Undefined values are errors, never empty text.
    ///
    /// # Errors
    /// Returns [`TemplateError::Engine`] if `source` is not valid Jinja.
    pub fn parse(source: &'a str) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(TEMPLATE_NAME, source).map_err(|err| TemplateError::engine(source, &err))?;
        Ok(Self { source, env })
    }

    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.source
    }

    /// Top-level variables the template reads, sorted by name.
    #[must_use]
    pub fn placeholders(&self) -> Vec<String> {
        let Ok(template) = self.env.get_template(TEMPLATE_NAME) else {
            return Vec::new();
        };
        let mut names: Vec<String> = template
            .undeclared_variables(false)
            .into_iter()
            .filter(|name| !BUILTIN_GLOBALS.contains(&name.as_str()))
            .collect();
        names.sort_unstable();
        names
    }

    /// Renders strictly.
    ///
    /// # Errors
    /// See [`JinjaTemplate::render_with`].
    pub fn render(&self, subs: &Substitutions) -> Result<String, TemplateError> {
        self.render_with(subs, &RenderOptions::strict())
    }

    /// Renders with an explicit missing-value policy.
    ///
    /// # Errors
    /// * [`TemplateError::MissingSubstitution`] if a variable the template
    ///   prints is unbound and the policy is [`MissingPolicy::Fail`].
    /// * [`TemplateError::Engine`] for any other rendering failure, such as
    ///   indexing a value that is not a list.
    pub fn render_with(
        &self,
        subs: &Substitutions,
        options: &RenderOptions,
    ) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|err| TemplateError::engine(self.source, &err))?;
        let missing: Vec<String> =
            self.placeholders().into_iter().filter(|name| !subs.contains(name)).collect();

        let rendered = match options.missing() {
            MissingPolicy::Fail => template.render(subs),
            MissingPolicy::Marker(marker) => {
                let mut filled = subs.clone();
                for name in &missing {
                    filled.insert(name.clone(), marker.clone());
                }
                template.render(&filled)
            }
        };

        rendered.map_err(|err| match missing.first() {
            Some(name) if matches!(err.kind(), minijinja::ErrorKind::UndefinedError) => {
                MissingSubstitutionError::new(name.as_str(), self.source).into()
            }
            _ => TemplateError::engine(self.source, &err),
        })
    }
}

impl fmt::Debug for JinjaTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JinjaTemplate").field("source", &self.source).finish_non_exhaustive()
    }
}

impl fmt::Display for JinjaTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source)
    }
}
