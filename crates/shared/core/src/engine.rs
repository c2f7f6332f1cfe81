use crate::error::TemplateError;
#[cfg(feature = "jinja")]
use crate::jinja::JinjaTemplate;
use crate::options::RenderOptions;
use crate::substitutions::Substitutions;
use crate::template::Template;
use std::borrow::Cow;

/// Template language an error kind's message is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TemplateEngine {
    /// `{name}` placeholders with optional format specifiers; see [`Template`].
    #[default]
    Format,
    /// Jinja syntax (`{{ name }}`, filters, conditionals) rendered by `minijinja`;
    /// see [`JinjaTemplate`].
    #[cfg(feature = "jinja")]
    Jinja,
}

impl TemplateEngine {
    /// Names the template reads from its substitutions.
    ///
    /// # Errors
    /// Returns a [`TemplateError`] if `source` is not a valid template for this engine.
    pub fn placeholders(self, source: &str) -> Result<Vec<Cow<'_, str>>, TemplateError> {
        match self {
            Self::Format => {
                Ok(Template::parse(source)?.placeholders().into_iter().map(Cow::Borrowed).collect())
            }
            #[cfg(feature = "jinja")]
            Self::Jinja => {
                Ok(JinjaTemplate::parse(source)?.placeholders().into_iter().map(Cow::Owned).collect())
            }
        }
    }

    /// Parses and renders `source` in one step.
    ///
    /// # Errors
    /// Returns a [`TemplateError`] if the template is malformed or does not
    /// fit the substitutions.
    pub fn render(
        self,
        source: &str,
        substitutions: &Substitutions,
        options: &RenderOptions,
    ) -> Result<String, TemplateError> {
        match self {
            Self::Format => Template::parse(source)?.render_with(substitutions, options),
            #[cfg(feature = "jinja")]
            Self::Jinja => JinjaTemplate::parse(source)?.render_with(substitutions, options),
        }
    }
}
