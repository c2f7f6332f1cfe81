use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Fields, Ident, ItemStruct, LitStr, Meta, Token};
use terr_core::Template;

/// Expands the `#[templated_error]` attribute macro.
///
/// Emits `ErrorKind` for the struct and, for named-field structs, the
/// conversion of its fields into a substitution set.
pub fn expand_templated_error(args: TokenStream, mut input: ItemStruct) -> TokenStream {
    let args = match syn::parse2::<KindArgs>(args) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error(),
    };
    let Some(template) = args.template else {
        return syn::Error::new(
            Span::call_site(),
            "templated_error requires a template, e.g. `#[templated_error(\"Missing {field}\")]`",
        )
        .to_compile_error();
    };
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "generic error kinds are not supported")
            .to_compile_error();
    }

    // Jinja templates are checked by the engine when the error is raised.
    let placeholders: Option<Vec<String>> = match args.engine {
        Engine::Format => match Template::parse(&template.value()) {
            Ok(parsed) => Some(parsed.placeholders().into_iter().map(str::to_owned).collect()),
            Err(err) => {
                return syn::Error::new_spanned(&template, format!("invalid template: {err}"))
                    .to_compile_error();
            }
        },
        Engine::Jinja => None,
    };

    if matches!(input.fields, Fields::Unnamed(_)) {
        return syn::Error::new_spanned(
            &input,
            "templated_error requires a unit struct or a struct with named fields",
        )
        .to_compile_error();
    }
    let fields = match take_fields(&mut input) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error(),
    };
    if let Some(placeholders) = &placeholders
        && let Err(err) = check_placeholders(&input, &template, placeholders, &fields)
    {
        return err;
    }

    let ident = &input.ident;
    let name = args.name.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let categories = args.categories.iter();
    let engine = match args.engine {
        Engine::Format => quote!(),
        Engine::Jinja => {
            quote! { const ENGINE: ::terr::TemplateEngine = ::terr::TemplateEngine::Jinja; }
        }
    };
    let debug_attr = debug_attr(&input.attrs);
    let substitutions_impl = generate_substitutions_impl(&input, &fields);

    quote! {
        #debug_attr
        #input

        #[automatically_derived]
        impl ::terr::ErrorKind for #ident {
            const NAME: &'static str = #name;
            const TEMPLATE: &'static str = #template;
            const CATEGORIES: &'static [::terr::Category] = &[#(::terr::Category::new(#categories)),*];
            #engine
        }

        #substitutions_impl
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Engine {
    #[default]
    Format,
    Jinja,
}

#[derive(Default)]
struct KindArgs {
    template: Option<LitStr>,
    name: Option<LitStr>,
    categories: Vec<LitStr>,
    engine: Engine,
}

impl Parse for KindArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut args = Self::default();
        let mut engine = None;

        if input.peek(LitStr) {
            args.template = Some(input.parse()?);
            if input.is_empty() {
                return Ok(args);
            }
            input.parse::<Token![,]>()?;
        }

        let metas = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;
        for meta in metas {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("template") => {
                    let value = string_literal(&nv.value, "template")?;
                    args.template = Some(set_once(args.template, &meta, value)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    let value = string_literal(&nv.value, "name")?;
                    args.name = Some(set_once(args.name, &meta, value)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("engine") => {
                    let value = string_literal(&nv.value, "engine")?;
                    let parsed = match value.value().as_str() {
                        "format" => Engine::Format,
                        "jinja" => Engine::Jinja,
                        _ => {
                            return Err(syn::Error::new_spanned(
                                &value,
                                "engine must be \"format\" or \"jinja\"",
                            ));
                        }
                    };
                    engine = Some(set_once(engine, &meta, parsed)?);
                }
                Meta::List(list) if list.path.is_ident("categories") => {
                    let names =
                        list.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
                    args.categories.extend(names);
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "Unsupported argument; expected template = \"...\", name = \"...\", engine = \"...\" or categories(\"...\")",
                    ));
                }
            }
        }

        args.engine = engine.unwrap_or_default();
        Ok(args)
    }
}

/// How a field becomes a substitution value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    /// `Value::from(field)`.
    Into,
    /// `#[templated(display)]`: the field's `Display` text.
    Display,
    /// `#[templated(debug)]`: the field's `Debug` text.
    Debug,
}

struct KindField {
    ident: Ident,
    conversion: Conversion,
}

/// Collects named fields and strips their `#[templated(...)]` attributes.
fn take_fields(input: &mut ItemStruct) -> syn::Result<Vec<KindField>> {
    let Fields::Named(named) = &mut input.fields else {
        return Ok(Vec::new());
    };

    let mut fields = Vec::with_capacity(named.named.len());
    for field in &mut named.named {
        let mut conversion = None;
        let mut kept = Vec::with_capacity(field.attrs.len());
        for attr in field.attrs.drain(..) {
            if !attr.path().is_ident("templated") {
                kept.push(attr);
                continue;
            }
            let mode: Ident = attr.parse_args()?;
            let parsed = match mode.to_string().as_str() {
                "display" => Conversion::Display,
                "debug" => Conversion::Debug,
                _ => return Err(syn::Error::new_spanned(&mode, "expected `display` or `debug`")),
            };
            conversion = Some(set_once(conversion, &attr, parsed)?);
        }
        field.attrs = kept;

        if let Some(ident) = &field.ident {
            fields.push(KindField {
                ident: ident.clone(),
                conversion: conversion.unwrap_or(Conversion::Into),
            });
        }
    }
    Ok(fields)
}

fn string_literal(expr: &syn::Expr, label: &str) -> syn::Result<LitStr> {
    match expr {
        syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(lit), .. }) => Ok(lit.clone()),
        other => {
            Err(syn::Error::new_spanned(other, format!("{label} must be a string literal")))
        }
    }
}

fn set_once<T>(current: Option<T>, token: impl ToTokens, value: T) -> syn::Result<T> {
    if current.is_some() {
        return Err(syn::Error::new_spanned(token, "Duplicate argument"));
    }
    Ok(value)
}

fn check_placeholders(
    input: &ItemStruct,
    template: &LitStr,
    placeholders: &[String],
    fields: &[KindField],
) -> Result<(), TokenStream> {
    // Unit kinds take their values at runtime.
    if matches!(input.fields, Fields::Unit) {
        return Ok(());
    }

    let names: FxHashSet<String> = fields.iter().map(|f| f.ident.unraw().to_string()).collect();
    for placeholder in placeholders {
        if !names.contains(placeholder) {
            return Err(syn::Error::new_spanned(
                template,
                format!("placeholder `{{{placeholder}}}` has no matching field on `{}`", input.ident),
            )
            .to_compile_error());
        }
    }
    Ok(())
}

fn generate_substitutions_impl(input: &ItemStruct, fields: &[KindField]) -> TokenStream {
    if matches!(input.fields, Fields::Unit) {
        return quote!();
    }

    let ident = &input.ident;
    let vis = &input.vis;
    let inserts = fields.iter().map(|field| {
        let member = &field.ident;
        let name = LitStr::new(&member.unraw().to_string(), member.span());
        let value = match field.conversion {
            Conversion::Into => quote!(kind.#member),
            Conversion::Display => quote!(::terr::Value::display(&kind.#member)),
            Conversion::Debug => quote!(::terr::Value::debug(&kind.#member)),
        };
        quote! { substitutions.insert(#name, #value); }
    });

    quote! {
        #[automatically_derived]
        impl ::core::convert::From<#ident> for ::terr::Substitutions {
            fn from(kind: #ident) -> Self {
                let mut substitutions = ::terr::Substitutions::new();
                #( #inserts )*
                substitutions
            }
        }

        impl #ident {
            /// Renders this kind's template from its fields.
            ///
            /// # Errors
            /// Returns a [`::terr::TemplateError`] if a value does not fit its placeholder.
            #vis fn into_error(
                self,
            ) -> ::core::result::Result<::terr::TemplatedError<Self>, ::terr::TemplateError> {
                ::terr::TemplatedError::new(self)
            }
        }
    }
}

fn debug_attr(attrs: &[Attribute]) -> TokenStream {
    if derived_trait_names(attrs).contains("Debug") {
        quote! {}
    } else {
        quote! { #[derive(Debug)] }
    }
}

fn derived_trait_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.get_ident() {
                traits.insert(ident.to_string());
            } else if let Some(ident) = meta.path.segments.last().map(|seg| seg.ident.to_string()) {
                traits.insert(ident);
            }
            Ok(())
        });
    }

    traits
}
