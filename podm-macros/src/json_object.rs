use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Field, Ident, LitStr, Type, Visibility};
use darling::FromMeta;
use proc_macro_error::abort;

use crate::defs::*;
use crate::utils;

pub const OBJECT_ATTR: &str = "json_object";
pub const PROPERTY_ATTR: &str = "property";

#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct ObjectArgs {
    name: Option<String>,
    namespace: Option<String>,
    enveloped: bool,
    untyped: bool,
    no_eq: bool,
    no_display: bool,
    after_deserialize: Option<String>,
}

#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct PropertyArgs {
    json: Option<String>,
    extends: bool,
    getter: bool,
    setter: bool,
    default: Option<String>,
    default_with: Option<String>,
    handler: Option<String>,
    value_type: Option<String>,
    enum_as_str: bool,
    title: Option<String>,
    pattern: Option<String>,
    format: Option<String>,
    description: Option<String>,
    schema_ref: Option<String>,
    schema: Option<String>,
    allow_none: Option<bool>,
    group: Option<String>,
}

struct PropertyField<'a> {
    field: &'a Field,
    ident: &'a Ident,
    args: PropertyArgs,
}

impl PropertyField<'_> {

    fn ty(&self) -> &Type {
        &self.field.ty
    }

    fn getter(&self) -> Ident {
        format_ident!("get_{}", self.ident)
    }

    fn setter(&self) -> Ident {
        format_ident!("set_{}", self.ident)
    }

    fn initial_value(&self) -> TokenStream {
        let ty = self.ty();
        if self.args.extends {
            return quote! { <#ty as #JsonObject>::blank() };
        }
        if let Some(default) = &self.args.default {
            let expr = expr_or_abort(self.field, default);
            return quote! { #expr };
        }
        if let Some(factory) = &self.args.default_with {
            let path = path_or_abort(self.field, factory);
            return quote! { #path() };
        }
        quote! { <#ty as #Default>::default() }
    }

    fn descriptor(&self) -> TokenStream {
        let ty = self.ty();
        let args = &self.args;
        let mut calls = Vec::new();

        if let Some(json) = &args.json {
            calls.push(quote! { .json(#json) });
        }
        if let Some(default) = &args.default {
            let expr = expr_or_abort(self.field, default);
            calls.push(quote! { .default(#expr) });
        }
        if let Some(factory) = &args.default_with {
            let path = path_or_abort(self.field, factory);
            calls.push(quote! { .default_with(#path) });
        }
        if let Some(handler) = &args.handler {
            let expr = expr_or_abort(self.field, handler);
            calls.push(quote! { .handler(#expr) });
        }
        if let Some(value_type) = &args.value_type {
            let expr = expr_or_abort(self.field, value_type);
            calls.push(quote! { .value_type(#expr) });
        }
        if args.enum_as_str {
            calls.push(quote! { .enum_as_str(true) });
        }
        for (method, hint) in [
            ("title", &args.title),
            ("pattern", &args.pattern),
            ("format", &args.format),
            ("description", &args.description),
            ("schema_ref", &args.schema_ref),
            ("group", &args.group),
        ] {
            if let Some(hint) = hint {
                let method = Ident::new(method, self.ident.span());
                calls.push(quote! { .#method(#hint) });
            }
        }
        if let Some(schema) = &args.schema {
            calls.push(quote! { .schema(#schema_literal(#schema)) });
        }
        if let Some(allow_none) = args.allow_none {
            calls.push(quote! { .allow_none(#allow_none) });
        }

        quote! { #Property::<#ty>::new() #( #calls )* }
    }

    fn declaration(&self) -> TokenStream {
        let name = LitStr::new(&self.ident.to_string(), self.ident.span());
        let ty = self.ty();
        let descriptor = self.descriptor();
        let getter = self.getter();
        let setter = self.setter();

        let declare = match self.args.handler {
            Some(_) => quote! { table.handled::<#ty>(#name, #descriptor) },
            None => quote! { table.property::<#ty>(#name, #descriptor) },
        };
        let getter = match self.args.getter {
            true => quote! { .custom_getter(Self::#getter) },
            false => quote! { .getter(Self::#getter) },
        };
        let setter = match self.args.setter {
            true => quote! { .custom_setter(Self::#setter) },
            false => quote! { .setter(Self::#setter) },
        };

        quote! {
            #declare #getter #setter .declare()?;
        }
    }

    fn accessors(&self, vis: &Visibility) -> TokenStream {
        let ident = self.ident;
        let ty = self.ty();
        let getter = self.getter();
        let setter = self.setter();

        let getter = match self.args.getter {
            true => quote! {},
            false => quote! {
                #vis fn #getter(&self) -> &#ty {
                    &self.#ident
                }
            },
        };
        let setter = match self.args.setter {
            true => quote! {},
            false => quote! {
                #vis fn #setter(&mut self, value: #ty) {
                    self.#ident = value;
                }
            },
        };

        quote! { #getter #setter }
    }

}

fn expr_or_abort(field: &Field, value: &str) -> syn::Expr {
    match utils::parse_expr(value) {
        Ok(expr) => expr,
        Err(e) => abort!(field, "Invalid expression '{}': {}", value, e),
    }
}

fn path_or_abort(field: &Field, value: &str) -> syn::Path {
    match utils::parse_path(value) {
        Ok(path) => path,
        Err(e) => abort!(field, "Invalid path '{}': {}", value, e),
    }
}

fn object_args(input: &DeriveInput) -> ObjectArgs {
    match utils::get_attr(&input.attrs, OBJECT_ATTR) {
        Some(attr) => match utils::parse_attr_args(attr) {
            Ok(args) => args,
            Err(e) => abort!(attr, "Invalid {} args: {}", OBJECT_ATTR, e),
        },
        None => ObjectArgs::default(),
    }
}

fn property_field(field: &Field) -> Option<PropertyField<'_>> {
    let attr = utils::get_attr(&field.attrs, PROPERTY_ATTR)?;

    let args: PropertyArgs = match utils::parse_attr_args(attr) {
        Ok(args) => args,
        Err(e) => abort!(attr, "Invalid {} args: {}", PROPERTY_ATTR, e),
    };

    if args.default.is_some() && args.default_with.is_some() {
        abort!(attr, "'default' and 'default_with' are mutually exclusive");
    }
    if args.extends && (args.getter || args.setter || args.handler.is_some()) {
        abort!(attr, "'extends' takes no other property args");
    }

    let ident = match &field.ident {
        Some(i) => i,
        None => abort!(field, "Property fields must be named"),
    };

    Some(PropertyField { field, ident, args })
}

pub(crate) fn expand(input: &DeriveInput) -> TokenStream {
    if !input.generics.params.is_empty() {
        abort!(input.generics, "JsonObject can't be derived for generic types");
    }

    let args = object_args(input);
    let ident = &input.ident;
    let vis = &input.vis;

    let fields = utils::named_fields(input);
    let properties: Vec<PropertyField> = fields.iter()
        .filter_map(|field| property_field(field))
        .collect();

    let (bases, own): (Vec<&PropertyField>, Vec<&PropertyField>) = properties.iter()
        .partition(|p| p.args.extends);

    let type_name = args.name.unwrap_or_else(|| ident.to_string());
    let namespace = match args.namespace {
        Some(ns) => quote! { #ns },
        None => quote! { ::std::module_path!() },
    };
    let typed = !args.untyped;
    let enveloped = args.enveloped;

    let base_declarations = bases.iter().map(|base| {
        let base_ident = base.ident;
        let base_ty = base.ty();
        let base_ref = format_ident!("__{}_ref", base_ident);
        let base_mut = format_ident!("__{}_mut", base_ident);
        quote! {
            fn #base_ref(object: &#ident) -> &#base_ty {
                &object.#base_ident
            }
            fn #base_mut(object: &mut #ident) -> &mut #base_ty {
                &mut object.#base_ident
            }
            table.extends::<#base_ty>(#base_ref, #base_mut)?;
        }
    });
    let own_declarations = own.iter().map(|p| p.declaration());
    let accessors = own.iter().map(|p| p.accessors(vis));

    let blank_fields = fields.iter().map(|field| {
        let field_ident = &field.ident;
        let value = match properties.iter().find(|p| p.field.ident == field.ident) {
            Some(p) => p.initial_value(),
            None => quote! { #Default::default() },
        };
        quote! { #field_ident: #value }
    });

    let after_deserialize = args.after_deserialize.map(|hook| {
        let path = match utils::parse_path(&hook) {
            Ok(p) => p,
            Err(e) => abort!(ident, "Invalid after_deserialize path '{}': {}", hook, e),
        };
        quote! {
            fn after_deserialize(&mut self) {
                #path(self)
            }
        }
    });

    let eq_impl = match args.no_eq {
        true => quote! {},
        false => quote! {
            impl #PartialEq for #ident {
                fn eq(&self, other: &Self) -> bool {
                    #JsonObject::state_eq(self, other)
                }
            }
        },
    };

    let display_impl = match args.no_display {
        true => quote! {},
        false => quote! {
            impl #Display for #ident {
                fn fmt(&self, f: &mut #Formatter<'_>) -> #FmtResult {
                    #display(self, f)
                }
            }
        },
    };

    quote! {
        impl #ident {
            #( #accessors )*
        }

        impl #JsonObject for #ident {
            const TYPE_NAME: &'static str = #type_name;
            const NAMESPACE: &'static str = #namespace;
            const OPTIONS: #ObjectOptions = #ObjectOptions {
                typed: #typed,
                enveloped: #enveloped,
            };

            fn declare(table: &mut #TableBuilder<Self>) -> #Result<()> {
                #( #base_declarations )*
                #( #own_declarations )*
                ::std::result::Result::Ok(())
            }

            fn blank() -> Self {
                #ident {
                    #( #blank_fields, )*
                }
            }

            #after_deserialize
        }

        #object_value!(#ident);

        #eq_impl

        #display_impl
    }
}
