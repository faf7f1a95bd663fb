use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};
use darling::FromMeta;
use proc_macro_error::abort;

use crate::defs::*;
use crate::utils;

pub const ENUM_ATTR: &str = "json_enum";

#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct EnumArgs {
    name: Option<String>,
    integer: bool,
}

#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct VariantArgs {
    name: Option<String>,
}

fn parse_args<T: FromMeta + Default>(attrs: &[syn::Attribute]) -> T {
    match utils::get_attr(attrs, ENUM_ATTR) {
        Some(attr) => match utils::parse_attr_args(attr) {
            Ok(args) => args,
            Err(e) => abort!(attr, "Invalid {} args: {}", ENUM_ATTR, e),
        },
        None => T::default(),
    }
}

pub(crate) fn expand(input: &DeriveInput) -> TokenStream {
    let ident = &input.ident;

    let data = match &input.data {
        Data::Enum(data) => data,
        _ => abort!(ident, "JsonEnum can only be derived for enums"),
    };
    if !input.generics.params.is_empty() {
        abort!(input.generics, "JsonEnum can't be derived for generic types");
    }
    if data.variants.is_empty() {
        abort!(ident, "JsonEnum needs at least one variant");
    }

    let args: EnumArgs = parse_args(&input.attrs);
    let enum_name = args.name.unwrap_or_else(|| ident.to_string());
    let integer = args.integer;

    let mut variants = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            abort!(variant, "JsonEnum variants can't carry fields");
        }

        let variant_ident = &variant.ident;
        let variant_args: VariantArgs = parse_args(&variant.attrs);
        let name = variant_args.name.unwrap_or_else(|| variant_ident.to_string());
        let name = LitStr::new(&name, variant_ident.span());

        variants.push(quote! { #ident::#variant_ident });
        name_arms.push(quote! { #ident::#variant_ident => #name });
    }

    quote! {
        impl #JsonEnum for #ident {
            const NAME: &'static str = #enum_name;
            const INTEGER: bool = #integer;
            const VARIANTS: &'static [Self] = &[ #( #variants ),* ];

            fn name(&self) -> &'static str {
                match self {
                    #( #name_arms, )*
                }
            }

            fn value(&self) -> i64 {
                *self as i64
            }
        }

        #enum_value!(#ident);
    }
}
