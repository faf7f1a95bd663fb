use syn::{
    Attribute,
    Data, DeriveInput, Field, Fields,
    Expr, Path,
    parse_str,
    Result,
};
use darling::FromMeta;
use proc_macro_error::abort;

pub fn get_attr<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}

/// Parses `#[name(...)]`; a bare `#[name]` yields the defaults.
pub fn parse_attr_args<T>(attr: &Attribute) -> darling::Result<T>
where
    T: FromMeta + Default,
{
    match &attr.meta {
        syn::Meta::Path(_) => Ok(T::default()),
        meta => T::from_meta(meta),
    }
}

pub fn parse_expr(value: &str) -> Result<Expr> {
    parse_str(value)
}

pub fn parse_path(value: &str) -> Result<Path> {
    parse_str(value)
}

pub fn named_fields(input: &DeriveInput) -> Vec<&Field> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => abort!(data.fields, "JsonObject structs can't have unnamed fields"),
        },
        _ => abort!(input.ident, "JsonObject can only be derived for structs"),
    }
}
