use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;
use syn::{parse_macro_input, DeriveInput};

mod defs;
mod utils;

mod json_object;
mod json_enum;

/// Derives `podm_core::JsonObject` for a struct with named fields.
///
/// Fields marked `#[property]` become properties, in declaration order after
/// the properties of any `#[property(extends)]` base. Every property gets a
/// `get_<name>`/`set_<name>` pair unless marked `getter`/`setter`, in which
/// case the user-written method of that name is used.
#[proc_macro_derive(JsonObject, attributes(json_object, property))]
#[proc_macro_error]
pub fn derive_json_object(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    json_object::expand(&input).into()
}

/// Derives `podm_core::JsonEnum` for a fieldless enum.
#[proc_macro_derive(JsonEnum, attributes(json_enum))]
#[proc_macro_error]
pub fn derive_json_enum(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    json_enum::expand(&input).into()
}
