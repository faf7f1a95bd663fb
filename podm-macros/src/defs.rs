#![allow(non_upper_case_globals)]
#![allow(clippy::declare_interior_mutable_const)]

use proc_macro2::TokenStream;
use std::cell::LazyCell;
use quote::ToTokens;

pub(crate) struct LazyTokens(LazyCell<TokenStream>);

impl LazyTokens {

    const fn new(func: fn() -> TokenStream) -> Self {
        LazyTokens(LazyCell::new(func))
    }

}

impl ToTokens for LazyTokens {

    fn to_tokens(&self, stream: &mut TokenStream) {
        let content = self.0.clone();
        content.to_tokens(stream)
    }

}

macro_rules! define_const_token_streams {
    ($( $ident:ident = { $($tt:tt)* } ;)*) => {
        $(
            pub(crate) const $ident: crate::defs::LazyTokens =
                crate::defs::LazyTokens::new(|| ::quote::quote!{ $($tt)* });
        )*
    }
}

define_const_token_streams! {

    Default = { ::std::default::Default };
    PartialEq = { ::std::cmp::PartialEq };
    Display = { ::std::fmt::Display };
    Formatter = { ::std::fmt::Formatter };
    FmtResult = { ::std::fmt::Result };

    Result = { ::podm_core::Result };

    JsonObject = { ::podm_core::JsonObject };
    JsonEnum = { ::podm_core::JsonEnum };
    ObjectOptions = { ::podm_core::ObjectOptions };
    TableBuilder = { ::podm_core::TableBuilder };
    Property = { ::podm_core::Property };

    object_value = { ::podm_core::object_value };
    enum_value = { ::podm_core::enum_value };
    display = { ::podm_core::object::display };
    schema_literal = { ::podm_core::__private::schema_literal };

}
