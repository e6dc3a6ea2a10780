use crate::service::expand_service;
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, Error};

mod service;

#[proc_macro_derive(Service)]
pub fn generate_service(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_service(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
