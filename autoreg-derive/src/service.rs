use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DataStruct, DeriveInput, Error, Fields, FieldsNamed, FieldsUnnamed, Result};

fn make_named_struct(fields: &FieldsNamed) -> TokenStream {
    let fields: Vec<_> = fields
        .named
        .iter()
        .map(|field| {
            let ident = field.ident.as_ref().unwrap();
            quote! {
                #ident: std::default::Default::default()
            }
        })
        .collect();

    quote! {
        Self {
            #(#fields),*
        }
    }
}

fn make_unnamed_struct(fields: &FieldsUnnamed) -> TokenStream {
    let fields: Vec<_> = fields
        .unnamed
        .iter()
        .map(|_| quote!(std::default::Default::default()))
        .collect();

    quote! {
        Self(#(#fields),*)
    }
}

pub fn expand_service(input: &DeriveInput) -> Result<TokenStream> {
    if let Data::Struct(DataStruct { fields, .. }) = &input.data {
        let ident = &input.ident;
        let generation = match fields {
            Fields::Named(fields) => make_named_struct(fields),
            Fields::Unnamed(fields) => make_unnamed_struct(fields),
            Fields::Unit => quote! { Self },
        };

        Ok(quote! {
            #[automatically_derived]
            impl autoreg::service::Service for #ident {
                fn create() -> Self {
                    #generation
                }
            }

            const _: () = {
                fn constructor() -> autoreg::service::ServiceInstanceAnyPtr {
                    autoreg::service::ServiceInstancePtr::new(
                        <#ident as autoreg::service::Service>::create(),
                    ) as autoreg::service::ServiceInstanceAnyPtr
                }

                fn register() -> autoreg::introspection::ServiceTypeRegistration {
                    const MARKERS: &[autoreg::service::TypeMarker] =
                        &[autoreg::service::TypeMarker::service()];
                    autoreg::introspection::ServiceTypeRegistration {
                        type_name: concat!(module_path!(), "::", stringify!(#ident)),
                        is_abstract: false,
                        markers: MARKERS,
                        constructor: Some(constructor),
                    }
                }

                autoreg::introspection::internal::submit! {
                    autoreg::introspection::internal::ServiceRegisterer {
                        register
                    }
                };
            };
        })
    } else {
        Err(Error::new(
            input.span(),
            "Can only derive Service on structs!",
        ))
    }
}
