//! Code generation for the `TableMetadata` implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::parsing::TableInfo;

/// Generated code names the trait through the facade crate, which re-exports
/// `query_object`.
pub fn generate_table_metadata_impl(input: &DeriveInput, table_info: &TableInfo) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let table_name = &table_info.name;

    let engine_fn = table_info.engine.as_ref().map(|engine| {
        quote! {
            fn engine() -> ::clickhaus::query_object::TableEngine {
                ::clickhaus::query_object::TableEngine::from_name(#engine)
            }
        }
    });

    quote! {
        impl #impl_generics ::clickhaus::query_object::TableMetadata for #name #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #table_name
            }

            #engine_fn
        }
    }
}
