use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput};

pub fn macro_deref(input: DeriveInput) -> TokenStream {
    let ident = input.ident;
    let generics = input.generics;
    let Data::Struct(data) = input.data else {
        return syn::Error::new(ident.span(), "Deref can only be applied to structs")
            .into_compile_error()
            .into();
    };

    let mut marked = data
        .fields
        .iter()
        .filter(|field| field.attrs.iter().any(|attr| attr.path().is_ident("deref")));

    let target = match (marked.next(), marked.next()) {
        (Some(field), None) => field,
        (Some(_), Some(extra)) => {
            return syn::Error::new_spanned(&extra.ty, "only one field can carry #[deref]")
                .into_compile_error()
                .into();
        }
        (None, _) => {
            return syn::Error::new(ident.span(), "mark exactly one field with #[deref]")
                .into_compile_error()
                .into();
        }
    };

    let Some(target_ident) = target.ident.as_ref() else {
        return syn::Error::new_spanned(&target.ty, "#[deref] requires a named field")
            .into_compile_error()
            .into();
    };
    let target_ty = &target.ty;

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote!(
        impl #impl_generics core::ops::Deref for #ident #ty_generics #where_clause {
            type Target = #target_ty;
            fn deref(&self) -> &Self::Target {
                &self.#target_ident
            }
        }

        impl #impl_generics core::ops::DerefMut for #ident #ty_generics #where_clause {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.#target_ident
            }
        }
    )
    .into()
}
