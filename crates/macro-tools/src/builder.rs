use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, Field, Ident, Meta};

use crate::fields::is_scalar_type;

// `#[default = literal]` or `#[default(expr)]` for anything that is not a literal
fn default_value(field: &Field) -> Option<Expr> {
    field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("default"))
        .and_then(|attr| match &attr.meta {
            Meta::Path(_) => None,
            Meta::NameValue(meta) => Some(meta.value.clone()),
            Meta::List(list) => list.parse_args::<Expr>().ok(),
        })
}

// `#[builder(skip)]` or `#[shared(skip)]` keeps the field out of the setter list
fn has_setter(field: &Field) -> bool {
    field
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("builder") || attr.path().is_ident("shared"))
        .all(|attr| {
            let mut skip = false;
            let _ = attr.parse_nested_meta(|meta| {
                skip |= meta.path.is_ident("skip");
                Ok(())
            });
            !skip
        })
}

pub fn macro_builder(input: DeriveInput) -> TokenStream {
    let origin_ident = input.ident;
    let generics = input.generics;
    let vis = input.vis;

    let Data::Struct(data) = input.data else {
        return syn::Error::new(origin_ident.span(), "Builder can only be applied to structs")
            .into_compile_error()
            .into();
    };

    let ident = Ident::new(&format!("{}Builder", origin_ident), origin_ident.span());

    let mut declared = Vec::new();
    let mut defaults = Vec::new();
    let mut moved = Vec::new();
    let mut setters = Vec::new();

    for field in data.fields.iter() {
        let field_ident = &field.ident;
        let ty = &field.ty;

        declared.push(quote!(#field_ident: #ty,));

        defaults.push(match default_value(field) {
            Some(expr) => quote!(#field_ident: #expr,),
            None => quote!(#field_ident: Default::default(),),
        });

        moved.push(quote!(#field_ident: value.#field_ident,));

        if has_setter(field) && is_scalar_type(ty) {
            setters.push(quote!(
                pub fn #field_ident(mut self, value: #ty) -> Self {
                    self.#field_ident = value;
                    self
                }
            ));
        } else if has_setter(field) {
            setters.push(quote!(
                pub fn #field_ident(mut self, value: impl Into<#ty>) -> Self {
                    self.#field_ident = value.into();
                    self
                }
            ));
        }
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote!(
        #vis struct #ident #generics {
            #(#declared)*
        }

        impl #impl_generics Default for #ident #ty_generics #where_clause {
            fn default() -> Self {
                Self {
                    #(#defaults)*
                }
            }
        }

        impl #impl_generics Default for #origin_ident #ty_generics #where_clause {
            fn default() -> Self {
                #ident::default().into()
            }
        }

        impl #impl_generics From<#ident #ty_generics> for #origin_ident #ty_generics #where_clause {
            fn from(value: #ident #ty_generics) -> Self {
                Self {
                    #(#moved)*
                }
            }
        }

        impl #impl_generics #ident #ty_generics #where_clause {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn build(self) -> #origin_ident #ty_generics {
                self.into()
            }

            #(#setters)*
        }
    )
    .into()
}
