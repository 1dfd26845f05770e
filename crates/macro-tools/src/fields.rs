use proc_macro::TokenStream;
use quote::{quote, ToTokens};
use syn::{parenthesized, Attribute, Data, DeriveInput, Field, Ident, Visibility};

// types that are handed out by value instead of by reference
const COPY_TYPES: [&str; 20] = [
    "bool", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128",
    "isize", "f32", "f64", "FloatNum", "Vector", "BodyId", "JointId", "ShapeKind",
];

// plain scalars, their setters take the exact type so literals infer
const SCALAR_TYPES: [&str; 18] = [
    "bool", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128",
    "isize", "f32", "f64", "FloatNum", "BodyId", "JointId",
];

#[derive(Clone)]
struct ReadAttr {
    vis: Visibility,
    copy: bool,
}

#[derive(Clone, Copy, PartialEq)]
enum WriteKind {
    /// `x_mut(&mut self) -> &mut T`
    Mut,
    /// `set_x(&mut self, value: impl Into<T>) -> &mut Self`, scalars take `T`
    Set,
    /// `set_x(&mut self, impl FnOnce(T) -> T) -> &mut Self`
    Reducer,
}

#[derive(Clone)]
struct WriteAttr {
    vis: Visibility,
    kind: WriteKind,
}

fn find_attr<'a>(attrs: &'a [Attribute], ident: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(ident))
}

fn is_skipped(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| ["shared", "r", "w"].iter().any(|k| attr.path().is_ident(k)))
        .any(|attr| {
            let mut skip = false;
            let _ = attr.parse_nested_meta(|meta| {
                skip |= meta.path.is_ident("skip");
                Ok(())
            });
            skip
        })
}

fn parse_read(attrs: &[Attribute], default_vis: &Visibility) -> Option<ReadAttr> {
    let attr = find_attr(attrs, "r")?;
    let mut read = ReadAttr {
        vis: default_vis.clone(),
        copy: false,
    };
    let _ = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("vis") {
            let content;
            parenthesized!(content in meta.input);
            read.vis = content.parse::<Visibility>()?;
        } else if meta.path.is_ident("copy") {
            read.copy = true;
        }
        Ok(())
    });
    Some(read)
}

fn parse_write(attrs: &[Attribute], default_vis: &Visibility) -> Option<WriteAttr> {
    let attr = find_attr(attrs, "w")?;
    let mut write = WriteAttr {
        vis: default_vis.clone(),
        kind: WriteKind::Mut,
    };
    let _ = attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("reducer") {
            write.kind = WriteKind::Reducer;
        } else if meta.path.is_ident("set") && write.kind != WriteKind::Reducer {
            write.kind = WriteKind::Set;
        } else if meta.path.is_ident("vis") {
            let content;
            parenthesized!(content in meta.input);
            write.vis = content.parse::<Visibility>()?;
        }
        Ok(())
    });
    Some(write)
}

fn type_name_in(ty: &syn::Type, names: &[&str]) -> bool {
    match ty {
        syn::Type::Path(path) => {
            let ty = path.into_token_stream().to_string();
            names.iter().any(|name| *name == ty)
        }
        _ => false,
    }
}

fn is_copy_type(field: &Field) -> bool {
    type_name_in(&field.ty, &COPY_TYPES)
}

pub(crate) fn is_scalar_type(ty: &syn::Type) -> bool {
    type_name_in(ty, &SCALAR_TYPES)
}

fn read_method(field: &Field, ident: &Ident, read: ReadAttr) -> proc_macro2::TokenStream {
    let ty = &field.ty;
    let vis = read.vis;
    if read.copy || is_copy_type(field) {
        quote!(
            #vis fn #ident(&self) -> #ty {
                self.#ident
            }
        )
    } else {
        quote!(
            #vis fn #ident(&self) -> &#ty {
                &self.#ident
            }
        )
    }
}

fn write_method(field: &Field, ident: &Ident, write: WriteAttr) -> proc_macro2::TokenStream {
    let ty = &field.ty;
    let vis = write.vis;
    match write.kind {
        WriteKind::Mut => {
            let mut_ident = Ident::new(&format!("{}_mut", ident), ident.span());
            quote!(
                #vis fn #mut_ident(&mut self) -> &mut #ty {
                    &mut self.#ident
                }
            )
        }
        WriteKind::Set => {
            let set_ident = Ident::new(&format!("set_{}", ident), ident.span());
            if is_scalar_type(ty) {
                quote!(
                    #vis fn #set_ident(&mut self, value: #ty) -> &mut Self {
                        self.#ident = value;
                        self
                    }
                )
            } else {
                quote!(
                    #vis fn #set_ident(&mut self, value: impl Into<#ty>) -> &mut Self {
                        self.#ident = value.into();
                        self
                    }
                )
            }
        }
        WriteKind::Reducer => {
            let set_ident = Ident::new(&format!("set_{}", ident), ident.span());
            quote!(
                #vis fn #set_ident(&mut self, reducer: impl FnOnce(#ty) -> #ty) -> &mut Self {
                    self.#ident = reducer(core::mem::take(&mut self.#ident));
                    self
                }
            )
        }
    }
}

pub fn macro_fields(input: DeriveInput) -> TokenStream {
    let ident = input.ident;
    let generics = input.generics;
    let input_vis = input.vis;

    let struct_read = parse_read(&input.attrs, &input_vis);
    let struct_write = parse_write(&input.attrs, &input_vis);

    let Data::Struct(data) = input.data else {
        return syn::Error::new(ident.span(), "Fields can only be applied to structs")
            .into_compile_error()
            .into();
    };

    let mut methods = Vec::new();
    for field in data.fields.iter().filter(|field| !is_skipped(&field.attrs)) {
        let Some(field_ident) = field.ident.clone() else {
            return syn::Error::new(ident.span(), "Fields requires named fields")
                .into_compile_error()
                .into();
        };

        if let Some(read) = parse_read(&field.attrs, &input_vis).or_else(|| struct_read.clone()) {
            methods.push(read_method(field, &field_ident, read));
        }

        if let Some(write) = parse_write(&field.attrs, &input_vis).or_else(|| struct_write.clone())
        {
            methods.push(write_method(field, &field_ident, write));
        }
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote!(
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#methods)*
        }
    )
    .into()
}
