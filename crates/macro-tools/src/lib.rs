//! Derive macros shared by the `weight` crates.
//!
//! * [`Fields`] generates accessors (`#[r]`) and mutators (`#[w]`) for struct fields.
//! * [`Builder`] generates a `XxxBuilder` with chained setters and a `Default` impl.
//! * [`Deref`] forwards `Deref`/`DerefMut` to the field marked `#[deref]`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod builder;
mod deref;
mod fields;

#[proc_macro_derive(Deref, attributes(deref))]
pub fn deref(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    deref::macro_deref(input)
}

#[proc_macro_derive(Builder, attributes(default, builder, shared))]
pub fn builder(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    builder::macro_builder(input)
}

#[proc_macro_derive(Fields, attributes(shared, r, w))]
pub fn fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    fields::macro_fields(input)
}
