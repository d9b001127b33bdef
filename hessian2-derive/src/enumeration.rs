//! Derive macro implementation for `HessianEnum`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit};

pub fn derive_enum_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let class_name =
        parse_str_attr(&input.attrs, "class_name").unwrap_or_else(|| name.to_string());

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => panic!("HessianEnum can only be derived for enums"),
    };
    if variants.is_empty() {
        panic!("HessianEnum requires at least one variant for the invalid sentinel");
    }

    let mut name_arms = Vec::new();
    let mut value_arms = Vec::new();
    let mut ordinal_arms = Vec::new();
    let mut from_ordinal_arms = Vec::new();
    let mut sentinel = None;

    for (index, variant) in variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            panic!("HessianEnum only supports unit variants");
        }
        let ident = &variant.ident;
        let wire_name = parse_str_attr(&variant.attrs, "name")
            .unwrap_or_else(|| camel_to_screaming(&ident.to_string()));
        let ordinal = index as i32;

        if sentinel.is_none() {
            sentinel = Some(ident.clone());
        }
        name_arms.push(quote! { Self::#ident => #wire_name, });
        value_arms.push(quote! { #wire_name => Self::#ident, });
        ordinal_arms.push(quote! { Self::#ident => #ordinal, });
        from_ordinal_arms.push(quote! { #ordinal => Self::#ident, });
    }
    let sentinel = sentinel.unwrap();

    let expanded = quote! {
        impl #impl_generics hessian2_core::HessianEnum for #name #ty_generics #where_clause {
            fn java_class_name() -> &'static str {
                #class_name
            }

            fn string_name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            fn enum_value(name: &str) -> Self {
                match name {
                    #(#value_arms)*
                    _ => Self::#sentinel,
                }
            }

            fn ordinal(&self) -> i32 {
                match self {
                    #(#ordinal_arms)*
                }
            }

            fn from_ordinal(ordinal: i32) -> Self {
                match ordinal {
                    #(#from_ordinal_arms)*
                    _ => Self::#sentinel,
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// `DarkBlue` -> `DARK_BLUE`, the Java convention for enum constants.
fn camel_to_screaming(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_uppercase());
    }
    out
}

fn parse_str_attr(attrs: &[syn::Attribute], key: &str) -> Option<String> {
    for attr in attrs {
        if !attr.path().is_ident("hessian") {
            continue;
        }
        let mut result = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                let value = meta.value()?;
                let lit: Lit = value.parse()?;
                if let Lit::Str(s) = lit {
                    result = Some(s.value());
                }
            }
            Ok(())
        });
        if result.is_some() {
            return result;
        }
    }
    None
}
