//! Derive macro implementation for `HessianObject`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit};

pub fn derive_object_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let class_name =
        parse_str_attr(&input.attrs, "class_name").unwrap_or_else(|| name.to_string());

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("HessianObject only supports structs with named fields"),
        },
        _ => panic!("HessianObject can only be derived for structs"),
    };

    let mut wire_names = Vec::new();
    let mut encode_arms = Vec::new();
    let mut decode_arms = Vec::new();

    for field in fields {
        if has_flag_attr(&field.attrs, "skip") {
            continue;
        }
        let field_ident = field.ident.as_ref().unwrap();
        let wire_name = parse_str_attr(&field.attrs, "field_name")
            .unwrap_or_else(|| snake_to_camel(&field_ident.to_string()));
        wire_names.push(wire_name.clone());

        let is_enum = has_flag_attr(&field.attrs, "enumeration");
        let (write, read) = field_codec(field_ident, &field.ty, is_enum);
        encode_arms.push(quote! { #wire_name => #write, });
        decode_arms.push(quote! { #wire_name => { #read } });
    }

    let expanded = quote! {
        impl #impl_generics hessian2_core::HessianObject for #name #ty_generics #where_clause {
            fn java_class_name(&self) -> &str {
                #class_name
            }

            fn field_names(&self) -> &'static [&'static str] {
                &[#(#wire_names),*]
            }

            fn encode_field(
                &self,
                name: &str,
                encoder: &mut hessian2_core::Encoder,
            ) -> hessian2_core::Result<()> {
                match name {
                    #(#encode_arms)*
                    _ => Err(hessian2_core::HessianError::UnknownField {
                        class: #class_name.to_string(),
                        field: name.to_string(),
                    }),
                }
            }

            fn decode_field(
                &mut self,
                name: &str,
                decoder: &mut hessian2_core::Decoder<'_>,
            ) -> hessian2_core::Result<()> {
                match name {
                    #(#decode_arms)*
                    _ => {
                        return Err(hessian2_core::HessianError::UnknownField {
                            class: #class_name.to_string(),
                            field: name.to_string(),
                        })
                    }
                }
                Ok(())
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    };

    TokenStream::from(expanded)
}

/// Builds the write expression and read statement for one field.
fn field_codec(
    ident: &syn::Ident,
    ty: &syn::Type,
    is_enum: bool,
) -> (TokenStream2, TokenStream2) {
    if is_enum {
        return if option_inner(ty).is_some() {
            (
                quote! {
                    match self.#ident {
                        Some(v) => encoder.write_enum(v),
                        None => encoder.write_null(),
                    }
                },
                quote! {
                    self.#ident = if decoder.peek_null()? {
                        None
                    } else {
                        Some(decoder.read_enum()?)
                    };
                },
            )
        } else {
            (
                quote! { encoder.write_enum(self.#ident) },
                quote! { self.#ident = decoder.read_enum()?; },
            )
        };
    }

    match option_inner(ty) {
        Some(inner) => {
            let inner_str = type_to_string(inner);
            let write_some = write_expr(&inner_str, quote!(v), true);
            let read_inner = read_expr(&inner_str, inner);
            (
                quote! {
                    match &self.#ident {
                        Some(v) => #write_some,
                        None => encoder.write_null(),
                    }
                },
                quote! {
                    self.#ident = if decoder.peek_null()? {
                        None
                    } else {
                        Some(#read_inner)
                    };
                },
            )
        }
        None => {
            let ty_str = type_to_string(ty);
            let write = write_expr(&ty_str, quote!(self.#ident), false);
            let read = read_expr(&ty_str, ty);
            (write, quote! { self.#ident = #read; })
        }
    }
}

/// Write expression for a value at `place`. With `deref`, `place` is a
/// reference binding (from `Some(v)`) rather than a field access.
fn write_expr(ty_str: &str, place: TokenStream2, deref: bool) -> TokenStream2 {
    let owned = if deref { quote!(*#place) } else { quote!(#place) };
    let by_ref = if deref { quote!(#place) } else { quote!(&#place) };
    match ty_str {
        "bool" => quote! { encoder.write_bool(#owned) },
        "i8" | "i16" | "i32" => quote! { encoder.write_i32(i32::from(#owned)) },
        "i64" => quote! { encoder.write_i64(#owned) },
        "isize" => quote! { encoder.write_i64(#owned as i64) },
        "f32" => quote! { encoder.write_f64(f64::from(#owned)) },
        "f64" => quote! { encoder.write_f64(#owned) },
        "String" => quote! { encoder.write_string(#by_ref) },
        "Vec<u8>" => quote! { encoder.write_binary(#by_ref) },
        "DateTime<Utc>" | "chrono::DateTime<chrono::Utc>" => {
            quote! { encoder.write_date(#owned) }
        }
        "Value" | "hessian2_core::Value" => quote! { encoder.encode(#by_ref) },
        "List" | "hessian2_core::List" => quote! { encoder.write_list(#by_ref) },
        "Map" | "hessian2_core::Map" => quote! { encoder.write_map(#by_ref) },
        _ => quote! { encoder.encode_object(#by_ref) },
    }
}

/// Read expression producing one value of the field's type.
fn read_expr(ty_str: &str, ty: &syn::Type) -> TokenStream2 {
    match ty_str {
        "bool" => quote! { decoder.read_bool()? },
        "i8" => quote! { decoder.read_i32()? as i8 },
        "i16" => quote! { decoder.read_i32()? as i16 },
        "i32" => quote! { decoder.read_i32()? },
        "i64" => quote! { decoder.read_i64()? },
        "isize" => quote! { decoder.read_i64()? as isize },
        "f32" => quote! { decoder.read_f64()? as f32 },
        "f64" => quote! { decoder.read_f64()? },
        "String" => quote! { decoder.read_string()? },
        "Vec<u8>" => quote! { decoder.read_bytes()? },
        "DateTime<Utc>" | "chrono::DateTime<chrono::Utc>" => quote! { decoder.read_date()? },
        "Value" | "hessian2_core::Value" => quote! { decoder.read_value()? },
        "List" | "hessian2_core::List" => quote! { decoder.read_list()? },
        "Map" | "hessian2_core::Map" => quote! { decoder.read_map()? },
        _ => quote! { decoder.decode_typed::<#ty>()? },
    }
}

/// Unwraps `Option<T>` to `T`, if the type is an option.
fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(syn::GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

/// `model_name` -> `modelName`, the Java convention for wire field names.
fn snake_to_camel(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn type_to_string(ty: &syn::Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
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

fn has_flag_attr(attrs: &[syn::Attribute], key: &str) -> bool {
    for attr in attrs {
        if !attr.path().is_ident("hessian") {
            continue;
        }
        let mut found = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                found = true;
            }
            Ok(())
        });
        if found {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::snake_to_camel;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("color"), "color");
        assert_eq!(snake_to_camel("model_name"), "modelName");
        assert_eq!(snake_to_camel("a_b_c"), "aBC");
    }
}
