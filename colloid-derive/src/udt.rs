use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Type};

use crate::parse_field_attrs;

/// A struct field that takes part in the user-defined type.
pub struct UdtField {
    ident: syn::Ident,
    name: String,
    ty: Type,
    nullable: bool,
}

/// Collects the non-skipped named fields of a struct.
pub fn named_fields(input: &DeriveInput) -> syn::Result<Vec<UdtField>> {
    let data = match &input.data {
        syn::Data::Struct(data) => data,
        syn::Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "UserType cannot be derived for enums",
            ));
        }
        syn::Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "UserType cannot be derived for unions",
            ));
        }
    };

    let syn::Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "UserType can only be derived for structs with named fields",
        ));
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let name = attrs.rename.unwrap_or_else(|| ident.to_string());
        let (ty, nullable) = match option_inner(&field.ty) {
            Some(inner) => (inner, true),
            None => (field.ty.clone(), false),
        };
        fields.push(UdtField {
            ident,
            name,
            ty,
            nullable,
        });
    }
    Ok(fields)
}

/// Generates the `data_type()` method implementation.
pub fn generate_data_type(type_name: &str, fields: &[UdtField]) -> TokenStream {
    let field_types = fields.iter().map(|f| {
        let name = &f.name;
        let ty = &f.ty;
        quote! { (#name, <#ty as ::colloid_core::Marshal>::data_type()) }
    });

    quote! {
        fn data_type() -> ::colloid_core::DataType {
            let fields: ::std::vec::Vec<(&'static str, ::colloid_core::DataType)> =
                ::std::vec![#(#field_types),*];
            ::colloid_core::DataType::udt(#type_name, fields)
        }
    }
}

/// Generates the `to_value()` method implementation.
pub fn generate_to_value(fields: &[UdtField]) -> TokenStream {
    let values = fields.iter().map(|f| {
        let ident = &f.ident;
        if f.nullable {
            quote! {
                self.#ident
                    .as_ref()
                    .map(::colloid_core::Marshal::to_value)
                    .transpose()?
            }
        } else {
            quote! {
                ::std::option::Option::Some(::colloid_core::Marshal::to_value(&self.#ident)?)
            }
        }
    });

    quote! {
        fn to_value(&self) -> ::colloid_core::Result<::colloid_core::Value> {
            let values: ::std::vec::Vec<::std::option::Option<::colloid_core::Value>> =
                ::std::vec![#(#values),*];
            ::colloid_core::UserTypeValue::from_marshalled(
                <Self as ::colloid_core::Marshal>::data_type(),
                values,
            )
            .map(::colloid_core::Value::UserType)
        }
    }
}

/// Returns `T` for a field typed `Option<T>`.
fn option_inner(ty: &Type) -> Option<Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    extract_single_generic_arg(&segment.arguments)
}

/// Extract the single generic argument from angle brackets, e.g., T from Option<T>.
fn extract_single_generic_arg(args: &syn::PathArguments) -> Option<Type> {
    match args {
        syn::PathArguments::AngleBracketed(angle) => {
            if angle.args.len() == 1 {
                if let syn::GenericArgument::Type(ty) = &angle.args[0] {
                    return Some(ty.clone());
                }
            }
            None
        }
        _ => None,
    }
}

/// Converts a Rust type name such as `PostalAddress` to `postal_address`.
pub fn snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut result = String::with_capacity(ident.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_names() {
        assert_eq!(snake_case("Address"), "address");
        assert_eq!(snake_case("PostalAddress"), "postal_address");
        assert_eq!(snake_case("HTTPRequest"), "http_request");
        assert_eq!(snake_case("Point3D"), "point3_d");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn option_fields_are_nullable() {
        let input: DeriveInput = syn::parse_quote! {
            struct Contact {
                name: String,
                #[colloid(rename = "mail")]
                email: Option<String>,
                #[colloid(skip)]
                cache: Vec<u8>,
            }
        };
        let fields = named_fields(&input).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name, "mail");
        assert!(fields[1].nullable);
        assert!(!fields[0].nullable);
    }

    #[test]
    fn rejects_non_struct_inputs() {
        let input: DeriveInput = syn::parse_quote! { enum Shape { Circle, Square } };
        assert!(named_fields(&input).is_err());
        let input: DeriveInput = syn::parse_quote! { struct Pair(i32, i32); };
        assert!(named_fields(&input).is_err());
    }
}
