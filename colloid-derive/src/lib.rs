use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

mod udt;

/// Derive macro mapping a struct onto a user-defined type.
///
/// Implements `colloid_core::Marshal`: the descriptor is a `udt` with one
/// field per struct field, in declaration order, and `to_value` builds the
/// matching `UserTypeValue`, failing if a field value does not conform.
/// `Option<T>` fields become nullable fields of type `T`.
///
/// # Example
///
/// ```ignore
/// use colloid_core::{Marshal, UserType};
///
/// #[derive(UserType)]
/// struct PostalAddress {
///     street: String,
///     #[colloid(rename = "zip_code")]
///     zip: i32,
///     note: Option<String>,
/// }
///
/// assert_eq!(PostalAddress::data_type().to_string(), "postal_address");
/// ```
///
/// # Attributes
///
/// - `#[colloid(name = "name")]` on the struct - Use a custom type name
///   (default: snake_case struct name)
/// - `#[colloid(rename = "name")]` - Use a custom field name
/// - `#[colloid(skip)]` - Leave this field out of the type
#[proc_macro_derive(UserType, attributes(colloid))]
pub fn derive_user_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_user_type_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_user_type_impl(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let where_clause = build_where_clause(&input.generics, where_clause);

    let fields = udt::named_fields(input)?;
    let type_name = parse_type_attrs(&input.attrs)?
        .name
        .unwrap_or_else(|| udt::snake_case(&name.to_string()));

    let data_type_impl = udt::generate_data_type(&type_name, &fields);
    let to_value_impl = udt::generate_to_value(&fields);

    Ok(quote! {
        impl #impl_generics ::colloid_core::Marshal for #name #ty_generics #where_clause {
            #data_type_impl
            #to_value_impl
        }
    })
}

fn build_where_clause(
    generics: &syn::Generics,
    existing: Option<&syn::WhereClause>,
) -> proc_macro2::TokenStream {
    let type_params: Vec<_> = generics.type_params().map(|p| &p.ident).collect();

    if type_params.is_empty() && existing.is_none() {
        return quote! {};
    }

    let marshal_bounds = type_params.iter().map(|p| {
        quote! { #p: ::colloid_core::Marshal }
    });

    let existing_predicates = existing
        .map(|w| {
            let predicates = &w.predicates;
            quote! { #predicates, }
        })
        .unwrap_or_default();

    quote! {
        where
            #existing_predicates
            #(#marshal_bounds),*
    }
}

#[derive(Default)]
struct TypeAttrs {
    name: Option<String>,
}

fn parse_type_attrs(attrs: &[syn::Attribute]) -> syn::Result<TypeAttrs> {
    let mut result = TypeAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("colloid") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }

    Ok(result)
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub skip: bool,
    pub rename: Option<String>,
}

pub(crate) fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("colloid") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                result.rename = Some(value.value());
            } else {
                return Err(meta.error("expected `skip` or `rename = \"...\"`"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}
