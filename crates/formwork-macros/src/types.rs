//! Type inspection helpers shared by the derive.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

/// If the type is `Option<T>`, returns `Some(&T)`. Otherwise `None`.
pub(crate) fn unwrap_option_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident == "Option" {
            if let syn::PathArguments::AngleBracketed(ref args) = segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner);
                }
            }
        }
    }
    None
}

/// Converts a `syn::Type` to a string for matching.
pub(crate) fn type_to_string(ty: &Type) -> String {
    quote!(#ty).to_string()
}

/// Names the `ScalarCategory` variant for a field type, looking through `Option`.
pub(crate) fn category_name(ty: &Type) -> &'static str {
    let inner = unwrap_option_type(ty).unwrap_or(ty);
    match type_to_string(inner).as_str() {
        "String" | "& str" | "& 'static str" | "char" | "std :: string :: String" => "Text",
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => "Integer",
        "f32" | "f64" => "Float",
        "bool" => "Boolean",
        _ => "Other",
    }
}

/// Whether the type has no form-value conversion.
pub(crate) fn is_other_category(ty: &Type) -> bool {
    category_name(ty) == "Other"
}

/// Maps a field type to its `ScalarCategory` path.
pub(crate) fn scalar_category(ty: &Type) -> TokenStream {
    let variant = syn::Ident::new(category_name(ty), proc_macro2::Span::call_site());
    quote! { ::formwork_forms::ScalarCategory::#variant }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_unwrap_option_type() {
        let ty: Type = parse_quote!(Option<i64>);
        let inner = unwrap_option_type(&ty).unwrap();
        assert_eq!(type_to_string(inner), "i64");

        let ty: Type = parse_quote!(String);
        assert!(unwrap_option_type(&ty).is_none());
    }

    #[test]
    fn test_scalar_category() {
        let cases: [(Type, &str); 6] = [
            (parse_quote!(String), "Text"),
            (parse_quote!(u32), "Integer"),
            (parse_quote!(Option<f64>), "Float"),
            (parse_quote!(bool), "Boolean"),
            (parse_quote!(std::string::String), "Text"),
            (parse_quote!(Vec<u8>), "Other"),
        ];
        for (ty, expected) in cases {
            let tokens = scalar_category(&ty).to_string();
            assert!(tokens.ends_with(expected), "{tokens} should end with {expected}");
        }
    }

    #[test]
    fn test_is_other_category() {
        assert!(is_other_category(&parse_quote!(Vec<String>)));
        assert!(is_other_category(&parse_quote!(Option<Vec<u8>>)));
        assert!(!is_other_category(&parse_quote!(Option<bool>)));
        assert!(!is_other_category(&parse_quote!(String)));
    }
}
