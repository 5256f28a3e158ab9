//! Parsing `rules = ...` from darling attributes.
//!
//! Accepts all of:
//! - `#[form(rules = "required,min=3")]` (comma-separated string)
//! - `#[form(rules("required", "min=3"))]` (parenthesized list)
//! - `#[form(rules = ["required", "min=3"])]` (array expression)

use darling::FromMeta;

/// The declared rules, one entry per rule, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleList(pub Vec<String>);

impl RuleList {
    /// The comma-separated form stored in the attribute table.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl FromMeta for RuleList {
    fn from_string(value: &str) -> darling::Result<Self> {
        Ok(Self(
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }

    fn from_list(items: &[darling::ast::NestedMeta]) -> darling::Result<Self> {
        items
            .iter()
            .map(|item| match item {
                darling::ast::NestedMeta::Lit(syn::Lit::Str(lit)) => Ok(lit.value()),
                _ => Err(darling::Error::unexpected_type("non-string literal")),
            })
            .collect::<darling::Result<Vec<String>>>()
            .map(Self)
    }

    fn from_expr(expr: &syn::Expr) -> darling::Result<Self> {
        match expr {
            syn::Expr::Array(arr) => arr
                .elems
                .iter()
                .map(|elem| {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(lit),
                        ..
                    }) = elem
                    {
                        Ok(lit.value())
                    } else {
                        Err(darling::Error::unexpected_type("non-string literal in array"))
                    }
                })
                .collect::<darling::Result<Vec<String>>>()
                .map(Self),
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => Self::from_string(&lit.value()),
            _ => Err(darling::Error::unexpected_expr_type(expr)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_from_string() {
        let rules = RuleList::from_string("required, min=3,").unwrap();
        assert_eq!(rules.0, vec!["required", "min=3"]);
        assert_eq!(rules.joined(), "required,min=3");
    }

    #[test]
    fn test_from_array_expr() {
        let expr: syn::Expr = parse_quote!(["required", "email"]);
        let rules = RuleList::from_expr(&expr).unwrap();
        assert_eq!(rules.joined(), "required,email");
    }

    #[test]
    fn test_rejects_non_string() {
        let expr: syn::Expr = parse_quote!([1, 2]);
        assert!(RuleList::from_expr(&expr).is_err());
    }
}
