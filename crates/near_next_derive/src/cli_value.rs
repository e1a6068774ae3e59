use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input};

use crate::utils;

/// One accepted spelling set for a unit variant.
struct ValueVariant {
    ident: Ident,
    canonical: String,
    aliases: Vec<String>,
}

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Enum attribute `#[cli_value(option = "name")]` sets the `--name` used in
/// errors; variant attribute `#[cli(alias = "...")]` adds extra spellings.
fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "CliValue can only be derived for enums",
        ));
    };

    let option = option_name(&input.ident, &input.attrs)?;
    let variants = data_enum
        .variants
        .iter()
        .map(|variant| {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    &variant.ident,
                    "CliValue variants cannot carry fields",
                ));
            }
            Ok(ValueVariant {
                ident: variant.ident.clone(),
                canonical: utils::to_kebab_case(&variant.ident.to_string()),
                aliases: variant_aliases(&variant.attrs)?,
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let expected = variants
        .iter()
        .map(|v| v.canonical.as_str())
        .collect::<Vec<_>>()
        .join("|");

    let as_str_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let canonical = &v.canonical;
        quote! { Self::#ident => #canonical }
    });
    let parse_arms = variants.iter().map(|v| {
        let ident = &v.ident;
        let spellings = std::iter::once(&v.canonical).chain(&v.aliases);
        quote! { #(#spellings)|* => Ok(Self::#ident) }
    });

    let enum_ident = &input.ident;
    Ok(quote! {
        impl #enum_ident {
            /// Accepted values, `|`-separated, for usage and error text.
            pub const fn expected() -> &'static str {
                #expected
            }

            pub const fn as_str(&self) -> &'static str {
                match self {
                    #(#as_str_arms,)*
                }
            }

            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    #(#parse_arms,)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option,
                        raw,
                        Self::expected()
                    ))),
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    })
}

fn option_name(ident: &Ident, attrs: &[Attribute]) -> syn::Result<String> {
    let mut option = utils::to_kebab_case(&ident.to_string());
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                option = meta.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else {
                Err(meta.error("expected `option = \"...\"`"))
            }
        })?;
    }
    Ok(option)
}

fn variant_aliases(attrs: &[Attribute]) -> syn::Result<Vec<String>> {
    let mut aliases = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                aliases.push(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("expected `alias = \"...\"`"))
            }
        })?;
    }
    Ok(aliases)
}
