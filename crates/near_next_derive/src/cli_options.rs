use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr, Path, parse_macro_input};

use crate::utils;

/// Parsed `#[cli(...)]` field attribute.
struct CliField<'a> {
    ident: &'a Ident,
    field: &'a Field,
    long: String,
    parse_with: Option<Path>,
    flag: bool,
}

pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Field attributes:
/// - `#[cli(long = "name")]` takes a value parsed with `FromStr`,
/// - `#[cli(long = "name", parse_with = "Type::parse")]` uses a custom parser,
/// - `#[cli(long = "name", flag)]` on a `bool` accepts `--name`, `--name=<bool>`
///   and `--no-name`.
///
/// Fields without `long` are not settable from the command line.
fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "CliOptions can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "CliOptions requires named fields",
        ));
    };

    let mut fields = Vec::new();
    for field in &named.named {
        if let Some(cli) = cli_field(field)? {
            fields.push(cli);
        }
    }

    let arms = fields.iter().map(option_arms);
    let struct_ident = &input.ident;
    Ok(quote! {
        impl #struct_ident {
            /// `--name=value` splits in place; `--name value` consumes the
            /// next argument unless it starts another option.
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                match raw_name.split_once('=') {
                    Some((name, value)) => (name.to_string(), Some(value.to_string())),
                    None => {
                        let value = args.next_if(|next| !next.starts_with("--"));
                        (raw_name.to_string(), value)
                    }
                }
            }

            fn parse_flag(name: &str, raw: &str) -> crate::Result<bool> {
                match raw.to_ascii_lowercase().as_str() {
                    "1" | "true" | "yes" | "on" => Ok(true),
                    "0" | "false" | "no" | "off" => Ok(false),
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid boolean for --{name}: {raw} (expected true/false)"
                    ))),
                }
            }

            /// `Ok(false)` for a name no field answers to.
            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms)*
                    _ => return Ok(false),
                }
                Ok(true)
            }
        }
    })
}

fn cli_field(field: &Field) -> syn::Result<Option<CliField<'_>>> {
    let mut long = None;
    let mut parse_with = None;
    let mut flag = false;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("long") {
                long = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("parse_with") {
                let lit: LitStr = meta.value()?.parse()?;
                parse_with = Some(lit.parse::<Path>()?);
            } else if meta.path.is_ident("flag") {
                flag = true;
            } else {
                return Err(meta.error("expected `long`, `parse_with` or `flag`"));
            }
            Ok(())
        })?;
    }

    let (Some(long), Some(ident)) = (long, field.ident.as_ref()) else {
        return Ok(None);
    };
    if flag && parse_with.is_some() {
        return Err(syn::Error::new_spanned(
            ident,
            "`flag` fields are parsed as booleans and cannot use `parse_with`",
        ));
    }
    Ok(Some(CliField {
        ident,
        field,
        long,
        parse_with,
        flag,
    }))
}

fn option_arms(cli: &CliField<'_>) -> TokenStream2 {
    let ident = cli.ident;
    let long = &cli.long;

    if cli.flag {
        let negated = format!("no-{long}");
        return quote! {
            #long => {
                self.#ident = match value {
                    Some(raw) => Self::parse_flag(name, &raw)?,
                    None => true,
                };
            }
            #negated => {
                if value.is_some() {
                    return Err(crate::Error::invalid_input(format!(
                        "Flag --{name} does not take a value"
                    )));
                }
                self.#ident = false;
            }
        };
    }

    let parse = utils::build_cli_parse_expr(&cli.field.ty, cli.parse_with.as_ref());
    quote! {
        #long => {
            let Some(raw) = value else {
                return Err(crate::Error::invalid_input(format!(
                    "Missing value for --{name}"
                )));
            };
            self.#ident = #parse;
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::expand;

    #[test]
    fn flags_get_a_negated_arm() {
        let input: DeriveInput = parse_quote! {
            struct Opts {
                #[cli(long = "close-tour", flag)]
                close_tour: bool,
            }
        };
        let out = expand(&input).expect("expand").to_string();
        assert!(out.contains("\"close-tour\" =>"));
        assert!(out.contains("\"no-close-tour\" =>"));
        assert!(out.contains("does not take a value"));
    }

    #[test]
    fn valued_options_use_the_custom_parser_when_given() {
        let input: DeriveInput = parse_quote! {
            struct Opts {
                #[cli(long = "search-mode", parse_with = "SearchMode::parse")]
                search_mode: SearchMode,
                #[cli(long = "window")]
                window: usize,
                untouched: usize,
            }
        };
        let out = expand(&input).expect("expand").to_string();
        assert!(out.contains("SearchMode :: parse (& raw) ?"));
        assert!(out.contains("raw . parse :: < usize > ()"));
        assert!(!out.contains("\"untouched\""));
        assert!(!out.contains("\"no-window\""));
    }

    #[test]
    fn flag_with_parser_and_unknown_keys_are_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Opts {
                #[cli(long = "x", flag, parse_with = "parse_x")]
                x: bool,
            }
        };
        let err = expand(&input).expect_err("flag plus parser");
        assert!(err.to_string().contains("cannot use `parse_with`"));

        let input: DeriveInput = parse_quote! {
            struct Opts {
                #[cli(short = "x")]
                x: bool,
            }
        };
        let err = expand(&input).expect_err("short is not supported");
        assert!(err.to_string().contains("expected `long`"));
    }

    #[test]
    fn enums_are_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Opts { A }
        };
        assert!(expand(&input).is_err());
    }
}
