use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, parse_macro_input};

/// How a field value is rendered after its key.
enum ValueFormat {
    Display,
    Debug,
}

pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Every named field becomes a `\n\t<key><pad> = <value>` line, keys padded
/// to the longest. `#[kv(fmt = "debug")]` switches a field to `{:?}`.
fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "KvDisplay can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "KvDisplay requires named fields",
        ));
    };

    let fields = named
        .named
        .iter()
        .map(|field| Ok((field, value_format(field)?)))
        .collect::<syn::Result<Vec<_>>>()?;

    let width = fields
        .iter()
        .filter_map(|(field, _)| field.ident.as_ref())
        .map(|ident| ident.to_string().len())
        .max()
        .unwrap_or(0);

    let writes = fields.iter().filter_map(|(field, format)| {
        let ident = field.ident.as_ref()?;
        let prefix = format!("\n\t{:<width$} = ", ident.to_string());
        let value = match format {
            ValueFormat::Display => quote! { std::fmt::Display::fmt(&self.#ident, f)?; },
            ValueFormat::Debug => quote! { std::fmt::Debug::fmt(&self.#ident, f)?; },
        };
        Some(quote! {
            f.write_str(#prefix)?;
            #value
        })
    });

    let struct_ident = &input.ident;
    Ok(quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                #(#writes)*
                Ok(())
            }
        }
    })
}

fn value_format(field: &Field) -> syn::Result<ValueFormat> {
    let mut format = ValueFormat::Display;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("kv")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("fmt") {
                return Err(meta.error("expected `fmt = \"display\"` or `fmt = \"debug\"`"));
            }
            let lit: LitStr = meta.value()?.parse()?;
            format = match lit.value().as_str() {
                "display" => ValueFormat::Display,
                "debug" => ValueFormat::Debug,
                other => {
                    return Err(syn::Error::new_spanned(
                        &lit,
                        format!("unsupported kv fmt: {other}"),
                    ));
                }
            };
            Ok(())
        })?;
    }
    Ok(format)
}
