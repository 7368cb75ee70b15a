use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta, Type};

/// Derive macro that describes the spreadsheet columns a record serializes to.
///
/// For each named field, in declaration order:
/// - Column header (the `#[serde(rename = "...")]` value, else the field name)
/// - Whether the column is filled on every line (false for `Option<T>` fields)
/// - Description (from doc comments)
///
/// Generates a `columns() -> &'static [SheetColumn]` method. `SheetColumn`
/// must be in scope at the derive site.
#[proc_macro_derive(SheetColumns, attributes(serde))]
pub fn derive_sheet_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "SheetColumns needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "SheetColumns only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let entries = fields.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        let header = serde_rename(&field.attrs).unwrap_or_else(|| ident.to_string());
        let every_line = !is_option(&field.ty);
        let description = doc_comment(&field.attrs);
        Some(quote! {
            SheetColumn {
                name: #header,
                every_line: #every_line,
                description: #description,
            }
        })
    });

    let expanded = quote! {
        impl #name {
            pub fn columns() -> &'static [SheetColumn] {
                static COLUMNS: &[SheetColumn] = &[
                    #(#entries),*
                ];
                COLUMNS
            }
        }
    };

    TokenStream::from(expanded)
}

fn serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        // Errors from unrelated serde keys are ignored; only `rename` matters here.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                rename = Some(lit.value());
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    rename
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
