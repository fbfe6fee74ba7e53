//! `#[derive(WalkAst)]`: generates `crate::walk::Walk` for AST nodes.
//!
//! Every field is walked in declaration order. Fields that carry no child
//! nodes worth visiting (identifier lists, raw spans) can opt out with
//! `#[walk(skip)]`.

use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Index, parse_macro_input, spanned::Spanned};

#[proc_macro_derive(WalkAst, attributes(walk))]
pub fn derive_walk_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let walk_body = match walk_body(&input.data) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = quote_spanned! {span =>
        impl<'ast> crate::walk::Walk<'ast> for #name {
            #[inline]
            #[allow(unused_variables)]
            fn walk<V: crate::walk::Visitor<'ast> + ?Sized>(
                &self,
                a: &'ast crate::ast::AstArena,
                v: &mut V
            ) {
                #walk_body
            }
        }
    };

    expanded.into()
}

fn walk_body(data: &Data) -> syn::Result<proc_macro2::TokenStream> {
    match data {
        Data::Struct(data_struct) => struct_walk(&data_struct.fields),
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| variant_arm(&variant.ident, &variant.fields))
                .collect::<syn::Result<Vec<_>>>()?;

            Ok(quote! {
                match self {
                    #(#arms)*
                }
            })
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            "WalkAst cannot be derived for unions",
        )),
    }
}

fn struct_walk(fields: &Fields) -> syn::Result<proc_macro2::TokenStream> {
    let mut calls = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if is_skipped(field)? {
            continue;
        }
        let access = match &field.ident {
            Some(ident) => quote! { &self.#ident },
            None => {
                let index = Index::from(i);
                quote! { &self.#index }
            }
        };
        calls.push(quote! { crate::walk::Walk::walk(#access, a, v); });
    }
    Ok(quote! { #(#calls)* })
}

fn variant_arm(variant: &syn::Ident, fields: &Fields) -> syn::Result<proc_macro2::TokenStream> {
    match fields {
        Fields::Unit => Ok(quote! { Self::#variant => {} }),
        Fields::Named(named) => named_arm(variant, named),
        Fields::Unnamed(unnamed) => {
            let mut bindings = Vec::new();
            let mut calls = Vec::new();
            for (i, field) in unnamed.unnamed.iter().enumerate() {
                let var = format_ident!("f{}", i);
                if is_skipped(field)? {
                    bindings.push(quote! { _ });
                } else {
                    calls.push(quote! { crate::walk::Walk::walk(#var, a, v); });
                    bindings.push(quote! { #var });
                }
            }
            Ok(quote! {
                Self::#variant(#(#bindings),*) => {
                    #(#calls)*
                }
            })
        }
    }
}

fn named_arm(variant: &syn::Ident, named: &syn::FieldsNamed) -> syn::Result<proc_macro2::TokenStream> {
    let mut bindings = Vec::new();
    let mut calls = Vec::new();
    for field in &named.named {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "named field without ident"));
        };
        if is_skipped(field)? {
            continue;
        }
        bindings.push(quote! { #ident });
        calls.push(quote! { crate::walk::Walk::walk(#ident, a, v); });
    }
    Ok(quote! {
        Self::#variant { #(#bindings,)* .. } => {
            #(#calls)*
        }
    })
}

fn is_skipped(field: &Field) -> syn::Result<bool> {
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("walk")) {
        if walk_attr_is_skip(attr)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn walk_attr_is_skip(attr: &Attribute) -> syn::Result<bool> {
    let mut skip = false;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("skip") {
            skip = true;
            Ok(())
        } else {
            Err(meta.error("unsupported walk attribute; expected `skip`"))
        }
    })?;
    Ok(skip)
}
