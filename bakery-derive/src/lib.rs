extern crate proc_macro2;
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{
    parse_macro_input, parse_quote, spanned::Spanned, Data, DeriveInput, Fields, GenericParam,
    Generics,
};

/// Implements `bakery::Recipe` for the derived type: a struct maps onto a recipe `Structure`,
/// a fieldless enum onto an `Enum`, and an enum carrying data onto a `Variant` (spec §3's
/// distinction between named integer constants and a tagged union).
#[proc_macro_derive(Recipe)]
pub fn derive_bakery(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;
    let generics = add_trait_bounds(input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let implementation = match &input.data {
        Data::Struct(data) => struct_body(data),
        Data::Enum(data) => {
            if data.variants.iter().all(|v| matches!(v.fields, Fields::Unit)) {
                enum_body(data)
            } else {
                variant_body(data)
            }
        }
        Data::Union(_) => unimplemented!("Recipe cannot be derived for unions"),
    };

    let expanded = quote! {
        impl #impl_generics bakery::Recipe for #name #ty_generics #where_clause {
            fn recipe(tree: &mut bakery::NodeTree) -> bakery::TypeInstantiation {
                #implementation
            }
        }
    };

    proc_macro::TokenStream::from(expanded)
}

fn add_trait_bounds(mut generics: Generics) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(bakery::Recipe));
        }
    }
    generics
}

fn struct_body(data: &syn::DataStruct) -> TokenStream {
    let fields = match &data.fields {
        Fields::Named(fields) => fields.named.iter().map(|f| {
            let field_name = &f.ident;
            let ty = &f.ty;
            quote_spanned! { f.span() =>
                let field_ty = <#ty as bakery::Recipe>::recipe(tree);
                tree.create_struct_member(nid, stringify!(#field_name), field_ty);
            }
        }),
        Fields::Unnamed(_) | Fields::Unit => unimplemented!("Recipe requires named struct fields"),
    };
    quote! {
        let nid = tree.create_struct(None, "");
        #( #fields )*
        bakery::node_type_inst(nid)
    }
}

fn enum_body(data: &syn::DataEnum) -> TokenStream {
    let variants = data.variants.iter().enumerate().map(|(i, v)| {
        let variant_name = &v.ident;
        let i = i as i32;
        quote! {
            tree.create_enum_member(nid, stringify!(#variant_name), #i);
        }
    });
    quote! {
        let nid = tree.create_enum(None, "");
        #( #variants )*
        bakery::node_type_inst(nid)
    }
}

fn variant_body(data: &syn::DataEnum) -> TokenStream {
    let variants = data.variants.iter().map(|v| {
        let variant_name = &v.ident;
        let payload = match &v.fields {
            Fields::Unit => quote! {
                bakery::node_type_inst(tree.create_struct(None, ""))
            },
            Fields::Named(fields) => {
                let field_setup = fields.named.iter().map(|f| {
                    let field_name = &f.ident;
                    let ty = &f.ty;
                    quote_spanned! { f.span() =>
                        let field_ty = <#ty as bakery::Recipe>::recipe(tree);
                        tree.create_struct_member(nid_payload, stringify!(#field_name), field_ty);
                    }
                });
                quote! {
                    {
                        let nid_payload = tree.create_struct(None, "");
                        #( #field_setup )*
                        bakery::node_type_inst(nid_payload)
                    }
                }
            }
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                let ty = &fields.unnamed[0].ty;
                quote! { <#ty as bakery::Recipe>::recipe(tree) }
            }
            Fields::Unnamed(fields) => {
                let vars: Vec<_> = (0..fields.unnamed.len())
                    .map(|i| syn::Ident::new(&format!("field_ty_{}", i), proc_macro2::Span::call_site()))
                    .collect();
                let bindings = fields.unnamed.iter().zip(&vars).map(|(f, var)| {
                    let ty = &f.ty;
                    quote_spanned! { f.span() => let #var = <#ty as bakery::Recipe>::recipe(tree); }
                });
                quote! {
                    {
                        #( #bindings )*
                        bakery::tuple_type_inst(tree, vec![ #( #vars ),* ])
                    }
                }
            }
        };
        quote! {
            let payload_ty = #payload;
            tree.create_variant_member(nid, stringify!(#variant_name), payload_ty);
        }
    });
    quote! {
        let nid = tree.create_variant(None, "");
        #( #variants )*
        bakery::node_type_inst(nid)
    }
}
