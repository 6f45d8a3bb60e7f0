use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Ident, LitStr, Type};

/// Derive a partial "props" companion for a configuration struct.
///
/// Every field of the annotated struct becomes an `Option` on the generated
/// `<Name>Props` struct. Resolving the props takes each field from the props
/// when set and from the defaults otherwise (per field, not all-or-nothing).
///
/// # Attributes on fields
/// - `#[prop(default = "expr")]` - Default value used when the field is not set.
///   Fields without it fall back to `Default::default()`.
///
/// # Generated items
/// - `impl Default for Name` built from the declared defaults
/// - `NameProps` with one chainable setter per field
/// - `NameProps::resolve()` and `NameProps::resolve_over(&base)`
/// - `Name::props()` and `From<NameProps> for Name`
///
/// Field types must implement `Clone`, `Debug` and `PartialEq`.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Debug, PartialEq, Props)]
/// pub struct RingConfig {
///     #[prop(default = "400.0")]
///     pub diameter: f32,
///     #[prop(default = "3")]
///     pub rings: usize,
/// }
///
/// let config = RingConfig::props().rings(5).resolve();
/// assert_eq!(config.diameter, 400.0);
/// ```
#[proc_macro_derive(Props, attributes(prop))]
pub fn derive_props(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_props(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

struct PropField {
    name: Ident,
    ty: Type,
    docs: Vec<Attribute>,
    default_value: Option<Expr>,
}

fn expand_props(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Props cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Props can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Props can only be derived for structs",
            ))
        }
    };

    let mut prop_fields = Vec::new();

    for field in fields {
        let Some(name) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };

        let mut default_value = None;
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("prop")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    let literal: LitStr = meta.value()?.parse()?;
                    default_value = Some(literal.parse::<Expr>()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported prop attribute, expected `default = \"...\"`"))
                }
            })?;
        }

        let docs = field
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("doc"))
            .cloned()
            .collect();

        prop_fields.push(PropField {
            name,
            ty: field.ty.clone(),
            docs,
            default_value,
        });
    }

    let props_name = format_ident!("{}Props", struct_name);
    let props_doc = format!(
        "Partial [`{}`]: unset fields fall back to the defaults when resolved.",
        struct_name
    );

    let default_inits = prop_fields.iter().map(|field| {
        let name = &field.name;
        match &field.default_value {
            Some(default) => quote! { #name: #default },
            None => quote! { #name: ::core::default::Default::default() },
        }
    });

    let props_fields = prop_fields.iter().map(|field| {
        let name = &field.name;
        let ty = &field.ty;
        let docs = &field.docs;
        quote! {
            #(#docs)*
            #vis #name: ::core::option::Option<#ty>
        }
    });

    let setters = prop_fields.iter().map(|field| {
        let name = &field.name;
        let ty = &field.ty;
        let docs = &field.docs;
        quote! {
            #(#docs)*
            #vis fn #name(mut self, value: #ty) -> Self {
                self.#name = ::core::option::Option::Some(value);
                self
            }
        }
    });

    let merges = prop_fields.iter().map(|field| {
        let name = &field.name;
        quote! {
            #name: match &self.#name {
                ::core::option::Option::Some(value) => ::core::clone::Clone::clone(value),
                ::core::option::Option::None => ::core::clone::Clone::clone(&base.#name),
            }
        }
    });

    let expanded = quote! {
        impl ::core::default::Default for #struct_name {
            fn default() -> Self {
                Self {
                    #(#default_inits,)*
                }
            }
        }

        #[doc = #props_doc]
        #[derive(Clone, Debug, Default, PartialEq)]
        #vis struct #props_name {
            #(#props_fields,)*
        }

        impl #props_name {
            /// Props with every field unset.
            #vis fn new() -> Self {
                ::core::default::Default::default()
            }

            #(#setters)*

            /// Merge the set fields over the defaults.
            #vis fn resolve(&self) -> #struct_name {
                self.resolve_over(&<#struct_name as ::core::default::Default>::default())
            }

            /// Merge the set fields over `base`, field by field.
            #vis fn resolve_over(&self, base: &#struct_name) -> #struct_name {
                #struct_name {
                    #(#merges,)*
                }
            }
        }

        impl #struct_name {
            /// Start an empty set of props for this configuration.
            #vis fn props() -> #props_name {
                #props_name::new()
            }
        }

        impl ::core::convert::From<#props_name> for #struct_name {
            fn from(props: #props_name) -> Self {
                props.resolve()
            }
        }
    };

    Ok(expanded)
}
