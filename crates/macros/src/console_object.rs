//! ConsoleObject derive macro implementation

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::DeriveInput;

use crate::parse::{net_group_bits, net_type_variant, parse_console_object, ConsoleFieldArgs, ConsoleObjectArgs};

/// Generate the ConsoleObject and ConsoleClass implementations
pub fn derive_console_object(input: DeriveInput) -> TokenStream {
    match parse_console_object(&input) {
        Ok(args) => generate_impl(args).unwrap_or_else(syn::Error::into_compile_error),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: ConsoleObjectArgs) -> syn::Result<TokenStream> {
    let struct_name = &args.ident;

    if !args.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &args.generics,
            "ConsoleObject cannot be derived for generic structs",
        ));
    }

    let fields = match &args.data {
        darling::ast::Data::Struct(fields) => &fields.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "ConsoleObject can only be derived for structs",
            ))
        }
    };

    let class_name = args
        .class_name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());

    let mut parents = fields.iter().filter(|f| f.parent);
    let parent = parents.next();
    if let Some(extra) = parents.next() {
        return Err(syn::Error::new_spanned(
            &extra.ty,
            "a console class can have only one #[console(parent)] field",
        ));
    }

    for field in fields.iter().filter(|f| !f.is_console_field()) {
        if field.docs.is_some() || field.table.is_some() {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "`docs` and `table` require `field = \"Name\"`",
            ));
        }
    }

    let object_impl = generate_object_impl(struct_name, parent);
    let class_impl = generate_class_impl(&args, &class_name, parent, fields)?;

    Ok(quote! {
        #object_impl
        #class_impl
    })
}

fn generate_object_impl(struct_name: &syn::Ident, parent: Option<&ConsoleFieldArgs>) -> TokenStream {
    let (ancestor, ancestor_mut) = match parent.and_then(|p| p.ident.as_ref()) {
        Some(parent_ident) => (
            quote! { ::conobject_core::ConsoleObject::ancestor(&self.#parent_ident, class) },
            quote! { ::conobject_core::ConsoleObject::ancestor_mut(&mut self.#parent_ident, class) },
        ),
        None => (quote! { None }, quote! { None }),
    };

    quote! {
        impl ::conobject_core::ConsoleObject for #struct_name {
            fn class_name(&self) -> &'static str {
                <Self as ::conobject_core::ConsoleClass>::CLASS_NAME
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            fn ancestor(&self, class: ::core::any::TypeId) -> Option<&dyn ::core::any::Any> {
                if class == ::core::any::TypeId::of::<Self>() {
                    Some(self)
                } else {
                    #ancestor
                }
            }

            fn ancestor_mut(&mut self, class: ::core::any::TypeId) -> Option<&mut dyn ::core::any::Any> {
                if class == ::core::any::TypeId::of::<Self>() {
                    Some(self)
                } else {
                    #ancestor_mut
                }
            }
        }
    }
}

fn generate_class_impl(
    args: &ConsoleObjectArgs,
    class_name: &str,
    parent: Option<&ConsoleFieldArgs>,
    fields: &[ConsoleFieldArgs],
) -> syn::Result<TokenStream> {
    let struct_name = &args.ident;

    let net_type = match &args.net_type {
        Some(value) => {
            let variant = net_type_variant(value).ok_or_else(|| {
                syn::Error::new(
                    Span::call_site(),
                    format!("unknown net_type `{}` (expected object, datablock or event)", value),
                )
            })?;
            let variant = format_ident!("{}", variant);
            quote! { Some(::conobject_core::NetClassType::#variant) }
        }
        None => quote! { None },
    };

    let group_bits = match (&args.net_groups, &args.net_type) {
        (Some(groups), _) => {
            net_group_bits(groups).map_err(|e| syn::Error::new(Span::call_site(), e))?
        }
        (None, Some(_)) => 1,
        (None, None) => 0,
    };

    let parent_class = match parent {
        Some(p) => {
            let ty = &p.ty;
            quote! { Some(::core::any::TypeId::of::<#ty>()) }
        }
        None => quote! { None },
    };

    let container_child = match &args.container_child {
        Some(path) => quote! { Some(::core::any::TypeId::of::<#path>()) },
        None => quote! { None },
    };

    let field_decls: Vec<_> = fields
        .iter()
        .filter(|f| f.is_console_field())
        .map(|f| generate_field_decl(struct_name, f))
        .collect();

    let extra_fields = args
        .persist_fields
        .as_ref()
        .map(|path| quote! { #path(fields); });

    let declare_callbacks = args
        .callbacks
        .as_ref()
        .map(|path| quote! { #path(callbacks); });

    Ok(quote! {
        impl ::conobject_core::ConsoleClass for #struct_name {
            const CLASS_NAME: &'static str = #class_name;
            const NET_CLASS_TYPE: Option<::conobject_core::NetClassType> = #net_type;
            const NET_GROUPS: ::conobject_core::NetGroupMask =
                ::conobject_core::NetGroupMask::from_bits_retain(#group_bits);

            fn parent_class() -> Option<::core::any::TypeId> {
                #parent_class
            }

            fn container_child_class() -> Option<::core::any::TypeId> {
                #container_child
            }

            #[allow(unused_variables)]
            fn init_persist_fields(fields: &mut ::conobject_core::FieldBuilder) {
                #(#field_decls)*
                #extra_fields
            }

            #[allow(unused_variables)]
            fn init_callbacks(callbacks: &mut ::conobject_core::CallbackDeclarations) {
                #declare_callbacks
            }
        }
    })
}

fn generate_field_decl(struct_name: &syn::Ident, field: &ConsoleFieldArgs) -> TokenStream {
    let Some(field_ident) = field.ident.as_ref() else {
        return quote! {};
    };
    let Some(field_name) = field.field_name.as_ref() else {
        return quote! {};
    };
    let ty = &field.ty;

    let docs = field.docs.as_ref().map(|docs| quote! { .with_docs(#docs) });

    let add = match &field.table {
        Some(table) => quote! {
            fields
                .add_field(
                    #field_name,
                    ::conobject_core::ConsoleType::Enum,
                    ::core::mem::offset_of!(#struct_name, #field_ident),
                )
                .with_element_count(<#ty as ::conobject_core::FieldStorage>::ELEMENT_COUNT)
                .with_table(&#table)
        },
        None => quote! {
            fields.add_value_field::<#ty>(
                #field_name,
                ::core::mem::offset_of!(#struct_name, #field_ident),
            )
        },
    };

    quote! { #add #docs; }
}
