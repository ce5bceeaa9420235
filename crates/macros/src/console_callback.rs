//! Console callback attribute macro implementation
//!
//! Provides the `#[console_callback]` attribute for callback implementations.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse::Parse, parse::ParseStream, FnArg, ItemFn, LitStr, Path, ReturnType, Token, Type};

/// Arguments to the console_callback attribute
///
/// Usage:
/// - `#[console_callback(Circle, "OnDraw")]`
pub struct ConsoleCallbackArgs {
    /// Class the implementation is connected to
    pub class: Path,
    /// Declared callback name
    pub name: LitStr,
}

impl Parse for ConsoleCallbackArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let class: Path = input.parse()?;
        input.parse::<Token![,]>()?;
        let name: LitStr = input.parse()?;
        Ok(Self { class, name })
    }
}

/// Generate the console_callback implementation
pub fn generate_console_callback(args: ConsoleCallbackArgs, func: ItemFn) -> TokenStream {
    match expand(args, func) {
        Ok(tokens) => tokens,
        Err(e) => e.into_compile_error(),
    }
}

fn expand(args: ConsoleCallbackArgs, func: ItemFn) -> syn::Result<TokenStream> {
    let fn_name = &func.sig.ident;
    let fn_vis = &func.vis;
    let class = &args.class;
    let callback_name = &args.name;

    let constructor_fn_name = format_ident!("{}_constructor", fn_name);
    let register_fn_name = format_ident!("{}_register", fn_name);

    let return_ty = match &func.sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };

    let inputs: Vec<&FnArg> = func.sig.inputs.iter().collect();
    let constructor = match inputs.as_slice() {
        // fn(&mut Class) -> R
        [_] => quote! {
            ::conobject_core::CallbackConstructor::new::<
                #class,
                ::conobject_core::VoidCallbackData,
                #return_ty,
                _,
            >(
                #callback_name,
                |obj: &mut #class, _: &::conobject_core::VoidCallbackData| #fn_name(obj),
            )
        },
        // fn(&mut Class, &Data) -> R
        [_, data] => {
            let data_ty = data_type(data)?;
            quote! {
                ::conobject_core::CallbackConstructor::new::<#class, #data_ty, #return_ty, _>(
                    #callback_name,
                    #fn_name,
                )
            }
        }
        _ => {
            return Err(syn::Error::new_spanned(
                &func.sig,
                "callback must take `&mut Class` and optionally `&Data`",
            ))
        }
    };

    let constructor_doc = format!("Build the `{}` callback constructor", args.name.value());
    let register_doc = format!("Queue the `{}` callback with a class registry", args.name.value());

    Ok(quote! {
        #func

        #[doc = #constructor_doc]
        #fn_vis fn #constructor_fn_name() -> ::conobject_core::CallbackConstructor {
            #constructor
        }

        #[doc = #register_doc]
        #fn_vis fn #register_fn_name(registry: &mut ::conobject_core::ClassRegistry) {
            registry.add_callback_constructor(#constructor_fn_name());
        }
    })
}

/// Extract `D` from a `data: &D` argument
fn data_type(arg: &FnArg) -> syn::Result<&Type> {
    if let FnArg::Typed(pat_type) = arg {
        if let Type::Reference(reference) = pat_type.ty.as_ref() {
            if reference.mutability.is_none() {
                return Ok(&reference.elem);
            }
        }
    }
    Err(syn::Error::new_spanned(arg, "callback data must be taken as `&Data`"))
}
