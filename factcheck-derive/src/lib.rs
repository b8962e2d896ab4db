//! The `#[forall]` attribute macro for factcheck.
//!
//! `#[forall]` turns a function with parameters into a zero-argument
//! `#[test]` that runs the original body once per sampled combination of
//! parameter values.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, parse_quote, Attribute, Expr, ExprClosure, FnArg, Ident, ItemFn, Pat,
    PatIdent, PatType, ReturnType, Token, Type,
};

/// Bind a test's parameters to generators and run it over sampled
/// combinations.
///
/// Generators are declared on parameters with `#[gen(...)]` (or
/// `#[with(...)]`, for edition 2024 where `gen` is reserved) or bound in the
/// attribute by parameter name; a binding in the attribute overrides a
/// declaration. `samples`, `seed` and `where` are reserved keys.
///
/// # Example
///
/// ```rust,ignore
/// use factcheck::*;
///
/// #[forall(samples = 300, y = [20, 30], where = |x, y| x * 10 != *y)]
/// fn pairs_stay_in_range(#[gen([1, 2])] x: i32, y: i32) {
///     assert!(x == 1 || x == 2);
///     assert!(y == 20 || y == 30);
/// }
/// ```
#[proc_macro_attribute]
pub fn forall(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ForallArgs);
    let function = parse_macro_input!(item as ItemFn);

    match forall_impl(args, function) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// One `key = value` entry of the attribute.
struct Arg {
    key: Ident,
    value: Expr,
}

impl Parse for Arg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let key = input.call(Ident::parse_any)?;
        input.parse::<Token![=]>()?;
        let value = input.parse()?;
        Ok(Arg { key, value })
    }
}

#[derive(Default)]
struct ForallArgs {
    samples: Option<Expr>,
    seed: Option<Expr>,
    filter: Option<ExprClosure>,
    bindings: Vec<Arg>,
}

impl Parse for ForallArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ForallArgs::default();
        for arg in Punctuated::<Arg, Token![,]>::parse_terminated(input)? {
            let key = arg.key.to_string();
            let duplicate = match key.as_str() {
                "samples" => args.samples.replace(arg.value).is_some(),
                "seed" => args.seed.replace(arg.value).is_some(),
                "where" => match arg.value {
                    Expr::Closure(closure) => args.filter.replace(closure).is_some(),
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "`where` expects a closure over test parameters",
                        ))
                    }
                },
                _ => {
                    let duplicate = args.bindings.iter().any(|b| b.key == arg.key);
                    args.bindings.push(arg);
                    duplicate
                }
            };
            if duplicate {
                return Err(syn::Error::new(
                    Span::call_site(),
                    format!("`{key}` is given more than once"),
                ));
            }
        }
        Ok(args)
    }
}

/// A test parameter: its binding pattern, name and type.
struct Param {
    pat: PatIdent,
    name: String,
    ty: Type,
    declared: Option<Expr>,
}

fn forall_impl(args: ForallArgs, function: ItemFn) -> syn::Result<TokenStream2> {
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = function;

    if let Some(asyncness) = sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[forall] does not support async functions",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[forall] does not support generic functions",
        ));
    }
    if let ReturnType::Type(_, ty) = &sig.output {
        return Err(syn::Error::new_spanned(
            ty,
            "#[forall] test functions must return ()",
        ));
    }

    let params = sig
        .inputs
        .iter()
        .map(parse_param)
        .collect::<syn::Result<Vec<_>>>()?;
    let find = |name: &Ident| params.iter().find(|p| name == p.name.as_str());

    let declarations = params.iter().map(|param| {
        let Param { name, ty, .. } = param;
        match &param.declared {
            Some(gen) => quote! { .param_with::<#ty, _>(#name, #gen) },
            None => quote! { .param(#name) },
        }
    });

    let bindings = args
        .bindings
        .iter()
        .map(|Arg { key, value }| match find(key) {
            Some(Param { name, ty, .. }) => Ok(quote! { .bind::<#ty, _>(#name, #value) }),
            None => Err(syn::Error::new_spanned(
                key,
                format!("`{key}` is not a parameter of this test"),
            )),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let samples = args.samples.map(|samples| quote! { .samples(#samples) });
    let seed = args.seed.map(|seed| quote! { .seed(#seed) });
    let (filter_def, filter) = match args.filter {
        Some(closure) => {
            let (closure, reads) = type_filter(closure, &params)?;
            (
                quote! { let __factcheck_where = #closure; },
                quote! {
                    .filter(move |__factcheck_combination: &::factcheck::Combination| {
                        __factcheck_where(#(#reads),*)
                    })
                },
            )
        }
        None => (quote! {}, quote! {}),
    };

    let takes = params.iter().map(|Param { pat, name, ty, .. }| {
        quote_spanned! {ty.span()=>
            let #pat: #ty = __factcheck_combination.take::<#ty>(#name);
        }
    });

    let combination = if params.is_empty() {
        quote! { _ }
    } else {
        quote! { __factcheck_combination }
    };

    let test_name = &sig.ident;
    let attrs = attrs.iter().filter(|attr| !attr.path().is_ident("test"));

    Ok(quote! {
        #(#attrs)*
        #[test]
        #vis fn #test_name() {
            let __factcheck_signature = ::factcheck::Signature::new()
                #(#declarations)*;
            #filter_def
            ::factcheck::Forall::new()
                .named(concat!(module_path!(), "::", stringify!(#test_name)))
                #samples
                #seed
                #(#bindings)*
                #filter
                .check(
                    &__factcheck_signature,
                    |#combination: &mut ::factcheck::Combination| {
                        #(#takes)*
                        #block
                    },
                );
        }
    })
}

fn parse_param(arg: &FnArg) -> syn::Result<Param> {
    let typed = match arg {
        FnArg::Typed(typed) => typed,
        FnArg::Receiver(receiver) => {
            return Err(syn::Error::new_spanned(
                receiver,
                "#[forall] does not support methods",
            ))
        }
    };

    let pat = match &*typed.pat {
        Pat::Ident(pat) if pat.subpat.is_none() && pat.by_ref.is_none() => pat.clone(),
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "#[forall] parameters must be plain `name: Type` bindings",
            ))
        }
    };

    let mut declared = None;
    for attr in &typed.attrs {
        if !is_declaration(attr) {
            return Err(syn::Error::new_spanned(
                attr,
                "only #[gen(...)] or #[with(...)] is supported on #[forall] parameters",
            ));
        }
        if declared.replace(attr.parse_args::<Expr>()?).is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a parameter takes at most one #[gen(...)]",
            ));
        }
    }

    Ok(Param {
        name: pat.ident.unraw().to_string(),
        pat,
        ty: (*typed.ty).clone(),
        declared,
    })
}

/// `#[gen(...)]`, `#[r#gen(...)]` or `#[with(...)]`.
///
/// `gen` is reserved from edition 2024 on, where it must be written raw or
/// replaced by `with`.
fn is_declaration(attr: &Attribute) -> bool {
    attr.path()
        .get_ident()
        .map_or(false, |ident| ident.unraw() == "gen" || ident == "with")
}

/// Give every untyped closure parameter the type `&T` of the test parameter
/// it names, and return the expressions reading those parameters from a
/// combination.
fn type_filter(
    mut closure: ExprClosure,
    params: &[Param],
) -> syn::Result<(ExprClosure, Vec<TokenStream2>)> {
    let mut reads = Vec::with_capacity(closure.inputs.len());
    for input in closure.inputs.iter_mut() {
        let ident = match &*input {
            Pat::Ident(pat) => pat.ident.clone(),
            Pat::Type(typed) => match &*typed.pat {
                Pat::Ident(pat) => pat.ident.clone(),
                other => return Err(unsupported_filter_input(other)),
            },
            other => return Err(unsupported_filter_input(other)),
        };

        let name = ident.unraw().to_string();
        let Some(param) = params.iter().find(|p| p.name == name) else {
            return Err(syn::Error::new_spanned(
                &ident,
                format!("`where` reads `{name}`, which is not a parameter of this test"),
            ));
        };

        let ty = &param.ty;
        if let Pat::Ident(pat) = &*input {
            let pat = pat.clone();
            *input = Pat::Type(PatType {
                attrs: Vec::new(),
                pat: Box::new(Pat::Ident(pat)),
                colon_token: Default::default(),
                ty: Box::new(parse_quote! { &#ty }),
            });
        }
        reads.push(quote! { __factcheck_combination.get::<#ty>(#name) });
    }
    Ok((closure, reads))
}

fn unsupported_filter_input(pat: &Pat) -> syn::Error {
    syn::Error::new_spanned(pat, "`where` closure parameters must be plain names")
}
