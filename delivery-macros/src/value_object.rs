use crate::utils::{apply_derives, parse_bool_lit};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：(Debug 可控), Clone, Serialize, Deserialize, PartialEq, Eq
/// - 参数：
///   - `debug = true|false`，默认 true
///   - `repr = "Type"`：序列化形态，等价于 `#[serde(try_from = "Type", into = "Type")]`，
///     用于让反序列化同样经过值对象的校验构造
///
/// 与实体一样不派生 `Default`，值对象只能通过构造函数获得。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
    ];

    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }

    let repr_attr: Option<syn::Attribute> = cfg
        .repr
        .map(|repr| syn::parse_quote!(#[serde(try_from = #repr, into = #repr)]));

    match &mut input {
        Item::Struct(st) => {
            st.attrs.extend(repr_attr);
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) => {
            en.attrs.extend(repr_attr);
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

// -------- parsing --------

struct ValueObjectAttrConfig {
    derive_debug: Option<bool>,
    repr: Option<syn::LitStr>,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut derive_debug: Option<bool> = None;
        let mut repr: Option<syn::LitStr> = None;

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;

        for kv in pairs {
            let Some(key) = kv.path.get_ident().cloned() else {
                return Err(syn::Error::new(kv.path.span(), "invalid attribute key"));
            };
            if key == "debug" {
                if derive_debug.is_some() {
                    return Err(syn::Error::new(
                        key.span(),
                        "duplicate key 'debug' in attribute",
                    ));
                }
                derive_debug = Some(parse_bool_lit(&key, kv.value)?);
            } else if key == "repr" {
                if repr.is_some() {
                    return Err(syn::Error::new(
                        key.span(),
                        "duplicate key 'repr' in attribute",
                    ));
                }
                match kv.value {
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(lit),
                        ..
                    }) => repr = Some(lit),
                    other => {
                        return Err(syn::Error::new(
                            other.span(),
                            "expected string literal for 'repr'",
                        ));
                    }
                }
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key in attribute; expected 'debug' | 'repr'",
                ));
            }
        }

        Ok(Self { derive_debug, repr })
    }
}
