use crate::utils::{apply_derives, parse_bool_lit};
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity_id] 宏实现
/// 仅支持单字段 tuple struct（内部类型为 `Uuid`），并为包装类型：
/// - 合并/追加派生：Debug（可关闭）、Clone、Copy、PartialEq、Eq、Hash、PartialOrd、Ord、
///   Serialize、Deserialize（经由 `TryFrom<Uuid>`，拒绝 nil）
/// - 提供 `new()`（随机生成）、`try_new(value)`（拒绝 nil）、`value()`、
///   Display、FromStr、AsRef、TryFrom/From 转换
///
/// 不派生 `Default`：nil 标识视为“未构造”的值，无法通过公开 API 获得。
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityIdAttrConfig);
    let input = parse_macro_input!(item as Item);

    let st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity_id] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let inner_ty = match &st.fields {
        syn::Fields::Unnamed(f) if f.unnamed.len() == 1 => &f.unnamed[0].ty,
        syn::Fields::Unnamed(f) => {
            return syn::Error::new(
                f.span(),
                "#[entity_id] requires a tuple struct with exactly one field",
            )
            .to_compile_error()
            .into();
        }
        _ => {
            return syn::Error::new(
                st.span(),
                "#[entity_id] supports only tuple struct, e.g., struct X(Uuid);",
            )
            .to_compile_error()
            .into();
        }
    };

    let inner_repr = inner_ty.to_token_stream().to_string();

    let mut st_out = st.clone();
    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(Copy),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
        syn::parse_quote!(PartialOrd),
        syn::parse_quote!(Ord),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    st_out
        .attrs
        .push(syn::parse_quote!(#[serde(try_from = #inner_repr, into = #inner_repr)]));
    apply_derives(&mut st_out.attrs, required);

    let ident = &st_out.ident;
    let ident_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = st_out.generics.split_for_impl();

    let out = quote! {
        #st_out

        impl #impl_generics #ident #ty_generics #where_clause {
            /// 生成新的随机标识
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(<#inner_ty>::new_v4())
            }

            /// 从已有值构造标识，nil 值视为未构造
            pub fn try_new(value: #inner_ty) -> ::delivery_domain::error::DomainResult<Self> {
                if value.is_nil() {
                    return ::std::result::Result::Err(
                        ::delivery_domain::error::DomainError::invalid(#ident_name, "must not be nil"),
                    );
                }
                ::std::result::Result::Ok(Self(value))
            }

            pub fn value(&self) -> #inner_ty {
                self.0
            }
        }

        impl #impl_generics ::std::str::FromStr for #ident #ty_generics #where_clause {
            type Err = ::delivery_domain::error::DomainError;
            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let inner: #inner_ty = s.parse()?;
                Self::try_new(inner)
            }
        }

        impl #impl_generics ::std::fmt::Display for #ident #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl #impl_generics ::core::convert::AsRef<#inner_ty> for #ident #ty_generics #where_clause {
            fn as_ref(&self) -> &#inner_ty { &self.0 }
        }

        impl #impl_generics ::core::convert::TryFrom<#inner_ty> for #ident #ty_generics #where_clause {
            type Error = ::delivery_domain::error::DomainError;
            fn try_from(value: #inner_ty) -> ::std::result::Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }

        impl #impl_generics ::core::convert::From<#ident #ty_generics> for #inner_ty #where_clause {
            fn from(value: #ident #ty_generics) -> Self { value.0 }
        }
    };

    TokenStream::from(out)
}

// -------- parsing --------

struct EntityIdAttrConfig {
    derive_debug: Option<bool>,
}

impl Parse for EntityIdAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut derive_debug: Option<bool> = None;
        let pairs: Punctuated<syn::MetaNameValue, Token![,]> =
            Punctuated::parse_terminated(input)?;

        for kv in pairs {
            let Some(key) = kv.path.get_ident().cloned() else {
                return Err(syn::Error::new(kv.path.span(), "invalid attribute key"));
            };
            if key != "debug" {
                return Err(syn::Error::new(
                    key.span(),
                    "unknown key in attribute; expected 'debug'",
                ));
            }
            if derive_debug.is_some() {
                return Err(syn::Error::new(
                    key.span(),
                    "duplicate key 'debug' in attribute",
                ));
            }
            derive_debug = Some(parse_bool_lit(&key, kv.value)?);
        }

        Ok(Self { derive_debug })
    }
}
