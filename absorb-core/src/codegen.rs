//! 代码生成
//!
//! 把 `WrapperType` 与 `TransformedRecord` 输出为 Rust 条目。
//! 生成代码只通过 `::absorb::...` 绝对路径引用运行时。
//!
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use crate::conversion::Slot;
use crate::derive_utils::{apply_derives, derive_key, split_derives};
use crate::model::Strategy;
use crate::naming;
use crate::synthesizer::WrapperType;
use crate::transformed::TransformedRecord;

fn strategy_tokens(strategy: Strategy) -> TokenStream {
    match strategy {
        Strategy::ValueClass => quote! { ::absorb::Strategy::ValueClass },
        Strategy::NewType => quote! { ::absorb::Strategy::NewType },
    }
}

impl ToTokens for WrapperType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let vis = self.vis();
        let name = self.name();
        let tag = self.tag();
        let raw = self.raw();
        let name_str = name.to_string();
        let record_str = self.record().to_string();
        let field_str = naming::unraw(self.field());
        let strategy = strategy_tokens(self.strategy());
        let doc = format!(" Wrapper for `{}::{}` ({}).", record_str, field_str, self.strategy());

        let newtype_impl = (self.strategy() == Strategy::NewType).then(|| {
            quote! { impl ::absorb::NewTypeTag for #tag {} }
        });

        tokens.extend(quote! {
            #[doc(hidden)]
            #vis enum #tag {}

            impl ::absorb::Tag for #tag {
                const NAME: &'static str = #name_str;
                const RECORD: &'static str = #record_str;
                const FIELD: &'static str = #field_str;
                const STRATEGY: ::absorb::Strategy = #strategy;
            }

            #newtype_impl

            #[doc = #doc]
            #vis type #name = ::absorb::Wrapped<#raw, #tag>;
        });
    }
}

// 构造处的字段初始化：默认值在此处 wrap，每次构造执行一次
fn slot_init(slot: &Slot) -> TokenStream {
    let field = slot.field();
    match (slot.default(), slot.wrapper()) {
        (None, Some(_)) => quote! { #field: ::core::convert::Into::into(#field) },
        (None, None) => quote! { #field },
        (Some(expr), Some(wrapper)) => {
            quote! { #field: <#wrapper as ::absorb::Wrapper>::wrap(#expr) }
        }
        (Some(expr), None) => quote! { #field: #expr },
    }
}

fn slot_param(slot: &Slot) -> TokenStream {
    let field = slot.field();
    match slot.wrapper() {
        Some(wrapper) => quote! { #field: impl ::core::convert::Into<#wrapper> },
        None => {
            let ty = slot.ty();
            quote! { #field: #ty }
        }
    }
}

impl TransformedRecord {
    fn struct_tokens(&self) -> TokenStream {
        let def = self.definition();
        let name = def.name();
        let vis = def.vis();

        let mut attrs = def.attrs().to_vec();
        let options = def.options();
        let mut required: Vec<syn::Path> = Vec::new();
        if options.debug {
            required.push(syn::parse_quote!(Debug));
        }
        if options.clone {
            required.push(syn::parse_quote!(Clone));
        }
        if options.eq {
            required.push(syn::parse_quote!(PartialEq));
        }
        if options.serde {
            required.push(syn::parse_quote!(serde::Serialize));
            required.push(syn::parse_quote!(serde::Deserialize));
        }
        apply_derives(&mut attrs, required);

        let fields = def.fields().iter().map(|f| {
            let f_attrs = f.attrs();
            let f_vis = f.vis();
            let f_name = f.name();
            let ty = match self.wrapper(&f_name.to_string()) {
                Some(w) => w.name().to_token_stream(),
                None => f.declared_type().to_token_stream(),
            };
            quote! { #(#f_attrs)* #f_vis #f_name: #ty }
        });

        quote! {
            #(#attrs)*
            #vis struct #name {
                #(#fields,)*
            }
        }
    }

    fn impl_tokens(&self) -> TokenStream {
        let def = self.definition();
        let name = def.name();
        let ctor = self.constructor();
        let vis = ctor.vis();
        let ctor_name = ctor.name();

        let params = ctor.params().map(slot_param);
        let inits: Vec<TokenStream> = ctor.slots().iter().map(slot_init).collect();

        let setters = ctor.defaulted().map(|slot| {
            let field = slot.field();
            let setter = naming::prefixed("with", field);
            let param = slot_param(slot);
            let assign = match slot.wrapper() {
                Some(_) => quote! { self.#field = ::core::convert::Into::into(#field); },
                None => quote! { self.#field = #field; },
            };
            quote! {
                #vis fn #setter(mut self, #param) -> Self {
                    #assign
                    self
                }
            }
        });

        let conversions = self.conversions().iter().map(|rule| {
            let field = rule.field();
            let wrapper = rule.wrapper();
            let raw = rule.raw();
            let wrap_fn = naming::prefixed("wrap", field);
            let unwrap_fn = naming::prefixed("unwrap", field);
            quote! {
                #vis fn #wrap_fn(raw: #raw) -> #wrapper {
                    <#wrapper as ::absorb::Wrapper>::wrap(raw)
                }

                #vis fn #unwrap_fn(wrapped: #wrapper) -> #raw {
                    <#wrapper as ::absorb::Wrapper>::unwrap(wrapped)
                }
            }
        });

        // 用户已自行派生 Default 时不再生成
        let (_, existing) = split_derives(def.attrs());
        let user_default = existing.iter().any(|p| derive_key(p) == "Default");
        let default_impl = (ctor.all_defaulted() && !user_default).then(|| {
            quote! {
                impl ::core::default::Default for #name {
                    fn default() -> Self {
                        Self { #(#inits,)* }
                    }
                }
            }
        });

        quote! {
            #[allow(dead_code)]
            impl #name {
                #vis fn #ctor_name(#(#params),*) -> Self {
                    Self { #(#inits,)* }
                }

                #(#setters)*

                #(#conversions)*
            }

            #default_impl
        }
    }

    fn record_impl_tokens(&self) -> TokenStream {
        let def = self.definition();
        let name = def.name();
        let name_str = name.to_string();

        let infos = def.fields().iter().map(|f| {
            let f_str = naming::unraw(f.name());
            let raw_str = f.declared_type().to_token_stream().to_string();
            let has_default = f.default().is_some();
            match self.wrapper(&f.name().to_string()) {
                Some(w) => {
                    let w_str = w.name().to_string();
                    let strategy = strategy_tokens(w.strategy());
                    quote! { ::absorb::FieldInfo::absorbed(#f_str, #raw_str, #w_str, #strategy, #has_default) }
                }
                None => quote! { ::absorb::FieldInfo::held(#f_str, #raw_str, #has_default) },
            }
        });

        quote! {
            impl ::absorb::Record for #name {
                const NAME: &'static str = #name_str;
                const FIELDS: &'static [::absorb::FieldInfo] = &[#(#infos),*];
            }
        }
    }
}

impl ToTokens for TransformedRecord {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let wrappers = self.wrappers();
        let record = self.struct_tokens();
        let inherent = self.impl_tokens();
        let record_impl = self.record_impl_tokens();
        let instance_items = self.definition().instance_items();
        let companions = self.companions();

        tokens.extend(quote! {
            #(#wrappers)*

            #record

            #inherent

            #record_impl

            #(#instance_items)*

            #(#companions)*
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::elaborator::Elaborator;
    use crate::model::{FieldSpec, RecordDefinition, RecordOptions, Strategy};
    use crate::naming::call_site;
    use quote::{ToTokens, quote};
    use syn::parse_quote;

    fn account(strategy: Strategy) -> RecordDefinition {
        RecordDefinition::builder()
            .name(call_site("Account"))
            .vis(parse_quote!(pub))
            .strategy(strategy)
            .fields(vec![
                FieldSpec::builder()
                    .name(call_site("activated"))
                    .vis(parse_quote!(pub))
                    .ty(parse_quote!(bool))
                    .default(parse_quote!(true))
                    .build(),
                FieldSpec::builder()
                    .name(call_site("manager"))
                    .vis(parse_quote!(pub))
                    .ty(parse_quote!(String))
                    .held(true)
                    .build(),
            ])
            .build()
    }

    fn render(def: RecordDefinition) -> String {
        Elaborator::new()
            .elaborate(def)
            .unwrap()
            .to_token_stream()
            .to_string()
    }

    // 测试包装类型输出：标签 + 别名
    #[test]
    fn test_wrapper_tokens() {
        let record = Elaborator::new().elaborate(account(Strategy::ValueClass)).unwrap();
        let wrapper = record.wrapper("activated").unwrap();
        let expected = quote! {
            #[doc(hidden)]
            pub enum AccountActivatedTag {}

            impl ::absorb::Tag for AccountActivatedTag {
                const NAME: &'static str = "AccountActivated";
                const RECORD: &'static str = "Account";
                const FIELD: &'static str = "activated";
                const STRATEGY: ::absorb::Strategy = ::absorb::Strategy::ValueClass;
            }

            #[doc = " Wrapper for `Account::activated` (valueclass)."]
            pub type AccountActivated = ::absorb::Wrapped<bool, AccountActivatedTag>;
        };
        assert_eq!(wrapper.to_token_stream().to_string(), expected.to_string());
    }

    // 测试 NewType 策略追加隐式转换标记
    #[test]
    fn test_newtype_marker() {
        let out = render(account(Strategy::NewType));
        let marker = quote! { impl ::absorb::NewTypeTag for AccountActivatedTag {} };
        assert!(out.contains(&marker.to_string()));
    }

    // 测试记录结构体：吸收字段换成包装类型，保留字段不变，派生被合并
    #[test]
    fn test_struct_tokens() {
        let out = render(account(Strategy::ValueClass));
        let expected = quote! {
            #[derive(Debug, Clone, PartialEq)]
            pub struct Account {
                pub activated: AccountActivated,
                pub manager: String,
            }
        };
        assert!(out.contains(&expected.to_string()));
    }

    // 测试构造函数：默认值在构造处包装，不作为参数
    #[test]
    fn test_constructor_tokens() {
        let out = render(account(Strategy::ValueClass));
        let expected = quote! {
            pub fn new(manager: String) -> Self {
                Self {
                    activated: <AccountActivated as ::absorb::Wrapper>::wrap(true),
                    manager,
                }
            }
        };
        assert!(out.contains(&expected.to_string()));
        assert!(out.contains("fn with_activated"));
        assert!(out.contains("fn wrap_activated"));
        assert!(out.contains("fn unwrap_activated"));
        // manager 没有默认值，不生成 Default
        assert!(!out.contains("impl :: core :: default :: Default"));
    }

    // 测试所有字段都有默认值时生成 Default，且可关闭 Debug、开启 serde
    #[test]
    fn test_default_and_options() {
        let def = RecordDefinition::builder()
            .name(call_site("Flags"))
            .options(RecordOptions {
                debug: false,
                serde: true,
                ..Default::default()
            })
            .fields(vec![
                FieldSpec::builder()
                    .name(call_site("enabled"))
                    .ty(parse_quote!(bool))
                    .default(parse_quote!(false))
                    .build(),
            ])
            .build();
        let out = render(def);
        assert!(out.contains("impl :: core :: default :: Default for Flags"));
        let derive = quote! { #[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)] };
        assert!(out.contains(&derive.to_string()));
    }

    // 测试关闭 Clone / PartialEq 后，不可克隆的保留字段原样通过
    #[test]
    fn test_derive_opt_out() {
        let def = RecordDefinition::builder()
            .name(call_site("Job"))
            .options(RecordOptions {
                clone: false,
                eq: false,
                ..Default::default()
            })
            .fields(vec![
                FieldSpec::builder().name(call_site("id")).ty(parse_quote!(u64)).build(),
                FieldSpec::builder()
                    .name(call_site("lock"))
                    .ty(parse_quote!(std::sync::Mutex<u8>))
                    .held(true)
                    .build(),
            ])
            .build();
        let out = render(def);
        let expected = quote! {
            #[derive(Debug)]
            struct Job {
                id: JobId,
                lock: std::sync::Mutex<u8>,
            }
        };
        assert!(out.contains(&expected.to_string()));
        assert!(!out.contains("Clone"));
        assert!(!out.contains("PartialEq"));
    }

    // 测试记录元数据
    #[test]
    fn test_record_metadata_tokens() {
        let out = render(account(Strategy::ValueClass));
        let expected = quote! {
            impl ::absorb::Record for Account {
                const NAME: &'static str = "Account";
                const FIELDS: &'static [::absorb::FieldInfo] = &[
                    ::absorb::FieldInfo::absorbed("activated", "bool", "AccountActivated", ::absorb::Strategy::ValueClass, true),
                    ::absorb::FieldInfo::held("manager", "String", false)
                ];
            }
        };
        assert!(out.contains(&expected.to_string()));
    }
}
