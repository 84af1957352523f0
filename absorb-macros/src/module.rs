use std::collections::HashMap;

use absorb_core::{CompanionOperation, RecordOptions, Strategy, owner_of};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{AttrStyle, Fields, Ident, Item, ItemImpl, ItemMod, ItemStruct, Result, Type};

use crate::attrs;
use crate::record;

/// 模块形态：`#[valueclass] mod m { ... }`
/// - 模块中每个具名字段结构体都是记录，整体作为一个批次展开
/// - 以记录为 `Self` 的 `impl` 块是实例作用域，原样保留
/// - 自由函数 / 常量 / 静态量是伴生操作，按 `owner_of` 归属到记录；
///   无法归属的条目原样保留
pub(crate) fn expand(strategy: Strategy, options: RecordOptions, module: ItemMod) -> Result<TokenStream> {
    let ItemMod {
        attrs,
        vis,
        unsafety,
        mod_token,
        ident,
        content,
        ..
    } = module;
    let Some((_, items)) = content else {
        return Err(syn::Error::new(
            ident.span(),
            "expected an inline module body: `mod name { ... }`",
        ));
    };

    let records: Vec<Ident> = items
        .iter()
        .filter_map(|item| match item {
            Item::Struct(st) if is_record(st) => Some(st.ident.clone()),
            _ => None,
        })
        .collect();

    let mut structs: Vec<ItemStruct> = Vec::new();
    let mut instance: HashMap<String, Vec<ItemImpl>> = HashMap::new();
    let mut companions: HashMap<String, Vec<CompanionOperation>> = HashMap::new();
    let mut passthrough: Vec<Item> = Vec::new();

    for item in items {
        match item {
            Item::Struct(st) if is_record(&st) => structs.push(st),
            Item::Impl(imp) => match impl_target(&imp, &records) {
                Some(name) => instance.entry(name).or_default().push(imp),
                None => passthrough.push(Item::Impl(imp)),
            },
            item @ (Item::Fn(_) | Item::Const(_) | Item::Static(_)) => {
                match CompanionOperation::try_from(item) {
                    Ok(op) => match owner_of(&op, &records, &ident) {
                        Some(owner) => companions.entry(owner.to_string()).or_default().push(op),
                        None => passthrough.push(op.into()),
                    },
                    Err(item) => passthrough.push(item),
                }
            }
            other => passthrough.push(other),
        }
    }

    let mut defs = Vec::new();
    let mut rejected = TokenStream::new();
    for mut st in structs {
        let key = st.ident.to_string();
        let instance_items = instance.remove(&key).unwrap_or_default();
        let ops = companions.remove(&key).unwrap_or_default();

        match attrs::record_fields(&mut st) {
            Ok(fields) => defs.push(attrs::record_definition(
                strategy,
                options.clone(),
                st,
                fields,
                instance_items,
                ops,
            )),
            // 形态不支持或属性有误：报告错误，记录及其条目原样输出
            Err(err) => {
                attrs::strip_field_attrs(&mut st);
                let err = err.into_compile_error();
                rejected.extend(quote! {
                    #err
                    #st
                    #(#instance_items)*
                    #(#ops)*
                });
            }
        }
    }

    let expanded = record::elaborate(defs);
    let outer = attrs.iter().filter(|a| matches!(a.style, AttrStyle::Outer));
    let inner = attrs.iter().filter(|a| matches!(a.style, AttrStyle::Inner(_)));

    Ok(quote! {
        #(#outer)*
        #vis #unsafety #mod_token #ident {
            #(#inner)*
            #(#passthrough)*
            #expanded
            #rejected
        }
    })
}

fn is_record(st: &ItemStruct) -> bool {
    matches!(st.fields, Fields::Named(_))
}

// `impl Record { .. }` / `impl Trait for Record { .. }` 的目标记录
fn impl_target(imp: &ItemImpl, records: &[Ident]) -> Option<String> {
    let Type::Path(tp) = imp.self_ty.as_ref() else {
        return None;
    };
    if tp.qself.is_some() {
        return None;
    }
    let seg = tp.path.segments.last()?;
    if !seg.arguments.is_none() {
        return None;
    }
    records
        .iter()
        .find(|r| **r == seg.ident)
        .map(|r| r.to_string())
}
