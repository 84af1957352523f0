use absorb_core::{Elaborator, RecordDefinition, RecordOptions, Strategy};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{ItemStruct, Result};

use crate::attrs;

/// 结构体形态：`#[valueclass] struct Record { ... }`
pub(crate) fn expand(strategy: Strategy, options: RecordOptions, mut st: ItemStruct) -> Result<TokenStream> {
    let fields = attrs::record_fields(&mut st)?;
    let def = attrs::record_definition(strategy, options, st, fields, Vec::new(), Vec::new());
    Ok(elaborate(vec![def]))
}

/// 作为一个批次展开；失败的记录输出错误与未包装的原始定义
pub(crate) fn elaborate(defs: Vec<RecordDefinition>) -> TokenStream {
    let plain: Vec<TokenStream> = defs.iter().map(RecordDefinition::to_plain_tokens).collect();

    Elaborator::new()
        .elaborate_batch(defs)
        .into_iter()
        .zip(plain)
        .map(|(result, plain)| match result {
            Ok(record) => record.into_token_stream(),
            Err(err) => {
                let err = syn::Error::from(err).into_compile_error();
                quote! { #err #plain }
            }
        })
        .collect()
}
