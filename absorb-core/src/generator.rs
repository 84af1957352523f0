//! build script 前端
//!
//! 收集 `RecordDefinition` 或 JSON schema，整体作为一个批次展开，输出单个
//! Rust 源文件供 `include!` 使用：
//!
//! ```no_run
//! // build.rs
//! let out = std::path::Path::new(&std::env::var("OUT_DIR").unwrap()).join("records.rs");
//! absorb_core::Generator::new()
//!     .schema_file("schema/accounts.json")
//!     .unwrap()
//!     .write_to(&out)
//!     .unwrap();
//! ```
//!
//! 展开失败的记录输出 `compile_error!` 与未包装的原始定义，其它记录不受影响。
//!
use std::path::Path;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use crate::elaborator::Elaborator;
use crate::error::{ElaborationError, ElaborationResult};
use crate::model::RecordDefinition;
use crate::schema::Schema;

const HEADER: &str = "// @generated by absorb-core. Do not edit.\n";

#[derive(Debug, Default)]
pub struct Generator {
    inputs: Vec<ElaborationResult<RecordDefinition>>,
}

/// 生成结果
#[derive(Debug)]
pub struct Generated {
    tokens: TokenStream,
    errors: Vec<ElaborationError>,
}

impl Generated {
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// 完整源文件文本
    pub fn source(&self) -> String {
        format!("{HEADER}{}\n", self.tokens)
    }

    pub fn errors(&self) -> &[ElaborationError] {
        &self.errors
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn compile_error(err: &ElaborationError) -> TokenStream {
    let msg = err.to_string();
    quote! { ::core::compile_error!(#msg); }
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(mut self, def: RecordDefinition) -> Self {
        self.inputs.push(Ok(def));
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.inputs.extend(schema.into_definitions());
        self
    }

    /// JSON 文本本身无法解析时直接返回错误
    pub fn schema_str(self, json: &str) -> ElaborationResult<Self> {
        Ok(self.schema(json.parse()?))
    }

    pub fn schema_file(self, path: impl AsRef<Path>) -> ElaborationResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading schema");
        Ok(self.schema(Schema::from_path(path)?))
    }

    pub fn generate(self) -> Generated {
        let mut tokens = TokenStream::new();
        let mut errors = Vec::new();

        let mut defs = Vec::new();
        for input in self.inputs {
            match input {
                Ok(def) => defs.push(def),
                Err(err) => {
                    tokens.extend(compile_error(&err));
                    errors.push(err);
                }
            }
        }

        let plain: Vec<TokenStream> = defs.iter().map(RecordDefinition::to_plain_tokens).collect();
        let results = Elaborator::new().elaborate_batch(defs);

        for (result, plain) in results.into_iter().zip(plain) {
            match result {
                Ok(record) => record.to_tokens(&mut tokens),
                Err(err) => {
                    tracing::warn!(error = %err, "record left unwrapped");
                    tokens.extend(compile_error(&err));
                    tokens.extend(plain);
                    errors.push(err);
                }
            }
        }

        Generated { tokens, errors }
    }

    /// 生成并写入文件；内容未变化时不改写，避免触发无谓的重新编译
    pub fn write_to(self, path: impl AsRef<Path>) -> ElaborationResult<Generated> {
        let path = path.as_ref();
        let generated = self.generate();
        let source = generated.source();

        let unchanged = std::fs::read_to_string(path).is_ok_and(|old| old == source);
        if !unchanged {
            std::fs::write(path, &source)?;
        }

        tracing::info!(
            path = %path.display(),
            bytes = source.len(),
            errors = generated.errors.len(),
            unchanged,
            "wrote generated records"
        );
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldSpec;
    use crate::naming::call_site;
    use syn::parse_quote;

    const SCHEMA: &str = r#"{
        "records": [
            { "name": "Account", "vis": "pub", "fields": [
                { "name": "number", "type": "i64" }
            ]},
            { "name": "Transfer", "vis": "pub", "fields": [
                { "name": "from", "type": "AccountNumber" },
                { "name": "amount", "type": "u64" }
            ]}
        ]
    }"#;

    // 测试 schema 中的记录作为一个批次展开
    #[test]
    fn test_generate_from_schema() {
        let generated = Generator::new().schema_str(SCHEMA).unwrap().generate();
        assert!(generated.is_ok());

        let source = generated.source();
        assert!(source.starts_with(HEADER));
        assert!(source.contains("pub type AccountNumber"));
        assert!(source.contains("pub type TransferAmount"));
        // 已生成的包装类型保留
        assert!(source.contains("pub from : AccountNumber"));
        assert!(!source.contains("TransferFrom"));
    }

    // 测试失败的记录输出 compile_error 与原始定义
    #[test]
    fn test_failed_record_fallback() {
        let broken = RecordDefinition::builder()
            .name(call_site("Broken"))
            .fields(vec![
                FieldSpec::builder().name(call_site("a")).ty(parse_quote!(u8)).build(),
                FieldSpec::builder().name(call_site("a")).ty(parse_quote!(u8)).build(),
            ])
            .build();
        let fine = RecordDefinition::builder()
            .name(call_site("Fine"))
            .fields(vec![FieldSpec::builder().name(call_site("b")).ty(parse_quote!(u8)).build()])
            .build();

        let generated = Generator::new().record(broken).record(fine).generate();
        assert_eq!(generated.errors().len(), 1);
        let source = generated.source();
        assert!(source.contains(":: core :: compile_error ! (\"duplicate field `a` in `Broken`\")"));
        assert!(source.contains("struct Broken { a : u8 , a : u8 , }"));
        assert!(source.contains("type FineB"));
    }

    // 测试写入文件
    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.rs");

        let generated = Generator::new().schema_str(SCHEMA).unwrap().write_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, generated.source());

        // 再次写入内容一致
        Generator::new().schema_str(SCHEMA).unwrap().write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }

    // 测试 JSON 本身无效
    #[test]
    fn test_invalid_json() {
        let err = Generator::new().schema_str("{ not json").unwrap_err();
        assert!(matches!(err, ElaborationError::Schema { .. }));
    }
}
