//! build script 生成示例
//!
//! 读取 `examples/schema/accounts.json`，把展开后的源码打印到标准输出。
//!
//! 运行示例：
//! ```bash
//! RUST_LOG=absorb_core=debug cargo run -p absorb-core --example codegen
//! ```

use absorb_core::{FieldSpec, Generator, RecordDefinition};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let schema = Path::new(env!("CARGO_MANIFEST_DIR")).join("examples/schema/accounts.json");

    // 1. schema 与手写定义可以混用，整体作为一个批次
    let audit = RecordDefinition::builder()
        .name(syn::parse_str("AuditEntry")?)
        .vis(syn::parse_str("pub")?)
        .fields(vec![
            FieldSpec::builder()
                .name(syn::parse_str("account")?)
                .ty(syn::parse_str("AccountNumber")?)
                .build(),
            FieldSpec::builder()
                .name(syn::parse_str("note")?)
                .ty(syn::parse_str("String")?)
                .build(),
        ])
        .build();

    let generated = Generator::new().schema_file(&schema)?.record(audit).generate();

    // 2. 输出结果
    println!("{}", generated.source());
    for err in generated.errors() {
        eprintln!("error: {err}");
    }

    // 3. 写入临时目录
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("records.rs");
    Generator::new().schema_file(&schema)?.write_to(&out)?;
    println!("// written to {}", out.display());

    Ok(())
}
