//! 具名类型合成（Nominal Type Synthesizer）
//!
//! 为每个 `Absorb` 字段合成恰好一个 `WrapperType`，其底层类型等于字段声明类型。
//! 合成只登记信息，代码由 `codegen` 输出。
//!
use syn::{Ident, Type, Visibility};

use crate::error::{ElaborationError, ElaborationResult};
use crate::model::{Policy, RecordDefinition, Strategy};
use crate::naming;
use crate::resolver::PolicyTable;

/// 以 `(记录名, 字段名)` 为键的包装类型
#[derive(Debug, Clone)]
pub struct WrapperType {
    record: Ident,
    field: Ident,
    name: Ident,
    tag: Ident,
    raw: Type,
    strategy: Strategy,
    vis: Visibility,
}

impl WrapperType {
    pub fn record(&self) -> &Ident {
        &self.record
    }

    pub fn field(&self) -> &Ident {
        &self.field
    }

    /// 包装类型名，例如 `AccountNumber`
    pub fn name(&self) -> &Ident {
        &self.name
    }

    /// 标签类型名，例如 `AccountNumberTag`
    pub fn tag(&self) -> &Ident {
        &self.tag
    }

    pub fn raw(&self) -> &Type {
        &self.raw
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn vis(&self) -> &Visibility {
        &self.vis
    }

    pub fn origin(&self) -> String {
        format!("{}.{}", self.record, naming::unraw(&self.field))
    }
}

/// 为吸收字段合成包装类型
pub fn synthesize(def: &RecordDefinition, policies: &PolicyTable) -> ElaborationResult<Vec<WrapperType>> {
    let mut wrappers = Vec::new();

    for field in def.fields() {
        if policies.get(&field.name().to_string()) != Some(Policy::Absorb) {
            continue;
        }

        let raw = field
            .declared_type()
            .cloned()
            .ok_or_else(|| ElaborationError::MissingType {
                record: def.name().clone(),
                field: field.name().clone(),
            })?;

        let name = field
            .wrapper()
            .cloned()
            .unwrap_or_else(|| naming::wrapper_ident(def.name(), field.name()));
        let tag = naming::tag_ident(&name);
        let strategy = field.strategy().unwrap_or(def.strategy());

        tracing::trace!(record = %def.name(), wrapper = %name, %strategy, "synthesized wrapper");

        wrappers.push(WrapperType {
            record: def.name().clone(),
            field: field.name().clone(),
            name,
            tag,
            raw,
            strategy,
            vis: def.vis().clone(),
        });
    }

    Ok(wrappers)
}

/// 记录可能产出的包装类型名（不考虑一层吸收规则），用于批量展开前的预登记
pub(crate) fn candidate_names(def: &RecordDefinition) -> Vec<Ident> {
    def.fields()
        .iter()
        .filter(|f| !f.held())
        .map(|f| {
            f.wrapper()
                .cloned()
                .unwrap_or_else(|| naming::wrapper_ident(def.name(), f.name()))
        })
        .collect()
}
