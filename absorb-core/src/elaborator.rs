//! 展开流水线（Elaborator）
//!
//! 依次执行：策略解析 -> 类型合成 -> 转换层 -> 伴生操作改写。
//! `Elaborator` 持有跨记录的包装类型登记表：后展开的记录遇到先前（或同批次）
//! 已生成的包装类型时保留不再吸收。
//!
//! 失败只影响出错的那条记录：批量展开时其它记录照常产出。
//!
use syn::Ident;

use crate::companion::{self, RecordShape};
use crate::conversion::{self, ConversionLayer};
use crate::error::{ElaborationError, ElaborationResult};
use crate::model::RecordDefinition;
use crate::resolver::{self, PolicyTable, WrapperRegistry};
use crate::synthesizer::{self, WrapperType};
use crate::transformed::TransformedRecord;

// 前三个阶段完成、尚未改写伴生操作的记录
struct Partial {
    definition: RecordDefinition,
    policies: PolicyTable,
    wrappers: Vec<WrapperType>,
    conversions: ConversionLayer,
}

#[derive(Debug, Default)]
pub struct Elaborator {
    registry: WrapperRegistry,
}

impl Elaborator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已成功生成的包装类型
    pub fn registry(&self) -> &WrapperRegistry {
        &self.registry
    }

    /// 展开单条记录
    pub fn elaborate(&mut self, def: RecordDefinition) -> ElaborationResult<TransformedRecord> {
        let name = def.name().clone();
        self.elaborate_batch(vec![def])
            .pop()
            .unwrap_or_else(|| {
                Err(ElaborationError::UnsupportedRecord {
                    record: name,
                    reason: "elaboration produced no output".to_string(),
                })
            })
    }

    /// 批量展开，结果与输入一一对应
    ///
    /// 同批次的记录可以互相引用对方生成的包装类型（例如一个模块中的多条记录），
    /// 结构体字面量改写也覆盖批次内所有记录。
    #[tracing::instrument(level = "debug", skip_all, fields(records = defs.len()))]
    pub fn elaborate_batch(
        &mut self,
        defs: Vec<RecordDefinition>,
    ) -> Vec<ElaborationResult<TransformedRecord>> {
        // 1. 预登记批次内所有候选包装名，使记录间的依赖与声明顺序无关
        let pending: Vec<Ident> = defs.iter().flat_map(synthesizer::candidate_names).collect();

        // 2. 解析、合成、转换
        let mut produced = self.registry.clone();
        let partials: Vec<ElaborationResult<Partial>> = defs
            .into_iter()
            .map(|def| self.prepare(def, &pending, &mut produced))
            .collect();

        // 3. 伴生操作改写需要整个批次的记录轮廓
        let shapes: Vec<RecordShape> = partials
            .iter()
            .flatten()
            .map(|p| RecordShape::new(p.definition.name(), &p.wrappers))
            .collect();

        partials
            .into_iter()
            .map(|partial| {
                let p = partial?;
                let owner = RecordShape::new(p.definition.name(), &p.wrappers);
                let companions = p
                    .definition
                    .companions()
                    .iter()
                    .cloned()
                    .map(|op| companion::rewrite(op, &owner, &shapes))
                    .collect();

                for w in &p.wrappers {
                    // 冲突已在 prepare 中检查
                    let _ = self.registry.register(w.name(), w.origin());
                }

                tracing::debug!(
                    record = %p.definition.name(),
                    wrappers = p.wrappers.len(),
                    "elaborated record"
                );

                Ok(TransformedRecord::new(
                    p.definition,
                    p.policies,
                    p.wrappers,
                    p.conversions,
                    companions,
                ))
            })
            .collect()
    }

    fn prepare(
        &self,
        def: RecordDefinition,
        pending: &[Ident],
        produced: &mut WrapperRegistry,
    ) -> ElaborationResult<Partial> {
        def.validate()?;

        // 解析作用域：已生成 + 批次候选 + 记录声明的外部包装类型
        let mut scope = self.registry.clone();
        for name in pending {
            let _ = scope.register(name, "pending");
        }
        for path in &def.options().known {
            if let Some(seg) = path.segments.last() {
                let _ = scope.register(&seg.ident, "known");
            }
        }

        let policies = resolver::resolve(&def, &scope);
        let wrappers = synthesizer::synthesize(&def, &policies)?;
        tracing::debug!(
            record = %def.name(),
            absorbed = wrappers.len(),
            held = policies.len() - wrappers.len(),
            "resolved field policies"
        );

        let mut local = produced.clone();
        for w in &wrappers {
            if let Err(first) = local.register(w.name(), w.origin()) {
                return Err(ElaborationError::DuplicateWrapper {
                    name: w.name().clone(),
                    first,
                    second: w.origin(),
                });
            }
        }

        let conversions = conversion::build(&def, &wrappers)?;
        *produced = local;

        Ok(Partial {
            definition: def,
            policies,
            wrappers,
            conversions,
        })
    }
}
