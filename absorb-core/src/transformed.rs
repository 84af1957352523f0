//! 展开结果（TransformedRecord）
//!
//! 持有原始定义以及各阶段产物：策略表、包装类型、转换规则、构造函数、改写后的伴生操作。
//! 每条记录只创建一次，创建后不可变；通过 `ToTokens` 输出生成代码（见 `codegen`）。
//!
use crate::companion::RecordShape;
use crate::conversion::{ConversionLayer, ConversionRule, Constructor};
use crate::model::{CompanionOperation, Policy, RecordDefinition};
use crate::resolver::PolicyTable;
use crate::synthesizer::WrapperType;

#[derive(Debug, Clone)]
pub struct TransformedRecord {
    definition: RecordDefinition,
    policies: PolicyTable,
    wrappers: Vec<WrapperType>,
    conversions: ConversionLayer,
    companions: Vec<CompanionOperation>,
}

impl TransformedRecord {
    pub(crate) fn new(
        definition: RecordDefinition,
        policies: PolicyTable,
        wrappers: Vec<WrapperType>,
        conversions: ConversionLayer,
        companions: Vec<CompanionOperation>,
    ) -> Self {
        Self {
            definition,
            policies,
            wrappers,
            conversions,
            companions,
        }
    }

    pub fn definition(&self) -> &RecordDefinition {
        &self.definition
    }

    pub fn name(&self) -> &syn::Ident {
        self.definition.name()
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn policy(&self, field: &str) -> Option<Policy> {
        self.policies.get(field)
    }

    pub fn wrappers(&self) -> &[WrapperType] {
        &self.wrappers
    }

    /// 按字段名查找包装类型
    pub fn wrapper(&self, field: &str) -> Option<&WrapperType> {
        self.wrappers.iter().find(|w| w.field() == field)
    }

    pub fn conversions(&self) -> &[ConversionRule] {
        &self.conversions.rules
    }

    pub fn constructor(&self) -> &Constructor {
        &self.conversions.constructor
    }

    /// 改写后的伴生操作
    pub fn companions(&self) -> &[CompanionOperation] {
        &self.companions
    }

    pub fn shape(&self) -> RecordShape {
        RecordShape::new(self.name(), &self.wrappers)
    }
}
