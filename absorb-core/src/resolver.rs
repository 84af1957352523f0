//! 字段策略解析（Field Policy Resolver）
//!
//! 纯函数：对记录的每个字段给出 `Absorb` / `Hold`。
//! - 显式 `held` 强制保留
//! - 声明类型本身就是已生成的包装类型时保留（只吸收一层）
//! - 其余字段一律吸收
//!
use std::collections::BTreeMap;

use syn::{Ident, PathArguments, Type};

use crate::model::{Policy, RecordDefinition};

/// 已生成（或声明为外部已生成）的包装类型名登记表
#[derive(Debug, Clone, Default)]
pub struct WrapperRegistry {
    // 包装类型名 -> 来源（Record.field）
    names: BTreeMap<String, String>,
}

impl WrapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记包装类型；重名时返回已有来源
    pub fn register(&mut self, name: &Ident, origin: impl Into<String>) -> Result<(), String> {
        let key = name.to_string();
        if let Some(first) = self.names.get(&key) {
            return Err(first.clone());
        }
        self.names.insert(key, origin.into());
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn origin(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 类型是否直接指向一个已登记的包装类型
    ///
    /// 只识别不带泛型参数的路径（`AccountNumber`、`crate::account::AccountNumber`），
    /// `Option<AccountNumber>` 等复合类型按普通类型处理。
    pub fn is_wrapper_type(&self, ty: &Type) -> bool {
        match ty {
            Type::Group(g) => self.is_wrapper_type(&g.elem),
            Type::Paren(p) => self.is_wrapper_type(&p.elem),
            Type::Path(p) if p.qself.is_none() => p
                .path
                .segments
                .last()
                .filter(|seg| matches!(seg.arguments, PathArguments::None))
                .map(|seg| self.contains(&seg.ident.to_string()))
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// 字段名 -> 策略（按声明顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyTable {
    entries: Vec<(String, Policy)>,
}

impl PolicyTable {
    pub fn get(&self, field: &str) -> Option<Policy> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Policy)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), *p))
    }

    pub fn absorbed(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, p)| *p == Policy::Absorb)
            .map(|(n, _)| n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 解析记录中每个字段的策略
pub fn resolve(def: &RecordDefinition, registry: &WrapperRegistry) -> PolicyTable {
    let entries = def
        .fields()
        .iter()
        .map(|field| {
            let policy = if field.held() {
                Policy::Hold
            } else if field
                .declared_type()
                .is_some_and(|ty| registry.is_wrapper_type(ty))
            {
                Policy::Hold
            } else {
                Policy::Absorb
            };
            tracing::trace!(
                record = %def.name(),
                field = %field.name(),
                ?policy,
                "resolved field policy"
            );
            (field.name().to_string(), policy)
        })
        .collect();

    PolicyTable { entries }
}
