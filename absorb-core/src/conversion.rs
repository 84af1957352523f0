//! 转换与构造（Conversion & Construction Layer）
//!
//! - 每个吸收字段一条 `ConversionRule`（wrap / unwrap，互逆）
//! - 默认值只在此登记，真正的 wrap 发生在构造调用处（每次构造执行一次）
//! - 构造函数：吸收字段位置接受 `impl Into<W>`（底层值或已包装值），保留字段保持原类型
//!
use syn::{Expr, Ident, Type, Visibility};

use crate::error::{ElaborationError, ElaborationResult};
use crate::model::RecordDefinition;
use crate::synthesizer::WrapperType;

/// 底层类型与包装类型之间的双向转换
#[derive(Debug, Clone)]
pub struct ConversionRule {
    field: Ident,
    wrapper: Ident,
    raw: Type,
    default: Option<Expr>,
}

impl ConversionRule {
    pub fn field(&self) -> &Ident {
        &self.field
    }

    pub fn wrapper(&self) -> &Ident {
        &self.wrapper
    }

    pub fn raw(&self) -> &Type {
        &self.raw
    }

    /// 登记的底层默认值（未包装）
    pub fn default(&self) -> Option<&Expr> {
        self.default.as_ref()
    }
}

/// 构造函数中的一个字段位置
#[derive(Debug, Clone)]
pub struct Slot {
    field: Ident,
    ty: Type,
    wrapper: Option<Ident>,
    default: Option<Expr>,
}

impl Slot {
    pub fn field(&self) -> &Ident {
        &self.field
    }

    /// 声明类型（未包装）
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// 吸收字段的包装类型；保留字段为 `None`
    pub fn wrapper(&self) -> Option<&Ident> {
        self.wrapper.as_ref()
    }

    pub fn default(&self) -> Option<&Expr> {
        self.default.as_ref()
    }

    /// 是否作为构造函数参数（无默认值）
    pub fn is_param(&self) -> bool {
        self.default.is_none()
    }
}

/// 记录构造函数
#[derive(Debug, Clone)]
pub struct Constructor {
    name: Ident,
    vis: Visibility,
    slots: Vec<Slot>,
}

impl Constructor {
    pub fn name(&self) -> &Ident {
        &self.name
    }

    pub fn vis(&self) -> &Visibility {
        &self.vis
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn params(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.is_param())
    }

    pub fn defaulted(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| !s.is_param())
    }

    /// 所有字段都有默认值时可实现 `Default`
    pub fn all_defaulted(&self) -> bool {
        self.slots.iter().all(|s| !s.is_param())
    }
}

/// 转换层产物
#[derive(Debug, Clone)]
pub struct ConversionLayer {
    pub rules: Vec<ConversionRule>,
    pub constructor: Constructor,
}

/// 根据合成的包装类型建立转换规则与构造函数
pub fn build(def: &RecordDefinition, wrappers: &[WrapperType]) -> ElaborationResult<ConversionLayer> {
    let mut rules = Vec::new();
    let mut slots = Vec::new();

    for field in def.fields() {
        let wrapper = wrappers.iter().find(|w| w.field() == field.name());
        let ty = field
            .declared_type()
            .cloned()
            .ok_or_else(|| ElaborationError::MissingType {
                record: def.name().clone(),
                field: field.name().clone(),
            })?;

        if let Some(w) = wrapper {
            rules.push(ConversionRule {
                field: field.name().clone(),
                wrapper: w.name().clone(),
                raw: w.raw().clone(),
                default: field.default().cloned(),
            });
        }

        slots.push(Slot {
            field: field.name().clone(),
            ty,
            wrapper: wrapper.map(|w| w.name().clone()),
            default: field.default().cloned(),
        });
    }

    tracing::trace!(
        record = %def.name(),
        rules = rules.len(),
        params = slots.iter().filter(|s| s.is_param()).count(),
        "built conversion layer"
    );

    Ok(ConversionLayer {
        rules,
        constructor: Constructor {
            name: def.options().constructor.clone(),
            vis: def.vis().clone(),
            slots,
        },
    })
}
