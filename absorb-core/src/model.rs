//! 记录定义（输入模型）
//!
//! `RecordDefinition` 描述一条待展开的记录：有序字段列表、实例作用域的 `impl` 块
//! 以及伴生操作。构造后不可变，由 `Elaborator` 消费并产出 `TransformedRecord`。
//!
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use bon::Builder;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use serde::{Deserialize, Serialize};
use syn::{Attribute, Expr, Ident, Item, ItemConst, ItemFn, ItemImpl, ItemStatic, Path, Type, Visibility};

use crate::error::{ElaborationError, ElaborationResult};
use crate::naming;

/// 包装策略
///
/// 两种策略在 Rust 中都生成 `#[repr(transparent)]` 包装，运行时零开销；
/// `NewType` 额外为包装类型提供隐式转换层（`Deref` / `Borrow`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    ValueClass,
    NewType,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valueclass" => Ok(Self::ValueClass),
            "newtype" => Ok(Self::NewType),
            other => Err(format!(
                "unknown strategy '{other}'; expected 'valueclass' | 'newtype'"
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueClass => f.write_str("valueclass"),
            Self::NewType => f.write_str("newtype"),
        }
    }
}

/// 字段策略：吸收为包装类型，或保留原类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Absorb,
    Hold,
}

/// 记录级选项
#[derive(Debug, Clone)]
pub struct RecordOptions {
    /// 是否为记录派生 Debug（默认 true）
    pub debug: bool,
    /// 是否为记录派生 Clone（默认 true）；保留字段不可克隆时关闭
    pub clone: bool,
    /// 是否为记录派生 PartialEq（默认 true）
    pub eq: bool,
    /// 是否为记录派生 serde::Serialize / serde::Deserialize（默认 false）
    pub serde: bool,
    /// 构造函数名（默认 `new`）
    pub constructor: Ident,
    /// 外部已生成的包装类型，遇到时保留不再吸收
    pub known: Vec<Path>,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            debug: true,
            clone: true,
            eq: true,
            serde: false,
            constructor: naming::call_site("new"),
            known: Vec::new(),
        }
    }
}

/// 字段定义
#[derive(Debug, Clone, Builder)]
pub struct FieldSpec {
    name: Ident,
    ty: Option<Type>,
    default: Option<Expr>,
    #[builder(default)]
    held: bool,
    #[builder(default = Visibility::Inherited)]
    vis: Visibility,
    #[builder(default)]
    attrs: Vec<Attribute>,
    /// 覆写包装类型名
    wrapper: Option<Ident>,
    /// 覆写记录级策略
    strategy: Option<Strategy>,
}

impl FieldSpec {
    pub fn name(&self) -> &Ident {
        &self.name
    }

    /// 声明类型；缺失或为 `_` 时返回 `None`
    pub fn declared_type(&self) -> Option<&Type> {
        match &self.ty {
            Some(Type::Infer(_)) | None => None,
            Some(ty) => Some(ty),
        }
    }

    pub fn default(&self) -> Option<&Expr> {
        self.default.as_ref()
    }

    pub fn held(&self) -> bool {
        self.held
    }

    pub fn vis(&self) -> &Visibility {
        &self.vis
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn wrapper(&self) -> Option<&Ident> {
        self.wrapper.as_ref()
    }

    pub fn strategy(&self) -> Option<Strategy> {
        self.strategy
    }
}

/// 伴生操作：与记录同名空间相关、但不属于实例作用域的函数与值
#[derive(Debug, Clone)]
pub enum CompanionOperation {
    Function(ItemFn),
    Constant(ItemConst),
    Static(ItemStatic),
}

impl CompanionOperation {
    pub fn name(&self) -> &Ident {
        match self {
            Self::Function(f) => &f.sig.ident,
            Self::Constant(c) => &c.ident,
            Self::Static(s) => &s.ident,
        }
    }
}

impl TryFrom<Item> for CompanionOperation {
    type Error = Item;

    fn try_from(item: Item) -> Result<Self, Item> {
        match item {
            Item::Fn(f) => Ok(Self::Function(f)),
            Item::Const(c) => Ok(Self::Constant(c)),
            Item::Static(s) => Ok(Self::Static(s)),
            other => Err(other),
        }
    }
}

impl From<CompanionOperation> for Item {
    fn from(op: CompanionOperation) -> Self {
        match op {
            CompanionOperation::Function(f) => Item::Fn(f),
            CompanionOperation::Constant(c) => Item::Const(c),
            CompanionOperation::Static(s) => Item::Static(s),
        }
    }
}

impl ToTokens for CompanionOperation {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Self::Function(f) => f.to_tokens(tokens),
            Self::Constant(c) => c.to_tokens(tokens),
            Self::Static(s) => s.to_tokens(tokens),
        }
    }
}

/// 记录定义
#[derive(Debug, Clone, Builder)]
pub struct RecordDefinition {
    name: Ident,
    #[builder(default = Visibility::Inherited)]
    vis: Visibility,
    /// 透传到记录上的属性（文档、derive 等）
    #[builder(default)]
    attrs: Vec<Attribute>,
    #[builder(default)]
    strategy: Strategy,
    #[builder(default)]
    options: RecordOptions,
    #[builder(default)]
    fields: Vec<FieldSpec>,
    /// 实例作用域：记录自身的 `impl` 块，原样保留
    #[builder(default)]
    instance_items: Vec<ItemImpl>,
    #[builder(default)]
    companions: Vec<CompanionOperation>,
}

impl RecordDefinition {
    pub fn name(&self) -> &Ident {
        &self.name
    }

    pub fn vis(&self) -> &Visibility {
        &self.vis
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn options(&self) -> &RecordOptions {
        &self.options
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn instance_items(&self) -> &[ItemImpl] {
        &self.instance_items
    }

    pub fn companions(&self) -> &[CompanionOperation] {
        &self.companions
    }

    /// 定义期校验：字段名唯一、保留标记与包装选项不冲突、保留字段必须有类型
    pub fn validate(&self) -> ElaborationResult<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(naming::unraw(&field.name)) {
                return Err(ElaborationError::DuplicateField {
                    record: self.name.clone(),
                    field: field.name.clone(),
                });
            }

            if field.held {
                if field.wrapper.is_some() {
                    return Err(ElaborationError::InvalidHold {
                        field: field.name.clone(),
                        reason: "a held field cannot name a wrapper type".to_string(),
                    });
                }
                if field.strategy.is_some() {
                    return Err(ElaborationError::InvalidHold {
                        field: field.name.clone(),
                        reason: "a held field cannot choose a wrapping strategy".to_string(),
                    });
                }
                if field.declared_type().is_none() {
                    return Err(ElaborationError::MissingType {
                        record: self.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// 不做任何包装的原始形态，用于展开失败时的回退输出
    pub fn to_plain_tokens(&self) -> TokenStream {
        let RecordDefinition {
            name,
            vis,
            attrs,
            fields,
            instance_items,
            companions,
            ..
        } = self;

        let fields = fields.iter().map(|f| {
            let FieldSpec {
                name, vis, attrs, ..
            } = f;
            let ty = match &f.ty {
                Some(ty) => ty.to_token_stream(),
                None => quote! { _ },
            };
            quote! { #(#attrs)* #vis #name: #ty }
        });

        quote! {
            #(#attrs)*
            #vis struct #name {
                #(#fields,)*
            }

            #(#instance_items)*

            #(#companions)*
        }
    }
}
