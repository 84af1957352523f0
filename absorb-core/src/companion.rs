//! 伴生操作改写（Companion Operation Rewriter）
//!
//! 伴生操作是与记录相关、但不属于实例作用域的函数/常量/静态量。改写规则：
//! - 所属记录的伴生函数中，参数名与吸收字段同名且类型等于字段底层类型的参数，
//!   签名改为 `impl Into<W>`，函数体开头重新绑定回底层类型，函数体本身不受影响
//! - 函数体/初始化表达式中，批次内任一记录的结构体字面量，其吸收字段的值被包装
//! - 其它代码（包括实例作用域成员）保持不变
//!
//! 常量上下文（`const fn`、`const`、`static`）中无法调用 `Into::into`，
//! 因此字段值改用 `const fn` 的 `W::new(..)` 包装，且不改写参数。
//! 字段值已经写成同一包装类型的构造（`W::new(..)`、`W::wrap(..)`、`W::from(..)`）
//! 时保持原样；其它已包装的表达式（例如常量 `W` 值）在常量上下文中无法识别，
//! 需改写成上述形式或底层值。
//!
use quote::ToTokens;
use syn::visit::{self, Visit};
use syn::visit_mut::{self, VisitMut};
use syn::{Expr, ExprStruct, FnArg, Ident, Member, Pat, ReturnType, Stmt, Type, parse_quote};

use crate::model::CompanionOperation;
use crate::naming;
use crate::synthesizer::WrapperType;

/// 吸收字段在记录中的位置
#[derive(Debug, Clone)]
pub struct AbsorbedSlot {
    field: String,
    raw: Type,
    raw_key: String,
    wrapper: Ident,
}

/// 改写所需的记录轮廓：记录名与吸收字段
#[derive(Debug, Clone)]
pub struct RecordShape {
    name: Ident,
    slots: Vec<AbsorbedSlot>,
}

impl RecordShape {
    pub fn new(name: &Ident, wrappers: &[WrapperType]) -> Self {
        Self {
            name: name.clone(),
            slots: wrappers
                .iter()
                .map(|w| AbsorbedSlot {
                    field: naming::unraw(w.field()),
                    raw: w.raw().clone(),
                    raw_key: type_key(w.raw()),
                    wrapper: w.name().clone(),
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &Ident {
        &self.name
    }

    fn slot(&self, field: &Ident) -> Option<&AbsorbedSlot> {
        let field = naming::unraw(field);
        self.slots.iter().find(|s| s.field == field)
    }
}

// 类型比较采用 token 文本
fn type_key(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}

/// 改写单个伴生操作
///
/// - `owner`：操作所属记录，用于参数改写
/// - `batch`：同批次的所有记录，用于结构体字面量改写
pub fn rewrite(op: CompanionOperation, owner: &RecordShape, batch: &[RecordShape]) -> CompanionOperation {
    match op {
        CompanionOperation::Function(mut f) => {
            let is_const = f.sig.constness.is_some();
            if !is_const {
                rewrite_params(&mut f, owner);
            }
            LiteralRewriter {
                shapes: batch,
                const_context: is_const,
            }
            .visit_block_mut(&mut f.block);
            CompanionOperation::Function(f)
        }
        CompanionOperation::Constant(mut c) => {
            LiteralRewriter {
                shapes: batch,
                const_context: true,
            }
            .visit_expr_mut(&mut c.expr);
            CompanionOperation::Constant(c)
        }
        CompanionOperation::Static(mut s) => {
            LiteralRewriter {
                shapes: batch,
                const_context: true,
            }
            .visit_expr_mut(&mut s.expr);
            CompanionOperation::Static(s)
        }
    }
}

/// 为模块中的伴生条目选择所属记录
///
/// 依次尝试：签名中出现的记录（先看返回类型，再按顺序看参数；常量与静态量看其类型）、
/// 模块中唯一的记录、与模块名（PascalCase）同名的记录。都不满足时返回 `None`。
pub fn owner_of<'a>(op: &CompanionOperation, records: &'a [Ident], module: &Ident) -> Option<&'a Ident> {
    let mut types: Vec<&Type> = Vec::new();
    match op {
        CompanionOperation::Function(f) => {
            if let ReturnType::Type(_, ty) = &f.sig.output {
                types.push(ty);
            }
            types.extend(f.sig.inputs.iter().filter_map(|arg| match arg {
                FnArg::Typed(pat_ty) => Some(pat_ty.ty.as_ref()),
                FnArg::Receiver(_) => None,
            }));
        }
        CompanionOperation::Constant(c) => types.push(&c.ty),
        CompanionOperation::Static(s) => types.push(&s.ty),
    }

    let named = types.into_iter().find_map(|ty| {
        let mut finder = RecordFinder { records, found: None };
        finder.visit_type(ty);
        finder.found
    });
    if named.is_some() {
        return named;
    }

    if let [only] = records {
        return Some(only);
    }

    let module_record = naming::to_pascal_case(&naming::unraw(module));
    records.iter().find(|r| **r == module_record)
}

struct RecordFinder<'a> {
    records: &'a [Ident],
    found: Option<&'a Ident>,
}

impl<'ast> Visit<'ast> for RecordFinder<'_> {
    fn visit_path(&mut self, path: &'ast syn::Path) {
        if self.found.is_some() {
            return;
        }
        if let Some(seg) = path.segments.last() {
            self.found = self.records.iter().find(|r| **r == seg.ident);
        }
        visit::visit_path(self, path);
    }
}

fn rewrite_params(f: &mut syn::ItemFn, owner: &RecordShape) {
    let mut rebinds: Vec<Stmt> = Vec::new();

    for input in f.sig.inputs.iter_mut() {
        let FnArg::Typed(pat_ty) = input else {
            continue;
        };
        let Pat::Ident(pat_ident) = pat_ty.pat.as_mut() else {
            continue;
        };
        if pat_ident.by_ref.is_some() || pat_ident.subpat.is_some() {
            continue;
        }
        let Some(slot) = owner.slot(&pat_ident.ident) else {
            continue;
        };
        if type_key(&pat_ty.ty) != slot.raw_key {
            continue;
        }

        let wrapper = &slot.wrapper;
        let raw = &slot.raw;
        let ident = pat_ident.ident.clone();
        let mutability = pat_ident.mutability.take();
        *pat_ty.ty = parse_quote! { impl ::core::convert::Into<#wrapper> };
        rebinds.push(parse_quote! {
            let #mutability #ident: #raw =
                <#wrapper as ::absorb::Wrapper>::unwrap(::core::convert::Into::<#wrapper>::into(#ident));
        });

        tracing::trace!(
            operation = %f.sig.ident,
            param = %ident,
            wrapper = %wrapper,
            "rewrote companion parameter"
        );
    }

    if !rebinds.is_empty() {
        f.block.stmts.splice(0..0, rebinds);
    }
}

struct LiteralRewriter<'a> {
    shapes: &'a [RecordShape],
    const_context: bool,
}

impl LiteralRewriter<'_> {
    fn wrap(&self, wrapper: &Ident, expr: &Expr) -> Expr {
        if self.const_context {
            if constructs(wrapper, expr) {
                return expr.clone();
            }
            parse_quote! { #wrapper::new(#expr) }
        } else {
            parse_quote! { ::core::convert::Into::<#wrapper>::into(#expr) }
        }
    }
}

// 表达式是否为 `W::new(..)` / `W::wrap(..)` / `W::from(..)`
fn constructs(wrapper: &Ident, expr: &Expr) -> bool {
    let Expr::Call(call) = expr else {
        return false;
    };
    let Expr::Path(func) = call.func.as_ref() else {
        return false;
    };
    if func.qself.is_some() {
        return false;
    }
    let segments: Vec<&syn::PathSegment> = func.path.segments.iter().collect();
    match segments.as_slice() {
        [.., ty, method] => {
            ty.ident == *wrapper && ["new", "wrap", "from"].iter().any(|m| method.ident == m)
        }
        _ => false,
    }
}

impl VisitMut for LiteralRewriter<'_> {
    fn visit_expr_struct_mut(&mut self, node: &mut ExprStruct) {
        visit_mut::visit_expr_struct_mut(self, node);

        if node.qself.is_some() {
            return;
        }
        let Some(shape) = node
            .path
            .segments
            .last()
            .and_then(|seg| self.shapes.iter().find(|s| s.name == seg.ident))
        else {
            return;
        };

        for fv in node.fields.iter_mut() {
            let Member::Named(ident) = &fv.member else {
                continue;
            };
            let Some(slot) = shape.slot(ident) else {
                continue;
            };
            fv.expr = self.wrap(&slot.wrapper, &fv.expr);
            // 简写形式 `Record { field }` 展开为 `field: ...`
            fv.colon_token.get_or_insert_with(Default::default);
        }
    }

    // 不进入嵌套的条目定义
    fn visit_item_mut(&mut self, _node: &mut syn::Item) {}
}
