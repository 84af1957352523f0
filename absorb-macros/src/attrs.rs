use absorb_core::{
    CompanionOperation, ElaborationError, FieldSpec, RecordDefinition, RecordOptions, Strategy,
};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Attribute, Expr, Fields, Ident, ItemImpl, ItemStruct, Meta, Path, Result, Token,
    parse::Parse, parse::ParseStream,
};

// -------- record config --------

/// `#[valueclass(...)]` / `#[newtype(...)]` 的参数
/// - `debug = true|false`：是否派生 Debug，默认 true
/// - `clone = true|false` / `eq = true|false`：是否派生 Clone / PartialEq，默认 true
/// - `serde = true|false`：是否派生 serde，默认 false
/// - `constructor = ident`：构造函数名，默认 `new`
/// - `known(Path, ...)`：其它位置已生成的包装类型，遇到时保留
#[derive(Default)]
pub(crate) struct RecordAttrConfig {
    debug: Option<bool>,
    clone: Option<bool>,
    eq: Option<bool>,
    serde: Option<bool>,
    constructor: Option<Ident>,
    known: Option<Vec<Path>>,
}

impl RecordAttrConfig {
    pub(crate) fn into_options(self) -> RecordOptions {
        let mut options = RecordOptions::default();
        if let Some(debug) = self.debug {
            options.debug = debug;
        }
        if let Some(clone) = self.clone {
            options.clone = clone;
        }
        if let Some(eq) = self.eq {
            options.eq = eq;
        }
        if let Some(serde) = self.serde {
            options.serde = serde;
        }
        if let Some(constructor) = self.constructor {
            options.constructor = constructor;
        }
        options.known = self.known.unwrap_or_default();
        options
    }
}

impl Parse for RecordAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();
        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<RecordAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;
        for elem in elems {
            match elem {
                RecordAttrElem::Debug(key, b) => set_once(&mut cfg.debug, b, &key)?,
                RecordAttrElem::Clone(key, b) => set_once(&mut cfg.clone, b, &key)?,
                RecordAttrElem::Eq(key, b) => set_once(&mut cfg.eq, b, &key)?,
                RecordAttrElem::Serde(key, b) => set_once(&mut cfg.serde, b, &key)?,
                RecordAttrElem::Constructor(key, ident) => {
                    set_once(&mut cfg.constructor, ident, &key)?
                }
                RecordAttrElem::Known(key, paths) => set_once(&mut cfg.known, paths, &key)?,
            }
        }
        Ok(cfg)
    }
}

enum RecordAttrElem {
    Debug(Ident, bool),
    Clone(Ident, bool),
    Eq(Ident, bool),
    Serde(Ident, bool),
    Constructor(Ident, Ident),
    Known(Ident, Vec<Path>),
}

impl Parse for RecordAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        match key.to_string().as_str() {
            "debug" => {
                let b = parse_bool(input, &key)?;
                Ok(Self::Debug(key, b))
            }
            "clone" => {
                let b = parse_bool(input, &key)?;
                Ok(Self::Clone(key, b))
            }
            "eq" => {
                let b = parse_bool(input, &key)?;
                Ok(Self::Eq(key, b))
            }
            "serde" => {
                let b = parse_bool(input, &key)?;
                Ok(Self::Serde(key, b))
            }
            "constructor" => {
                let _eq: Token![=] = input.parse()?;
                let ident: Ident = input.parse()?;
                Ok(Self::Constructor(key, ident))
            }
            "known" => {
                let content;
                syn::parenthesized!(content in input);
                let paths = Punctuated::<Path, Token![,]>::parse_terminated(&content)?;
                Ok(Self::Known(key, paths.into_iter().collect()))
            }
            _ => Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'debug' | 'clone' | 'eq' | 'serde' | 'constructor' | 'known'",
            )),
        }
    }
}

fn parse_bool(input: ParseStream, key: &Ident) -> Result<bool> {
    let _eq: Token![=] = input.parse()?;
    let expr: Expr = input.parse()?;
    match expr {
        Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Bool(b),
            ..
        }) => Ok(b.value()),
        other => Err(syn::Error::new(
            other.span(),
            format!("expected boolean literal for '{key}'"),
        )),
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &Ident) -> Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate key '{key}' in attribute"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

// -------- field attrs --------

/// 字段属性
/// - `#[absorb(default = expr, wrapper = Ident, strategy = valueclass|newtype)]`
/// - `#[hold]` / `#[hold(default = expr)]`
#[derive(Default)]
struct FieldAttrs {
    default: Option<Expr>,
    wrapper: Option<Ident>,
    strategy: Option<Strategy>,
    held: bool,
}

enum FieldAttrElem {
    Default(Ident, Expr),
    Wrapper(Ident, Ident),
    Strategy(Ident, Strategy),
}

impl Parse for FieldAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        match key.to_string().as_str() {
            "default" => Ok(Self::Default(key, input.parse()?)),
            "wrapper" => Ok(Self::Wrapper(key, input.parse()?)),
            "strategy" => {
                let value: Ident = input.parse()?;
                let strategy = value
                    .to_string()
                    .parse()
                    .map_err(|msg: String| syn::Error::new(value.span(), msg))?;
                Ok(Self::Strategy(key, strategy))
            }
            _ => Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'default' | 'wrapper' | 'strategy'",
            )),
        }
    }
}

fn is_field_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("absorb") || attr.path().is_ident("hold")
}

// 取出并解析 #[absorb] / #[hold]，其余属性留在字段上
fn take_field_attrs(attrs: &mut Vec<Attribute>) -> Result<FieldAttrs> {
    let mut cfg = FieldAttrs::default();
    let mut absorb_seen = false;
    let mut hold_seen = false;

    let (ours, rest): (Vec<Attribute>, Vec<Attribute>) =
        std::mem::take(attrs).into_iter().partition(is_field_attr);
    *attrs = rest;

    for attr in ours {
        let hold = attr.path().is_ident("hold");
        let name = if hold { "hold" } else { "absorb" };

        if (hold && hold_seen) || (!hold && absorb_seen) {
            return Err(syn::Error::new(
                attr.span(),
                format!("duplicate #[{name}] attribute"),
            ));
        }
        if (hold && absorb_seen) || (!hold && hold_seen) {
            return Err(syn::Error::new(
                attr.span(),
                "#[hold] cannot be combined with #[absorb]",
            ));
        }
        if hold {
            hold_seen = true;
            cfg.held = true;
        } else {
            absorb_seen = true;
        }

        let elems = match &attr.meta {
            Meta::Path(_) => Punctuated::new(),
            Meta::List(_) => {
                attr.parse_args_with(Punctuated::<FieldAttrElem, Token![,]>::parse_terminated)?
            }
            Meta::NameValue(nv) => {
                return Err(syn::Error::new(
                    nv.span(),
                    format!("expected #[{name}] or #[{name}(key = value, ...)]"),
                ));
            }
        };

        // 保留字段上的 wrapper / strategy 交给引擎报告 InvalidHold
        for elem in elems {
            match elem {
                FieldAttrElem::Default(key, expr) => set_once(&mut cfg.default, expr, &key)?,
                FieldAttrElem::Wrapper(key, ident) => set_once(&mut cfg.wrapper, ident, &key)?,
                FieldAttrElem::Strategy(key, s) => set_once(&mut cfg.strategy, s, &key)?,
            }
        }
    }

    Ok(cfg)
}

/// 去掉字段上的 #[absorb] / #[hold]，用于原样输出
pub(crate) fn strip_field_attrs(st: &mut ItemStruct) {
    for field in st.fields.iter_mut() {
        field.attrs.retain(|attr| !is_field_attr(attr));
    }
}

// -------- record --------

/// 校验记录形态并解析字段；字段上的 #[absorb] / #[hold] 被就地移除
pub(crate) fn record_fields(st: &mut ItemStruct) -> Result<Vec<FieldSpec>> {
    let unsupported = |reason: &str| -> syn::Error {
        ElaborationError::UnsupportedRecord {
            record: st.ident.clone(),
            reason: reason.to_string(),
        }
        .into()
    };

    if !st.generics.params.is_empty() || st.generics.where_clause.is_some() {
        return Err(unsupported("generic records are not supported"));
    }
    let Fields::Named(named) = &mut st.fields else {
        return Err(unsupported("only structs with named fields can be records"));
    };

    named
        .named
        .iter_mut()
        .map(|field| -> Result<FieldSpec> {
            let cfg = take_field_attrs(&mut field.attrs)?;
            let name = field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
            Ok(FieldSpec::builder()
                .name(name)
                .ty(field.ty.clone())
                .maybe_default(cfg.default)
                .held(cfg.held)
                .vis(field.vis.clone())
                .attrs(field.attrs.clone())
                .maybe_wrapper(cfg.wrapper)
                .maybe_strategy(cfg.strategy)
                .build())
        })
        .collect()
}

pub(crate) fn record_definition(
    strategy: Strategy,
    options: RecordOptions,
    st: ItemStruct,
    fields: Vec<FieldSpec>,
    instance_items: Vec<ItemImpl>,
    companions: Vec<CompanionOperation>,
) -> RecordDefinition {
    RecordDefinition::builder()
        .name(st.ident)
        .vis(st.vis)
        .attrs(st.attrs)
        .strategy(strategy)
        .options(options)
        .fields(fields)
        .instance_items(instance_items)
        .companions(companions)
        .build()
}
