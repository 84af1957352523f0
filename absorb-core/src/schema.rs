//! 声明式 schema（JSON）
//!
//! 供 build script 使用：不经过属性宏，直接用 JSON 描述记录。
//! 类型、表达式、`impl` 块与伴生条目以 Rust 源码字符串给出，解析失败报告为
//! `ElaborationError::Syntax`。未知键一律拒绝。
//!
//! ```json
//! {
//!   "records": [{
//!     "name": "Account",
//!     "vis": "pub",
//!     "fields": [
//!       { "name": "activated", "type": "bool", "default": "true" },
//!       { "name": "number", "type": "i64" },
//!       { "name": "manager", "type": "String", "held": true }
//!     ]
//!   }]
//! }
//! ```
//!
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use syn::parse::Parse;
use syn::{Attribute, Ident, Item, ItemImpl, Visibility, parse_quote};

use crate::error::{ElaborationError, ElaborationResult};
use crate::model::{CompanionOperation, FieldSpec, RecordDefinition, RecordOptions, Strategy};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    pub records: Vec<RecordSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSchema {
    pub name: String,
    #[serde(default)]
    pub vis: Option<String>,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_true")]
    pub debug: bool,
    #[serde(default = "default_true")]
    pub clone: bool,
    #[serde(default = "default_true")]
    pub eq: bool,
    #[serde(default)]
    pub serde: bool,
    #[serde(default)]
    pub constructor: Option<String>,
    #[serde(default)]
    pub known: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    /// 实例作用域的 `impl` 块源码
    #[serde(default)]
    pub instance: Vec<String>,
    /// 伴生函数 / 常量 / 静态量源码
    #[serde(default)]
    pub companions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub held: bool,
    #[serde(default)]
    pub wrapper: Option<String>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
    #[serde(default)]
    pub vis: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
}

fn default_true() -> bool {
    true
}

fn parse<T: Parse>(src: &str, context: impl FnOnce() -> String) -> ElaborationResult<T> {
    syn::parse_str(src).map_err(|source| ElaborationError::Syntax {
        context: context(),
        source,
    })
}

fn parse_vis(src: Option<&str>, context: impl FnOnce() -> String) -> ElaborationResult<Visibility> {
    match src {
        Some(src) => parse(src, context),
        None => Ok(Visibility::Inherited),
    }
}

impl Schema {
    pub fn from_path(path: impl AsRef<Path>) -> ElaborationResult<Self> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// 逐条转换，单条记录出错不影响其它记录
    pub fn into_definitions(self) -> Vec<ElaborationResult<RecordDefinition>> {
        self.records.into_iter().map(RecordDefinition::try_from).collect()
    }
}

impl FromStr for Schema {
    type Err = ElaborationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl TryFrom<FieldSchema> for FieldSpec {
    type Error = ElaborationError;

    fn try_from(f: FieldSchema) -> Result<Self, Self::Error> {
        let name: Ident = parse(&f.name, || "field name".to_string())?;
        let ctx = |what: &str| format!("{what} of field `{}`", f.name);

        let ty = f.ty.as_deref().map(|s| parse(s, || ctx("type"))).transpose()?;
        let default = f
            .default
            .as_deref()
            .map(|s| parse(s, || ctx("default")))
            .transpose()?;
        let wrapper = f
            .wrapper
            .as_deref()
            .map(|s| parse(s, || ctx("wrapper name")))
            .transpose()?;
        let vis = parse_vis(f.vis.as_deref(), || ctx("visibility"))?;
        let attrs: Vec<Attribute> = f
            .doc
            .iter()
            .map(|doc| {
                let doc = format!(" {doc}");
                parse_quote!(#[doc = #doc])
            })
            .collect();

        Ok(FieldSpec::builder()
            .name(name)
            .maybe_ty(ty)
            .maybe_default(default)
            .held(f.held)
            .vis(vis)
            .attrs(attrs)
            .maybe_wrapper(wrapper)
            .maybe_strategy(f.strategy)
            .build())
    }
}

impl TryFrom<RecordSchema> for RecordDefinition {
    type Error = ElaborationError;

    fn try_from(r: RecordSchema) -> Result<Self, Self::Error> {
        let name: Ident = parse(&r.name, || "record name".to_string())?;
        let ctx = |what: &str| format!("{what} of record `{}`", r.name);

        let vis = parse_vis(r.vis.as_deref(), || ctx("visibility"))?;
        let mut options = RecordOptions {
            debug: r.debug,
            clone: r.clone,
            eq: r.eq,
            serde: r.serde,
            ..Default::default()
        };
        if let Some(ctor) = r.constructor.as_deref() {
            options.constructor = parse(ctor, || ctx("constructor"))?;
        }
        options.known = r
            .known
            .iter()
            .map(|s| parse(s, || ctx("known wrapper")))
            .collect::<ElaborationResult<_>>()?;

        let fields = r
            .fields
            .into_iter()
            .map(FieldSpec::try_from)
            .collect::<ElaborationResult<Vec<_>>>()?;

        let instance_items = r
            .instance
            .iter()
            .map(|s| parse::<ItemImpl>(s, || ctx("instance item")))
            .collect::<ElaborationResult<Vec<_>>>()?;

        let companions = r
            .companions
            .iter()
            .map(|s| {
                let item: Item = parse(s, || ctx("companion"))?;
                CompanionOperation::try_from(item).map_err(|_| ElaborationError::UnsupportedRecord {
                    record: name.clone(),
                    reason: "companions must be `fn`, `const` or `static` items".to_string(),
                })
            })
            .collect::<ElaborationResult<Vec<_>>>()?;

        Ok(RecordDefinition::builder()
            .name(name)
            .vis(vis)
            .strategy(r.strategy)
            .options(options)
            .fields(fields)
            .instance_items(instance_items)
            .companions(companions)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;

    const ACCOUNTS: &str = r#"{
        "records": [{
            "name": "Account",
            "vis": "pub",
            "constructor": "open",
            "fields": [
                { "name": "activated", "type": "bool", "default": "true", "doc": "Whether the account is usable" },
                { "name": "number", "type": "i64" },
                { "name": "manager", "type": "String", "held": true }
            ],
            "instance": ["impl Account { pub fn is_active(&self) -> bool { *self.activated.get() } }"],
            "companions": ["pub const LIMIT: i64 = 10;"]
        }]
    }"#;

    // 测试完整记录的解析
    #[test]
    fn test_parse_record() {
        let schema: Schema = ACCOUNTS.parse().unwrap();
        let mut defs = schema.into_definitions();
        let def = defs.remove(0).unwrap();

        assert_eq!(def.name(), "Account");
        assert_eq!(def.strategy(), Strategy::ValueClass);
        assert!(def.options().debug);
        assert!(def.options().clone);
        assert_eq!(def.options().constructor, "open");
        assert_eq!(def.fields().len(), 3);
        assert!(def.field("manager").unwrap().held());
        assert_eq!(
            def.field("activated").unwrap().default().unwrap().to_token_stream().to_string(),
            "true"
        );
        assert_eq!(def.field("activated").unwrap().attrs().len(), 1);
        assert_eq!(def.instance_items().len(), 1);
        assert_eq!(def.companions()[0].name(), "LIMIT");
    }

    // 测试未知键被拒绝
    #[test]
    fn test_unknown_key_rejected() {
        let err = r#"{ "records": [{ "name": "A", "colour": "red" }] }"#
            .parse::<Schema>()
            .unwrap_err();
        assert!(matches!(err, ElaborationError::Schema { .. }));
    }

    // 测试源码解析失败只影响出错的记录
    #[test]
    fn test_syntax_error_is_local() {
        let schema: Schema = r#"{
            "records": [
                { "name": "Bad", "fields": [{ "name": "x", "type": "Vec<" }] },
                { "name": "Good", "strategy": "newtype", "fields": [{ "name": "y", "type": "u8" }] }
            ]
        }"#
        .parse()
        .unwrap();
        let defs = schema.into_definitions();
        let err = defs[0].as_ref().unwrap_err();
        assert!(matches!(err, ElaborationError::Syntax { .. }));
        assert!(err.to_string().contains("type of field `x`"));
        assert_eq!(defs[1].as_ref().unwrap().strategy(), Strategy::NewType);
    }

    // 测试关闭 Clone / PartialEq 派生
    #[test]
    fn test_derive_opt_out() {
        let schema: Schema = r#"{
            "records": [{ "name": "Job", "clone": false, "eq": false, "fields": [
                { "name": "lock", "type": "std::sync::Mutex<u8>", "held": true }
            ]}]
        }"#
        .parse()
        .unwrap();
        let def = schema.into_definitions().remove(0).unwrap();
        assert!(!def.options().clone);
        assert!(!def.options().eq);
    }

    // 测试伴生条目只接受函数、常量与静态量
    #[test]
    fn test_companion_kind() {
        let schema: Schema = r#"{
            "records": [{ "name": "A", "companions": ["struct Nope;"] }]
        }"#
        .parse()
        .unwrap();
        let err = schema.into_definitions().remove(0).unwrap_err();
        assert!(matches!(err, ElaborationError::UnsupportedRecord { .. }));
    }
}
