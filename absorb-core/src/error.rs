//! 展开期统一错误定义
//!
//! 所有错误都发生在定义/展开阶段（等价于编译期），运行期不存在与包装相关的失败。
//! 宏前端通过 `span()` 把错误定位到出错的标识符上。
//!
use proc_macro2::Span;
use syn::Ident;
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ElaborationError {
    // --- 字段定义 ---
    #[error("field `{field}` of `{record}` has no declared type")]
    MissingType { record: Ident, field: Ident },
    #[error("duplicate field `{field}` in `{record}`")]
    DuplicateField { record: Ident, field: Ident },
    #[error("invalid hold on field `{field}`: {reason}")]
    InvalidHold { field: Ident, reason: String },

    // --- 包装类型 ---
    #[error("wrapper type `{name}` is produced twice ({first} and {second})")]
    DuplicateWrapper {
        name: Ident,
        first: String,
        second: String,
    },

    // --- 记录形态 ---
    #[error("unsupported record `{record}`: {reason}")]
    UnsupportedRecord { record: Ident, reason: String },

    // --- 声明式 schema ---
    #[error("invalid {context}: {source}")]
    Syntax {
        context: String,
        #[source]
        source: syn::Error,
    },
    #[error("schema error: {source}")]
    Schema {
        #[from]
        source: serde_json::Error,
    },
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// 统一 Result 类型别名
pub type ElaborationResult<T> = Result<T, ElaborationError>;

impl ElaborationError {
    /// 出错位置；无法定位时返回 `call_site`
    pub fn span(&self) -> Span {
        match self {
            Self::MissingType { field, .. }
            | Self::DuplicateField { field, .. }
            | Self::InvalidHold { field, .. } => field.span(),
            Self::DuplicateWrapper { name, .. } => name.span(),
            Self::UnsupportedRecord { record, .. } => record.span(),
            Self::Syntax { source, .. } => source.span(),
            Self::Schema { .. } | Self::Io { .. } => Span::call_site(),
        }
    }
}

impl From<ElaborationError> for syn::Error {
    fn from(err: ElaborationError) -> Self {
        syn::Error::new(err.span(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::format_ident;

    // 测试错误信息包含记录名与字段名
    #[test]
    fn test_display() {
        let err = ElaborationError::MissingType {
            record: format_ident!("Account"),
            field: format_ident!("number"),
        };
        assert_eq!(
            err.to_string(),
            "field `number` of `Account` has no declared type"
        );
    }

    // 测试转换为 syn::Error 后保留信息
    #[test]
    fn test_into_syn_error() {
        let err = ElaborationError::DuplicateField {
            record: format_ident!("Account"),
            field: format_ident!("number"),
        };
        let syn_err: syn::Error = err.into();
        assert_eq!(syn_err.to_string(), "duplicate field `number` in `Account`");
    }
}
