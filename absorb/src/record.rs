//! 记录元数据
//!
//! 宏为每条记录实现 `Record`，描述字段的吸收/保留策略，
//! 便于调试输出与测试断言。
//!

use crate::wrapper::Strategy;

/// 由 `#[valueclass]` / `#[newtype]` 生成的记录
pub trait Record {
    /// 记录名
    const NAME: &'static str;

    /// 按声明顺序排列的字段信息
    const FIELDS: &'static [FieldInfo];

    /// 按字段名查找
    fn field(name: &str) -> Option<&'static FieldInfo> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }
}

/// 单个字段的元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// 字段名
    pub name: &'static str,
    /// 声明的底层类型（源码文本）
    pub raw_type: &'static str,
    /// 包装类型名；保留（hold）的字段为 `None`
    pub wrapper: Option<&'static str>,
    /// 包装策略；保留的字段为 `None`
    pub strategy: Option<Strategy>,
    /// 是否声明了默认值
    pub has_default: bool,
}

impl FieldInfo {
    /// 被吸收的字段
    pub const fn absorbed(
        name: &'static str,
        raw_type: &'static str,
        wrapper: &'static str,
        strategy: Strategy,
        has_default: bool,
    ) -> Self {
        Self {
            name,
            raw_type,
            wrapper: Some(wrapper),
            strategy: Some(strategy),
            has_default,
        }
    }

    /// 保留原类型的字段
    pub const fn held(name: &'static str, raw_type: &'static str, has_default: bool) -> Self {
        Self {
            name,
            raw_type,
            wrapper: None,
            strategy: None,
            has_default,
        }
    }

    pub const fn is_held(&self) -> bool {
        self.wrapper.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valueclass;

    #[valueclass]
    struct Account {
        #[absorb(default = true)]
        activated: bool,
        number: i64,
        #[hold]
        manager: String,
    }

    // 测试字段元数据与声明一致
    #[test]
    fn test_fields_metadata() {
        assert_eq!(Account::NAME, "Account");
        assert_eq!(Account::FIELDS.len(), 3);

        let activated = Account::field("activated").unwrap();
        assert_eq!(activated.wrapper, Some("AccountActivated"));
        assert_eq!(activated.strategy, Some(Strategy::ValueClass));
        assert!(activated.has_default);

        let manager = Account::field("manager").unwrap();
        assert!(manager.is_held());
        assert_eq!(manager.raw_type, "String");
        assert!(!manager.has_default);

        assert!(Account::field("missing").is_none());
    }

    // 测试字段顺序保持声明顺序
    #[test]
    fn test_fields_keep_declaration_order() {
        let names: Vec<_> = Account::FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, ["activated", "number", "manager"]);

        let account = Account::new(1, "m".to_string());
        assert_eq!(account.number, AccountNumber::new(1));
        assert!(*account.activated.get());
        assert_eq!(account.manager, "m");
    }
}
