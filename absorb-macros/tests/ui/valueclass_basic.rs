use absorb::{Record, Wrapper, valueclass};

#[valueclass]
pub struct Account {
    #[absorb(default = true)]
    pub activated: bool,
    pub number: i64,
    #[hold]
    pub manager: String,
}

fn main() {
    let account = Account::new(123, "X".to_string());

    // 默认值在构造处包装
    assert_eq!(account.activated, AccountActivated::wrap(true));
    // 吸收字段需显式解包
    assert_eq!(account.number.unwrap(), 123);
    // 保留字段保持原类型
    let manager: &String = &account.manager;
    assert_eq!(manager, "X");

    // 往返
    assert_eq!(Account::unwrap_number(Account::wrap_number(7)), 7);
    assert_eq!(AccountNumber::wrap(7).unwrap(), 7);

    // 结构相等
    let same = Account::new(AccountNumber::new(123), "X".to_string());
    assert_eq!(account, same);
    let _ = format!("{account:?}");

    // 元数据
    assert_eq!(Account::NAME, "Account");
    assert_eq!(Account::FIELDS.len(), 3);
    assert!(Account::field("manager").unwrap().is_held());
    assert_eq!(Account::field("number").unwrap().wrapper, Some("AccountNumber"));
}
