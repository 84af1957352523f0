use absorb::{Record, Wrapper, valueclass};

#[valueclass]
pub struct Account {
    pub number: i64,
}

#[valueclass(known(AccountNumber))]
pub struct Statement {
    pub account: AccountNumber,
    pub balance: i64,
}

// 未列入 known 的外部包装类型会再包装一层
#[valueclass]
pub struct Ledger {
    pub account: AccountNumber,
}

fn main() {
    let account = Account::new(1);
    let statement = Statement::new(account.number, 500);

    // 已知的包装类型保留，不再二次包装
    let number: AccountNumber = statement.account;
    assert_eq!(number.unwrap(), 1);
    assert_eq!(statement.balance.unwrap(), 500);
    assert!(Statement::field("account").unwrap().is_held());

    let ledger = Ledger::new(account.number);
    let inner: AccountNumber = ledger.account.unwrap();
    assert_eq!(inner.unwrap(), 1);
    assert_eq!(Ledger::field("account").unwrap().wrapper, Some("LedgerAccount"));
}
