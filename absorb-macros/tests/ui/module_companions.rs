use absorb::{Wrapper, valueclass};

#[valueclass]
mod bank {
    pub struct Account {
        #[absorb(default = true)]
        pub activated: bool,
        pub number: i64,
        #[hold]
        pub manager: String,
    }

    // AccountNumber 由同一批次生成，保留不再包装
    pub struct Transfer {
        pub from: AccountNumber,
        pub to: AccountNumber,
        pub amount: u64,
    }

    impl Account {
        pub fn is_active(&self) -> bool {
            *self.activated.get()
        }
    }

    /// 伴生函数按底层类型书写
    pub fn open(number: i64, manager: String) -> Account {
        Account {
            activated: true,
            number,
            manager,
        }
    }

    pub fn transfer(from: &Account, to: &Account, amount: u64) -> Transfer {
        Transfer {
            from: from.number,
            to: to.number,
            amount,
        }
    }

    pub const VAULT: Account = Account {
        activated: false,
        number: 0,
        manager: String::new(),
    };
}

use bank::{Account, AccountNumber, VAULT, open, transfer};

fn main() {
    let account = open(42, "X".to_string());
    assert!(account.is_active());
    assert_eq!(account.number.unwrap(), 42);

    let other = Account::new(7, "Y".to_string());
    let t = transfer(&account, &other, 100);
    let from: AccountNumber = t.from;
    assert_eq!(from, account.number);
    assert_eq!(t.to.unwrap(), 7);
    assert_eq!(t.amount.unwrap(), 100);

    assert!(!VAULT.is_active());
    assert_eq!(VAULT.number.unwrap(), 0);
}
