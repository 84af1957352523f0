//! 记录字段包装示例
//!
//! 展示 `#[valueclass]` / `#[newtype]` 生成的包装类型、构造函数与伴生操作。
//!
//! 运行示例：
//! ```bash
//! cargo run -p absorb --example account
//! ```

use absorb::{Record, Tag, Wrapper, newtype, unwrap_all, valueclass, wrap_all};
use std::collections::HashMap;

#[valueclass]
mod bank {
    pub struct Account {
        #[absorb(default = true)]
        pub activated: bool,
        pub number: i64,
        #[hold]
        pub manager: String,
    }

    pub struct Transfer {
        pub from: AccountNumber,
        pub to: AccountNumber,
        pub cents: u64,
    }

    pub fn open(number: i64, manager: String) -> Account {
        Account::new(number, manager)
    }

    pub fn transfer(from: &Account, to: &Account, cents: u64) -> Transfer {
        Transfer {
            from: from.number,
            to: to.number,
            cents,
        }
    }
}

#[newtype]
pub struct Product {
    pub sku: String,
    pub stock: u32,
}

fn main() {
    println!("=== 记录字段包装示例 ===\n");

    // 1. 构造：默认值在构造处包装，保留字段保持原类型
    println!("1. 构造记录");
    let alice = bank::open(1001, "Alice".to_string());
    let bob = bank::Account::new(1002, "Bob".to_string()).with_activated(false);
    println!("   alice = {:?}", alice);
    println!("   bob   = {:?}\n", bob);

    // 2. 往返：wrap 与 unwrap 互逆
    println!("2. 往返");
    let number = bank::AccountNumber::wrap(1001);
    println!("   wrap(1001) = {:?}", number);
    println!("   unwrap     = {}", number.unwrap());
    println!("   与 alice.number 相等: {}\n", number == alice.number);

    // 3. 伴生操作：参数按底层类型书写，字段自动包装
    println!("3. 伴生操作");
    let t = bank::transfer(&alice, &bob, 2500);
    println!("   transfer = {:?}", t);
    println!("   金额: {} 分\n", t.cents);

    // 4. 元数据
    println!("4. 记录元数据");
    for field in <bank::Transfer as Record>::FIELDS {
        match field.wrapper {
            Some(w) => println!("   {}: {} -> {}", field.name, field.raw_type, w),
            None => println!("   {}: {} (保留)", field.name, field.raw_type),
        }
    }
    println!();

    // 5. newtype：隐式转换层
    println!("5. newtype 策略");
    let product = Product::new("A-1".to_string(), 3u32);
    println!("   策略: {:?}", <ProductSkuTag as Tag>::STRATEGY);
    println!("   sku 长度（Deref）: {}", product.sku.len());
    let mut prices: HashMap<ProductSku, u32> = HashMap::new();
    prices.insert(product.sku.clone(), 990);
    println!("   以 String 查找（Borrow）: {:?}\n", prices.get(&"A-1".to_string()));

    // 6. 批量转换
    println!("6. 批量转换");
    let stocks: Vec<ProductStock> = wrap_all(vec![1, 2, 3]).collect();
    let total: u32 = unwrap_all(stocks).sum();
    println!("   总库存: {}", total);
}
