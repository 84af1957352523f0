use absorb::{Strategy, Tag, newtype};
use std::collections::HashMap;

#[newtype]
pub struct Order {
    pub sku: String,
    pub quantity: u32,
    #[absorb(strategy = valueclass)]
    pub note: String,
}

fn main() {
    let order = Order::new("A-1".to_string(), 3u32, "gift".to_string());

    // 隐式转换层：Deref 到底层类型
    assert_eq!(order.sku.len(), 3);
    assert_eq!(*order.quantity + 1, 4);

    // Borrow<Raw>：以包装类型为键，用底层值查找
    let mut stock: HashMap<OrderSku, u32> = HashMap::new();
    stock.insert(order.sku.clone(), 10);
    assert_eq!(stock.get(&"A-1".to_string()), Some(&10));

    // 字段级策略覆写
    assert_eq!(<OrderSkuTag as Tag>::STRATEGY, Strategy::NewType);
    assert_eq!(<OrderNoteTag as Tag>::STRATEGY, Strategy::ValueClass);
    assert_eq!(order.note.get(), "gift");
}
