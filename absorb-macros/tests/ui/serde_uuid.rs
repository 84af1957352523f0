use absorb::valueclass;
use uuid::Uuid;

#[valueclass(serde = true)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    #[hold]
    pub tags: Vec<String>,
}

fn main() {
    let id = Uuid::new_v4();
    let customer = Customer::new(id, "Ada".to_string(), vec!["vip".to_string()]);

    // 包装类型透明序列化
    let json = serde_json::to_value(&customer).unwrap();
    assert_eq!(json["id"], serde_json::json!(id.to_string()));
    assert_eq!(json["name"], "Ada");
    assert_eq!(json["tags"][0], "vip");

    let back: Customer = serde_json::from_value(json).unwrap();
    assert_eq!(back, customer);
}
