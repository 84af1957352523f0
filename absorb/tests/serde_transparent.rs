use absorb::{Wrapper, newtype, valueclass};
use anyhow::Result as AnyResult;
use serde::{Deserialize, Serialize};

#[valueclass(serde = true)]
pub struct Profile {
    pub handle: String,
    pub age: u8,
    #[hold]
    pub emails: Vec<String>,
}

#[newtype]
#[derive(Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[test]
fn wrappers_serialize_as_raw_values() -> AnyResult<()> {
    let profile = Profile::new("ada".to_string(), 36u8, vec!["a@example.com".to_string()]);
    let json = serde_json::to_string(&profile)?;
    assert_eq!(json, r#"{"handle":"ada","age":36,"emails":["a@example.com"]}"#);

    let back: Profile = serde_json::from_str(&json)?;
    assert_eq!(back, profile);
    Ok(())
}

#[test]
fn user_serde_derives_are_kept() -> AnyResult<()> {
    let p = Point::new(1, -2);
    let value = serde_json::to_value(&p)?;
    assert_eq!(value, serde_json::json!({ "x": 1, "y": -2 }));

    let back: Point = serde_json::from_value(value)?;
    assert_eq!(*back.x + *back.y, -1);
    Ok(())
}

#[test]
fn bare_wrapper_round_trips_through_json() -> AnyResult<()> {
    let age = ProfileAge::wrap(7);
    assert_eq!(serde_json::to_string(&age)?, "7");
    let back: ProfileAge = serde_json::from_str("7")?;
    assert_eq!(back.unwrap(), 7);
    Ok(())
}
