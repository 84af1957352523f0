// 透明序列化：包装类型与底层值的序列化形态一致
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::wrapped::Wrapped;

impl<T: Serialize, G> Serialize for Wrapped<T, G> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, G> Deserialize<'de> for Wrapped<T, G> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::new)
    }
}
