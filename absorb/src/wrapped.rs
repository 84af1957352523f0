//! 具名包装类型（Wrapped）
//!
//! `Wrapped<T, G>` 以 `#[repr(transparent)]` 包裹单个底层值 `T`，
//! 标签 `G` 只存在于类型层面，因此运行时布局与 `T` 完全一致。
//! 比较、排序、哈希均为结构化实现：仅比较底层值，且只在 `T` 具备相应能力时提供。
//!

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;
use std::str::FromStr;

use crate::wrapper::{NewTypeTag, Tag, Wrapper};

/// 包装类型
///
/// 宏为每个被吸收的字段生成形如
/// `pub type AccountNumber = ::absorb::Wrapped<i64, AccountNumberTag>;` 的别名。
///
/// # 示例
///
/// ```
/// use absorb::{Strategy, Tag, Wrapped, Wrapper};
///
/// enum PriceTag {}
///
/// impl Tag for PriceTag {
///     const NAME: &'static str = "OrderPrice";
///     const RECORD: &'static str = "Order";
///     const FIELD: &'static str = "price";
///     const STRATEGY: Strategy = Strategy::ValueClass;
/// }
///
/// type OrderPrice = Wrapped<u64, PriceTag>;
///
/// let price = OrderPrice::new(42);
/// assert_eq!(format!("{:?}", price), "OrderPrice(42)");
/// assert_eq!(price.unwrap(), 42);
/// ```
#[repr(transparent)]
pub struct Wrapped<T, G> {
    value: T,
    tag: PhantomData<fn() -> G>,
}

impl<T, G> Wrapped<T, G> {
    /// 包装底层值
    pub const fn new(value: T) -> Self {
        Self {
            value,
            tag: PhantomData,
        }
    }

    /// 借用底层值
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// 取出底层值
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, G: Tag> Wrapper for Wrapped<T, G> {
    type Raw = T;
    type Tag = G;

    fn wrap(raw: T) -> Self {
        Self::new(raw)
    }

    fn unwrap(self) -> T {
        self.value
    }

    fn raw(&self) -> &T {
        &self.value
    }
}

impl<T, G> From<T> for Wrapped<T, G> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T, G> AsRef<T> for Wrapped<T, G> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

// ---- 隐式转换层（仅 NewType 策略） ----

impl<T, G: NewTypeTag> Deref for Wrapped<T, G> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T, G: NewTypeTag> Borrow<T> for Wrapped<T, G> {
    fn borrow(&self) -> &T {
        &self.value
    }
}

// ---- 结构化的值语义 ----

impl<T: Clone, G> Clone for Wrapped<T, G> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: Copy, G> Copy for Wrapped<T, G> {}

impl<T: PartialEq, G> PartialEq for Wrapped<T, G> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq, G> Eq for Wrapped<T, G> {}

impl<T: PartialOrd, G> PartialOrd for Wrapped<T, G> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Ord, G> Ord for Wrapped<T, G> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: Hash, G> Hash for Wrapped<T, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: Default, G> Default for Wrapped<T, G> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug, G: Tag> fmt::Debug for Wrapped<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(G::NAME).field(&self.value).finish()
    }
}

impl<T: fmt::Display, G> fmt::Display for Wrapped<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<T: FromStr, G> FromStr for Wrapped<T, G> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::new)
    }
}
