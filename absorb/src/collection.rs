//! 集合转换
//!
//! 对元素为包装类型的集合做批量 wrap/unwrap。`Wrapped` 与底层类型布局一致，
//! 但这里不做指针转换，仅依赖迭代器；`Vec` 收集时标准库会原地复用分配。
//!

use crate::wrapper::Wrapper;

/// 批量包装
///
/// ```
/// use absorb::{valueclass, wrap_all};
///
/// #[valueclass]
/// pub struct Ledger {
///     pub entry: i64,
/// }
///
/// let entries: Vec<LedgerEntry> = wrap_all(vec![1, 2, 3]).collect();
/// assert_eq!(entries[2], LedgerEntry::new(3));
/// ```
pub fn wrap_all<W, I>(raws: I) -> impl Iterator<Item = W>
where
    W: Wrapper,
    I: IntoIterator<Item = W::Raw>,
{
    raws.into_iter().map(W::wrap)
}

/// 批量取出底层值
pub fn unwrap_all<W, I>(wrapped: I) -> impl Iterator<Item = W::Raw>
where
    W: Wrapper,
    I: IntoIterator<Item = W>,
{
    wrapped.into_iter().map(W::unwrap)
}
