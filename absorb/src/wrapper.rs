//! 包装抽象
//!
//! `Wrapper` 描述“底层值 <-> 包装值”的一对互逆转换；
//! `Tag` 为每个 `(记录, 字段)` 提供唯一的名义标识。
//!

/// 包装策略
///
/// - `ValueClass`：严格包装，仅提供显式转换
/// - `NewType`：在严格包装之上追加隐式转换层（`Deref` / `Borrow`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    #[default]
    ValueClass,
    NewType,
}

/// 包装类型的名义标签
///
/// 由宏为每个被吸收（absorb）的字段生成一个不可实例化的标签类型，
/// 两个字段即使底层类型相同，标签不同即为不同类型。
pub trait Tag {
    /// 包装类型名，例如 `AccountNumber`
    const NAME: &'static str;
    /// 所属记录名
    const RECORD: &'static str;
    /// 对应字段名
    const FIELD: &'static str;
    /// 生成时选择的策略
    const STRATEGY: Strategy;
}

/// 启用隐式转换层的标签（`NewType` 策略）
pub trait NewTypeTag: Tag {}

/// 包装值与底层值之间的互逆转换
///
/// 对任意底层值 `x`：`W::wrap(x).unwrap() == x`；
/// 对任意包装值 `w`：`W::wrap(w.unwrap()) == w`。
pub trait Wrapper: Sized + From<Self::Raw> {
    /// 底层值类型
    type Raw;

    /// 名义标签
    type Tag: Tag;

    /// 包装底层值
    fn wrap(raw: Self::Raw) -> Self;

    /// 取出底层值
    fn unwrap(self) -> Self::Raw;

    /// 借用底层值
    fn raw(&self) -> &Self::Raw;
}
