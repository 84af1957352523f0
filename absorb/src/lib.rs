//! 记录字段包装运行时（absorb）
//!
//! 为 `#[valueclass]` / `#[newtype]` 宏生成的代码提供运行时支撑：
//! - 包装类型（`wrapped`）：`Wrapped<T, Tag>`，零额外开销的具名包装
//! - 包装抽象（`wrapper`）：`Wrapper`（wrap/unwrap 互逆）与标签 `Tag`
//! - 记录元数据（`record`）：`Record` 与 `FieldInfo`
//! - 集合转换（`collection`）：批量 wrap/unwrap
//!
//! 生成代码统一通过 `::absorb::...` 绝对路径引用本 crate。
//!
//! 典型用法：
//!
//! ```
//! use absorb::{Wrapper, valueclass};
//!
//! #[valueclass]
//! pub struct Account {
//!     #[absorb(default = true)]
//!     pub activated: bool,
//!     pub number: i64,
//!     #[hold]
//!     pub manager: String,
//! }
//!
//! let account = Account::new(123, "X".to_string());
//! assert_eq!(account.activated, AccountActivated::wrap(true));
//! assert_eq!(account.number.unwrap(), 123);
//! assert_eq!(account.manager, "X");
//! ```
//!
//! 不同字段的包装类型互不兼容，即便底层类型相同：
//!
//! ```compile_fail
//! use absorb::valueclass;
//!
//! #[valueclass]
//! pub struct Withdrawal {
//!     pub funds: u64,
//!     pub amount: u64,
//! }
//!
//! let funds = WithdrawalFunds::new(100);
//! // `amount` 位置不接受 `funds` 的包装类型
//! let _ = Withdrawal::new(funds, funds);
//! ```
//!
pub mod collection;
pub mod record;
pub mod wrapped;
pub mod wrapper;

#[cfg(feature = "serde")]
mod serde_impl;

pub use absorb_macros::{newtype, valueclass};
pub use collection::{unwrap_all, wrap_all};
pub use record::{FieldInfo, Record};
pub use wrapped::Wrapped;
pub use wrapper::{NewTypeTag, Strategy, Tag, Wrapper};

// 允许在本 crate 内部通过 ::absorb 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::absorb 路径。
extern crate self as absorb;
