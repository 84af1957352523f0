//! 字段吸收引擎（absorb-core）
//!
//! 为记录的字段生成零开销的名义包装类型，并展开配套的构造函数与伴生操作：
//! - 策略解析（`resolver`）：逐字段决定吸收（`Absorb`）或保留（`Hold`）
//! - 类型合成（`synthesizer`）：每个吸收字段一个独立的包装类型
//! - 转换层（`conversion`）：原始值与包装值的互转、默认值传递、构造函数
//! - 伴生操作改写（`companion`）：让伴生函数/常量在包装后的字段上照常通过类型检查
//!
//! `elaborator` 按上述顺序驱动各阶段并维护跨记录的包装类型登记表，
//! `codegen` 把结果输出为 Rust 条目。
//!
//! 两个前端共用本引擎：
//! 1. `absorb-macros` 的 `#[valueclass]` / `#[newtype]` 属性宏；
//! 2. `generator`：在 build script 中读取 `RecordDefinition` 或 JSON `schema`，
//!    生成供 `include!` 的源文件。
//!
//! 生成代码只通过 `::absorb::...` 引用运行时，因此使用方需依赖 `absorb` crate。
//!
pub mod codegen;
pub mod companion;
pub mod conversion;
pub mod elaborator;
pub mod error;
pub mod generator;
pub mod model;
pub mod resolver;
pub mod schema;
pub mod synthesizer;
pub mod transformed;

mod derive_utils;
mod naming;

pub use companion::{RecordShape, owner_of};
pub use conversion::{ConversionLayer, ConversionRule, Constructor, Slot};
pub use elaborator::Elaborator;
pub use error::{ElaborationError, ElaborationResult};
pub use generator::{Generated, Generator};
pub use model::{CompanionOperation, FieldSpec, Policy, RecordDefinition, RecordOptions, Strategy};
pub use resolver::{PolicyTable, WrapperRegistry};
pub use schema::Schema;
pub use synthesizer::WrapperType;
pub use transformed::TransformedRecord;
