use absorb_core::Strategy;
use proc_macro::TokenStream;
use syn::spanned::Spanned;
use syn::{Item, parse_macro_input};

mod attrs;
mod module;
mod record;

/// 值类宏
/// - 为记录的每个字段生成独立的包装类型 `{Record}{Field}`（`#[repr(transparent)]`，零开销）
/// - 字段类型替换为包装类型，生成构造函数、`with_*` / `wrap_*` / `unwrap_*` 与 `::absorb::Record` 元数据
/// - 包装类型只能显式解包，不提供 `Deref`
/// - 记录参数：`#[valueclass(debug = bool, clone = bool, eq = bool, serde = bool, constructor = ident, known(Path, ...))]`，
///   `clone` / `eq` 默认开启，保留字段不实现 `Clone` / `PartialEq` 时关闭
/// - 字段参数：`#[absorb(default = expr, wrapper = Ident, strategy = valueclass|newtype)]`，
///   `#[hold]` / `#[hold(default = expr)]` 保留原类型
/// - 作用于内联模块时，模块内所有具名字段结构体作为一个批次展开，并改写伴生函数/常量
/// - 宏看不到其它调用生成的包装类型：字段使用另一次 `#[valueclass]` / `#[newtype]` 生成的包装类型时，
///   必须在 `known(...)` 中列出，否则会被再包装一层
///
/// ```ignore
/// #[valueclass]
/// pub struct Account { pub number: i64 }
///
/// #[valueclass(known(AccountNumber))]
/// pub struct Transfer { pub from: AccountNumber, pub amount: u64 }
/// ```
#[proc_macro_attribute]
pub fn valueclass(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand("valueclass", Strategy::ValueClass, attr, item)
}

/// 新类型宏
/// - 与 `#[valueclass]` 相同，额外为包装类型提供隐式转换层：`Deref<Target = Raw>` 与 `Borrow<Raw>`
#[proc_macro_attribute]
pub fn newtype(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand("newtype", Strategy::NewType, attr, item)
}

fn expand(macro_name: &str, strategy: Strategy, attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as attrs::RecordAttrConfig);
    let input = parse_macro_input!(item as Item);
    let options = cfg.into_options();

    let expanded = match input {
        Item::Struct(st) => record::expand(strategy, options, st),
        Item::Mod(m) => module::expand(strategy, options, m),
        other => Err(syn::Error::new(
            other.span(),
            format!("#[{macro_name}] only on struct or inline mod"),
        )),
    };

    expanded.unwrap_or_else(syn::Error::into_compile_error).into()
}
