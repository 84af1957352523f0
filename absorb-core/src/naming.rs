use proc_macro2::Span;
use quote::format_ident;
use syn::Ident;

// snake_case -> PascalCase，同时去掉原始标识符前缀 `r#`
pub(crate) fn to_pascal_case(s: &str) -> String {
    let s = s.strip_prefix("r#").unwrap_or(s);
    let mut out = String::with_capacity(s.len());
    let mut upper_next = true;
    for c in s.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

// 去掉 `r#` 的字段名文本
pub(crate) fn unraw(ident: &Ident) -> String {
    let s = ident.to_string();
    match s.strip_prefix("r#") {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

/// 包装类型名：`{Record}{Field}`
pub(crate) fn wrapper_ident(record: &Ident, field: &Ident) -> Ident {
    Ident::new(
        &format!("{}{}", record, to_pascal_case(&unraw(field))),
        field.span(),
    )
}

/// 标签类型名：`{Wrapper}Tag`
pub(crate) fn tag_ident(wrapper: &Ident) -> Ident {
    format_ident!("{}Tag", wrapper, span = wrapper.span())
}

pub(crate) fn prefixed(prefix: &str, field: &Ident) -> Ident {
    Ident::new(&format!("{}_{}", prefix, unraw(field)), field.span())
}

pub(crate) fn call_site(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}
