use absorb::{Wrapper, valueclass};

#[valueclass(constructor = open)]
pub struct Settings {
    #[absorb(default = 30)]
    pub timeout: u64,
    #[absorb(default = "main".to_string())]
    pub branch: String,
    #[hold(default = Vec::new())]
    pub tags: Vec<String>,
}

#[valueclass]
pub struct Limits {
    #[absorb(default = 10)]
    pub max: u32,
    pub min: u32,
}

fn main() {
    // 所有字段都有默认值：构造函数无参数，并生成 Default
    let settings = Settings::open();
    assert_eq!(settings.timeout.unwrap(), 30);
    assert_eq!(settings.branch.clone().unwrap(), "main");
    assert!(settings.tags.is_empty());
    assert_eq!(Settings::default(), settings);

    // 默认值每次构造重新求值
    let tagged = Settings::open().with_tags(vec!["x".to_string()]);
    assert_eq!(tagged.tags.len(), 1);
    assert!(Settings::open().tags.is_empty());

    // with_* 接受原始值
    let custom = Settings::open().with_timeout(5u64).with_branch("dev".to_string());
    assert_eq!(custom.timeout, SettingsTimeout::wrap(5));
    assert_eq!(custom.branch.get(), "dev");

    // 部分字段有默认值
    let limits = Limits::new(1u32).with_max(20u32);
    assert_eq!(limits.max.unwrap(), 20);
    assert_eq!(limits.min.unwrap(), 1);
}
