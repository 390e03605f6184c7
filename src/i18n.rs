// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持俄文（默认，文档语言）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 文档渲染一律使用显式 locale，不依赖全局语言
// ==========================================

/// 文档默认语言
pub const DEFAULT_LOCALE: &str = "ru";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"ru" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（当前全局语言）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（指定语言）
///
/// # 示例
/// ```no_run
/// use route_card::i18n::t_in;
/// let title = t_in("route_card.title", "ru");
/// ```
pub fn t_in(key: &str, locale: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（指定语言，带参数）
///
/// # 示例
/// ```no_run
/// use route_card::i18n::t_with_args;
/// let msg = t_with_args("validation.empty_field", "ru", &[("field", "Footprint")]);
/// ```
pub fn t_with_args(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(key, locale);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_explicit_locale() {
        assert_eq!(t_in("route_card.title", "ru"), "МАРШРУТНАЯ КАРТА");
        assert_eq!(t_in("route_card.title", "en"), "ROUTE CARD");
    }

    #[test]
    fn test_translate_with_args() {
        let msg = t_with_args("validation.empty_field", "ru", &[("field", "Footprint")]);
        assert!(msg.contains("Footprint"));
        assert!(msg.contains("Найдены пустые значения"));

        let msg = t_with_args("validation.empty_field", "en", &[("field", "Footprint")]);
        assert_eq!(msg, "Empty values found in field Footprint");
    }

    #[test]
    fn test_column_labels() {
        assert_eq!(t_in("columns.time_piece", "ru"), "Тшт");
        assert_eq!(t_in("columns.number", "ru"), "№");
    }
}
