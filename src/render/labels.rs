// ==========================================
// маршрутная карта - 文档标签
// ==========================================
// 依据: ГОСТ 3.1118 表头文字
// 由显式 locale 构造，渲染不依赖全局语言
// ==========================================

use crate::i18n::t_in;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderLabels {
    pub title: String,
    pub continuation_title: String,
    pub product_name: String,
    pub designation: String,
    pub sheet: String,
    pub developer: String,
    pub checked: String,
    pub date: String,
    pub no_data: String,
    pub page: String,
    pub columns: [String; 7],
}

impl RenderLabels {
    pub fn for_locale(locale: &str) -> Self {
        let t = |key: &str| t_in(key, locale);
        Self {
            title: t("route_card.title"),
            continuation_title: t("route_card.continuation_title"),
            product_name: t("route_card.product_name"),
            designation: t("route_card.designation"),
            sheet: t("route_card.sheet"),
            developer: t("route_card.developer"),
            checked: t("route_card.checked"),
            date: t("route_card.date"),
            no_data: t("route_card.no_data"),
            page: t("route_card.page"),
            columns: [
                t("columns.type"),
                t("columns.number"),
                t("columns.name"),
                t("columns.equipment"),
                t("columns.material"),
                t("columns.time_prep"),
                t("columns.time_piece"),
            ],
        }
    }
}

impl Default for RenderLabels {
    fn default() -> Self {
        Self::for_locale(crate::i18n::DEFAULT_LOCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russian_labels() {
        let labels = RenderLabels::for_locale("ru");
        assert_eq!(labels.title, "МАРШРУТНАЯ КАРТА");
        assert_eq!(labels.columns[2], "Наименование операции/перехода");
        assert_eq!(labels.columns[6], "Тшт");
    }
}
