// ==========================================
// 文件级端到端测试
// ==========================================
// 场景: Excel 元件表 + Proc.txt 工艺表 → 路线卡 (xlsx/docx/json/csv/txt)
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

use calamine::{open_workbook_auto, Reader};
use route_card::api::{ApiError, RouteCardApi, RouteCardSession, TableSide};
use route_card::config::{ConfigManager, RouteCardConfig};
use route_card::domain::{CellValue, DocumentInfo};
use route_card::importer::{
    read_table_json, write_table_json, ExcelParser, ImportError, TableParser, UniversalFileParser,
};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_helpers::write_file;

const PROC_TXT: &str = "Процесс\u{0387}\u{0387}Designator\u{0387}\u{0387}Оборудование\n\
Пайка\u{0387}\u{0387}R1\u{0387}\u{0387}Печь\n\
Пайка\u{0387}\u{0387}C1\u{0387}\u{0387}Печь\n\
Контроль\u{0387}\u{0387}U1\n";

/// 写入一个元件表 Excel（含空白行与空表头）
fn write_elements_xlsx(dir: &Path) -> PathBuf {
    let path = dir.join("elements.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    // 第 5 列无表头
    let header = ["Designator", "Footprint", "Comment", "Quantity"];
    for (col, title) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }

    let rows = [("R1", "0603", "Resistor", 2.0), ("C1", "0805", "Capacitor", 1.0)];
    for (i, (designator, footprint, comment, qty)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, *designator).unwrap();
        sheet.write_string(r, 1, *footprint).unwrap();
        sheet.write_string(r, 2, *comment).unwrap();
        sheet.write_number(r, 3, *qty).unwrap();
    }
    // 空白行之后的元件
    sheet.write_string(4, 0, "U1").unwrap();
    sheet.write_string(4, 2, "MCU").unwrap();
    sheet.write_string(4, 4, "note").unwrap();

    workbook.save(&path).unwrap();
    path
}

fn info() -> DocumentInfo {
    DocumentInfo {
        product_name: "Плата управления".to_string(),
        designation: "АБВГ.468000.001".to_string(),
        developer: "Петров".to_string(),
        date: "15.03.2024".to_string(),
    }
}

#[test]
fn test_excel_loader_cleans_rows_and_headers() {
    let dir = TempDir::new().unwrap();
    let table = ExcelParser.parse(&write_elements_xlsx(dir.path())).unwrap();

    assert_eq!(
        table.columns(),
        ["Designator", "Footprint", "Comment", "Quantity", "Unnamed: 4"]
    );
    // 完全空白的第 3 行被丢弃
    assert_eq!(table.len(), 3);
    assert_eq!(table.cell(0, "Quantity"), Some(&CellValue::Number(2.0)));
    assert_eq!(table.cell(2, "Designator"), Some(&CellValue::from("U1")));
    assert!(table.cell(2, "Footprint").unwrap().is_blank());
}

#[test]
fn test_table_json_artifact() {
    let dir = TempDir::new().unwrap();
    let table = ExcelParser.parse(&write_elements_xlsx(dir.path())).unwrap();

    let json_path = dir.path().join("elements.json");
    write_table_json(&table, &json_path).unwrap();

    let raw = fs::read_to_string(&json_path).unwrap();
    assert!(raw.starts_with("[\n    {\n        \"Designator\": \"R1\""));

    let reloaded = read_table_json(&json_path).unwrap();
    assert_eq!(reloaded.columns(), table.columns());
    assert_eq!(reloaded.len(), table.len());

    // 通用解析器按扩展名读取 JSON
    let via_universal = UniversalFileParser.parse(&json_path).unwrap();
    assert_eq!(via_universal, reloaded);
}

#[test]
fn test_unrecognised_proc_text() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "Proc.txt", "\n\n   \n");

    let result = UniversalFileParser.parse(&path);
    assert!(matches!(result, Err(ImportError::TextStructureError(_))));

    let api_result = RouteCardApi::default().load_process(&path);
    assert!(matches!(api_result, Err(ApiError::ImportError(_))));
}

#[test]
fn test_generate_all_formats() {
    let dir = TempDir::new().unwrap();
    let api = RouteCardApi::default();
    let elements = api.load_elements(write_elements_xlsx(dir.path())).unwrap();
    let process = api
        .load_process(write_file(dir.path(), "Proc.txt", PROC_TXT))
        .unwrap();

    for ext in ["xlsx", "docx", "json", "csv", "txt"] {
        let output = dir.path().join(format!("card.{}", ext));
        let summary = api
            .generate(&elements, &process, Some(info()), &output)
            .unwrap();

        // О01 Пайка, Т02 R1, Т03 C1, О04 Контроль, Т05 U1
        assert_eq!(summary.total_rows, 5, "format {}", ext);
        assert_eq!(summary.page_count, 1);
        assert!(!summary.positional_merge);
        assert!(output.exists());
    }

    let text = fs::read_to_string(dir.path().join("card.txt")).unwrap();
    assert!(text.contains("R1 - Resistor"));
    assert!(text.contains("Т05"));
    assert!(text.contains("АБВГ.468000.001"));

    let csv = fs::read_to_string(dir.path().join("card.csv")).unwrap();
    assert!(csv.lines().any(|l| l == "1,Т,Т02,R1 - Resistor,Печь,,,2"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("card.json")).unwrap()).unwrap();
    assert_eq!(json["info"]["developer"], "Петров");
    assert_eq!(json["pages"][0]["rows"][3]["number"], "О04");

    let mut workbook = open_workbook_auto(dir.path().join("card.xlsx")).unwrap();
    let range = workbook.worksheet_range("Лист 1").unwrap();
    assert_eq!(range.get_value((1, 1)).unwrap().to_string(), "Плата управления");
    assert_eq!(range.get_value((11, 2)).unwrap().to_string(), "U1 - MCU");
}

#[test]
fn test_validation_advisories() {
    let dir = TempDir::new().unwrap();
    let api = RouteCardApi::default();
    let elements = api.load_elements(write_elements_xlsx(dir.path())).unwrap();
    let process = api
        .load_process(write_file(dir.path(), "Proc.txt", PROC_TXT))
        .unwrap();

    let merged = api.merge(&elements, &process).unwrap();
    let advisories = api.advisories(&merged);

    // U1 缺少 Footprint
    assert!(advisories
        .iter()
        .any(|m| m.message == "Найдены пустые значения в поле Footprint"));
}

#[test]
fn test_multi_page_sheets() {
    let dir = TempDir::new().unwrap();
    let records: Vec<Vec<String>> = (1..=45)
        .map(|i| vec!["Пайка".to_string(), format!("R{}", i)])
        .collect();
    let merged = route_card::domain::RawTable::from_records(vec!["Процесс", "Designator"], records);

    let api = RouteCardApi::default();
    let built = api.build_document(&merged, Some(info())).unwrap();
    // 46 行: 15 + 25 + 6
    assert_eq!(built.document.total_rows, 46);
    assert_eq!(built.document.page_count(), 3);

    let output = dir.path().join("multi.xlsx");
    api.render(&built.document, &output).unwrap();

    let workbook = open_workbook_auto(&output).unwrap();
    assert_eq!(workbook.sheet_names(), ["Лист 1", "Лист 2", "Лист 3"]);
}

#[test]
fn test_unsupported_output_leaves_nothing() {
    let dir = TempDir::new().unwrap();
    let api = RouteCardApi::default();
    let built = api
        .build_document(&test_helpers::grouped_table(3), None)
        .unwrap();

    let output = dir.path().join("card.pdf");
    let result = api.render(&built.document, &output);

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    assert!(!output.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_session_flow() {
    let dir = TempDir::new().unwrap();
    let mut session = RouteCardSession::new(RouteCardApi::default());
    session.load_elements(write_elements_xlsx(dir.path())).unwrap();
    session
        .load_process(write_file(dir.path(), "Proc.txt", PROC_TXT))
        .unwrap();

    assert_eq!(session.merged().unwrap().table.len(), 3);

    // 新增元件行后缓存失效，并出现在文档中
    let row = [
        ("Designator".to_string(), CellValue::from("R9")),
        ("Comment".to_string(), CellValue::from("Jumper")),
    ]
    .into_iter()
    .collect();
    session.push_row(TableSide::Elements, row).unwrap();
    assert!(!session.is_merge_cached());

    let output = dir.path().join("card.txt");
    let summary = session.generate(Some(info()), &output).unwrap();
    assert_eq!(summary.total_rows, 6);
    assert!(fs::read_to_string(&output).unwrap().contains("R9 - Jumper"));
}

#[test]
fn test_config_file_drives_pagination() {
    let dir = TempDir::new().unwrap();
    let config_path = write_file(
        dir.path(),
        "config.json",
        r#"{ "pagination": { "first_page_capacity": 2, "continuation_page_capacity": 3 }, "locale": "en" }"#,
    );

    let manager = ConfigManager::load(&config_path).unwrap();
    assert_eq!(manager.config().pagination.first_page_capacity, 2);
    assert_eq!(manager.config().merge, RouteCardConfig::default().merge);

    let api = RouteCardApi::new(manager.config().clone()).unwrap();
    let built = api
        .build_document(&test_helpers::grouped_table(5), None)
        .unwrap();
    // 6 行: 2 + 3 + 1
    let sizes: Vec<usize> = built.document.pages.iter().map(|p| p.rows.len()).collect();
    assert_eq!(sizes, [2, 3, 1]);

    let preview = api.preview(&test_helpers::grouped_table(1), None).unwrap();
    assert!(preview.starts_with("ROUTE CARD"));
}
