// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 构造测试表格、路线卡行与临时输入文件
// ==========================================
#![allow(dead_code)]

use route_card::domain::{RawTable, RouteRow, RowType};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 由列名 + 字符串行构造表格（空字符串视为空单元格）
pub fn table(columns: &[&str], records: &[&[&str]]) -> RawTable {
    RawTable::from_records(
        columns.to_vec(),
        records
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect::<Vec<_>>())
            .collect(),
    )
}

/// 生成 N 个工步行（序号 1..=N）
pub fn transition_rows(n: usize) -> Vec<RouteRow> {
    (1..=n)
        .map(|seq| RouteRow {
            row_type: RowType::Transition,
            number: RouteRow::format_number(RowType::Transition, seq),
            sequence: seq,
            name: format!("R{}", seq),
            equipment: String::new(),
            material: String::new(),
            time_prep: String::new(),
            time_piece: "1".to_string(),
            source_row: seq - 1,
        })
        .collect()
}

/// 生成含 N 个元件、每 7 个元件切换一次工序的合并表
pub fn grouped_table(n: usize) -> RawTable {
    let records: Vec<Vec<String>> = (0..n)
        .map(|i| {
            vec![
                format!("Операция {}", i / 7),
                format!("R{}", i + 1),
                "Resistor".to_string(),
            ]
        })
        .collect();
    RawTable::from_records(vec!["Процесс", "Designator", "Comment"], records)
}

/// 序号后缀
pub fn number_suffix(row: &RouteRow) -> usize {
    row.number
        .chars()
        .skip(1)
        .collect::<String>()
        .parse()
        .unwrap()
}

/// 写入临时文件
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}
