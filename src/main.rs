// ==========================================
// маршрутная карта - 命令行入口
// ==========================================
// 用法:
//   route-card <elements> <process> <output>
//              [--config F] [--product S] [--designation S]
//              [--developer S] [--date S] [--preview]
// 输出格式由扩展名决定: .xlsx / .docx / .json / .csv / .txt
// ==========================================

use route_card::api::{document_info_or_default, RouteCardApi};
use route_card::config::ConfigManager;
use route_card::engine::ValidationLevel;
use route_card::i18n::t_with_args;
use route_card::logging;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "用法: route-card <元件表> <工艺表> <输出文件> \
[--config 配置文件] [--product 产品名称] [--designation 图号] \
[--developer 编制人] [--date 日期] [--preview]";

#[derive(Debug, Default)]
struct CliArgs {
    elements: PathBuf,
    process: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    product: Option<String>,
    designation: Option<String>,
    developer: Option<String>,
    date: Option<String>,
    preview: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("参数 {} 缺少取值", name))
        };
        match arg.as_str() {
            "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
            "--product" => cli.product = Some(value("--product")?),
            "--designation" => cli.designation = Some(value("--designation")?),
            "--developer" => cli.developer = Some(value("--developer")?),
            "--date" => cli.date = Some(value("--date")?),
            "--preview" => cli.preview = true,
            flag if flag.starts_with("--") => return Err(format!("未知参数: {}", flag)),
            _ => positional.push(arg),
        }
    }

    let [elements, process, output]: [String; 3] = positional
        .try_into()
        .map_err(|_| "需要 3 个位置参数".to_string())?;
    cli.elements = PathBuf::from(elements);
    cli.process = PathBuf::from(process);
    cli.output = PathBuf::from(output);
    Ok(cli)
}

fn run(cli: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::load(path)?,
        None => ConfigManager::load_default()?,
    };
    let config = manager.config().clone();
    let locale = config.locale.clone();
    let api = RouteCardApi::new(config)?;

    let elements = api.load_elements(&cli.elements)?;
    let process = api.load_process(&cli.process)?;

    let info = document_info_or_default(
        api.config(),
        cli.product,
        cli.designation,
        cli.developer,
        cli.date,
    )?;

    if cli.preview {
        let merged = api.merge(&elements, &process)?;
        println!("{}", api.preview(&merged.table, Some(info.clone()))?);
    }

    let summary = api.generate(&elements, &process, Some(info), &cli.output)?;

    for advisory in &summary.advisories {
        let level = match advisory.level {
            ValidationLevel::Warning => "WARN",
            ValidationLevel::Info => "INFO",
        };
        println!("[{}] {}", level, advisory.message);
    }

    let pages = summary.page_count.to_string();
    let rows = summary.total_rows.to_string();
    println!(
        "{}",
        t_with_args("summary.rows", &locale, &[("rows", rows.as_str()), ("pages", pages.as_str())])
    );
    println!("{}", summary.output.display());
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    tracing::info!("{} v{}", route_card::APP_NAME, route_card::VERSION);

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("路线卡生成失败: {}", err);
            eprintln!("错误: {}", err);
            ExitCode::FAILURE
        }
    }
}
