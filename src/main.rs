// ==========================================
// 管材库存流水 - 命令行入口
// ==========================================
// 用法:
//   pipe-inventory <transactions.json> [--type TYPE]... [--param KEY=VALUE]...
//                  [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--config config.json] [--full]
//
// 输出: 驾驶舱视图（默认只含筛选选项、汇总与诊断; --full 附带全部流水）JSON
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use pipe_inventory::{logging, DashboardApi, EnrichConfig, TransactionFilter, TransactionType};
use serde_json::json;
use std::path::PathBuf;

struct CliArgs {
    payload_path: PathBuf,
    config_path: Option<PathBuf>,
    filter: TransactionFilter,
    full: bool,
}

fn parse_date(flag: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("{} 日期格式错误, 期望 YYYY-MM-DD: {}", flag, value))
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut payload_path = None;
    let mut config_path = None;
    let mut filter = TransactionFilter::new();
    let mut full = false;

    while let Some(arg) = args.next() {
        let mut value_of = |flag: &str| args.next().ok_or_else(|| anyhow!("{} 缺少参数值", flag));

        match arg.as_str() {
            "--type" => {
                let raw = value_of("--type")?;
                let t = TransactionType::parse(&raw).ok_or_else(|| anyhow!("未知的流水类型: {}", raw))?;
                filter = filter.with_type(t);
            }
            "--param" => {
                let raw = value_of("--param")?;
                let (key, value) = raw
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--param 格式应为 KEY=VALUE: {}", raw))?;
                filter = filter.with_parameter(key.trim(), value);
            }
            "--from" => filter.date_from = Some(parse_date("--from", &value_of("--from")?)?),
            "--to" => filter.date_to = Some(parse_date("--to", &value_of("--to")?)?),
            "--config" => config_path = Some(PathBuf::from(value_of("--config")?)),
            "--full" => full = true,
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            other => {
                if payload_path.replace(PathBuf::from(other)).is_some() {
                    bail!("只能指定一个流水文件");
                }
            }
        }
    }

    Ok(CliArgs {
        payload_path: payload_path.ok_or_else(|| anyhow!("用法: pipe-inventory <transactions.json> [选项]"))?,
        config_path,
        filter,
        full,
    })
}

fn main() -> Result<()> {
    logging::init();

    let args = parse_args()?;

    let config = match &args.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
            EnrichConfig::from_json_str(&text)?
        }
        None => EnrichConfig::from_env(),
    };

    tracing::info!("管材库存流水 v{}", pipe_inventory::VERSION);
    tracing::info!("读取流水文件: {}", args.payload_path.display());

    let api = DashboardApi::new(&config);
    let mut view = api.build_view_from_path(&args.payload_path)?;
    if !args.filter.is_empty() {
        view = api.filtered_view(&view, &args.filter);
    }

    let output = if args.full {
        serde_json::to_value(&view)?
    } else {
        json!({
            "parameter_options": view.parameter_options,
            "summary": view.summary,
            "diagnostics": view.diagnostics,
        })
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
