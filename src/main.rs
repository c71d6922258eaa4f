// ==========================================
// 配送派单系统 - 命令行入口
// ==========================================
// 用法:
//   courier-dispatch import <json_file>
//   courier-dispatch assign [date]
//   courier-dispatch assignments [date] [courier_id]
//   courier-dispatch complete <json_file>
//   courier-dispatch meta <courier_id> <start_date> <end_date>
//   courier-dispatch config
// 数据库路径: COURIER_DISPATCH_DB_PATH 或默认用户数据目录
// ==========================================

use anyhow::{anyhow, bail, Context, Result};

use courier_dispatch::app::{get_default_db_path, AppState};
use courier_dispatch::api::ImportRequest;
use courier_dispatch::domain::CompleteInfo;

const USAGE: &str = "用法: courier-dispatch <import|assign|assignments|complete|meta|config> [参数...]";

fn main() -> Result<()> {
    courier_dispatch::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).ok_or_else(|| anyhow!(USAGE))?;

    let db_path = get_default_db_path();
    tracing::info!(
        version = courier_dispatch::VERSION,
        db_path = %db_path,
        "{} 启动",
        courier_dispatch::APP_NAME
    );
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let output = match command {
        "import" => {
            let path = args.get(1).ok_or_else(|| anyhow!("import 需要 JSON 文件路径"))?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取文件: {}", path))?;
            let request: ImportRequest =
                serde_json::from_str(&raw).with_context(|| format!("JSON 格式错误: {}", path))?;
            serde_json::to_value(state.import_api.import(request)?)?
        }
        "assign" => {
            let result = state.assignment_api.assign_orders(args.get(1).map(String::as_str))?;
            serde_json::to_value(result)?
        }
        "assignments" => {
            let date = args.get(1).map(String::as_str);
            let courier_id = args
                .get(2)
                .map(|raw| raw.parse::<i64>().with_context(|| format!("无效的 courier_id: {}", raw)))
                .transpose()?;
            serde_json::to_value(state.assignment_api.get_assignments(date, courier_id)?)?
        }
        "complete" => {
            let path = args.get(1).ok_or_else(|| anyhow!("complete 需要 JSON 文件路径"))?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("无法读取文件: {}", path))?;
            let infos: Vec<CompleteInfo> =
                serde_json::from_str(&raw).with_context(|| format!("JSON 格式错误: {}", path))?;
            serde_json::to_value(state.order_api.complete_orders(infos)?)?
        }
        "meta" => {
            if args.len() < 4 {
                bail!("meta 需要参数: <courier_id> <start_date> <end_date>");
            }
            let courier_id: i64 = args[1]
                .parse()
                .with_context(|| format!("无效的 courier_id: {}", args[1]))?;
            serde_json::to_value(state.courier_api.get_meta_info(courier_id, &args[2], &args[3])?)?
        }
        "config" => {
            let snapshot = state
                .config_manager
                .get_config_snapshot()
                .map_err(|e| anyhow!("读取配置失败: {}", e))?;
            serde_json::from_str(&snapshot)?
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
