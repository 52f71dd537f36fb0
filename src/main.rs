// ==========================================
// 智能补货决策系统 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 采购补货决策支持系统
// ==========================================
// 用法:
//   smart-procurement [--db <路径>] [--import-sku <文件>] [--import-ref <文件>]
//   导入后对全量 SKU 做批量分析并输出发注推荐
// ==========================================

use anyhow::{Context, Result};
use smart_procurement::api::{DashboardApi, ProcurementApi};
use smart_procurement::config::ConfigManager;
use smart_procurement::db::{get_default_db_path, initialize_schema, open_sqlite_connection};
use smart_procurement::importer::SkuImporter;
use smart_procurement::repository::{
    OrderRecordRepository, SalesHistoryRepository, SalesReferenceRepository, SkuMasterRepository,
};
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    smart_procurement::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 采购发注决策引擎", smart_procurement::APP_NAME);
    tracing::info!("系统版本: {}", smart_procurement::VERSION);
    tracing::info!("==================================================");

    // 命令行参数（极简解析，不引入 CLI 框架）
    let args: Vec<String> = std::env::args().collect();
    let db_path = arg_value(&args, "--db").unwrap_or_else(get_default_db_path);
    let sku_file = arg_value(&args, "--import-sku");
    let reference_file = arg_value(&args, "--import-ref");

    tracing::info!("使用数据库: {}", db_path);

    // 打开数据库并初始化 schema（幂等）
    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    initialize_schema(&conn).context("schema 初始化失败")?;
    let conn = Arc::new(Mutex::new(conn));

    // 构建仓储与 API
    let sku_repo = Arc::new(SkuMasterRepository::from_connection(conn.clone()));
    let reference_repo = Arc::new(SalesReferenceRepository::from_connection(conn.clone()));
    let history_repo = Arc::new(SalesHistoryRepository::from_connection(conn.clone()));
    let order_repo = Arc::new(OrderRecordRepository::from_connection(conn.clone()));
    let config = Arc::new(
        ConfigManager::from_connection(conn)
            .map_err(|e| anyhow::anyhow!("配置管理器初始化失败: {}", e))?,
    );

    // 可选导入
    let importer = SkuImporter::new(sku_repo.clone(), reference_repo.clone());
    if let Some(path) = sku_file {
        let batch = importer
            .import_sku_file(&path)
            .with_context(|| format!("SKU 主数据导入失败: {}", path))?;
        tracing::info!(
            "SKU 导入: 共 {} 行，成功 {} 行，跳过 {} 行",
            batch.total_rows,
            batch.success_rows,
            batch.skipped_rows
        );
    }
    if let Some(path) = reference_file {
        let batch = importer
            .import_reference_file(&path)
            .with_context(|| format!("参照表导入失败: {}", path))?;
        tracing::info!(
            "参照表导入: 共 {} 行，成功 {} 行，跳过 {} 行",
            batch.total_rows,
            batch.success_rows,
            batch.skipped_rows
        );
    }

    // 批量分析 + 自动发注推荐
    let api = ProcurementApi::new(
        sku_repo,
        reference_repo,
        history_repo,
        order_repo,
        config,
    );

    let analyzed = api
        .analyze_from_repository()
        .map_err(|e| anyhow::anyhow!("批量分析失败: {}", e))?;

    let summary = DashboardApi::new().summarize(&analyzed);
    tracing::info!(
        "分析完成: SKU {} 个，库存金额 {:.0}，不足 {} 个，需再订货 {} 个，待发注 {} 个",
        summary.total_sku,
        summary.total_stock_value,
        summary.shortage_count,
        summary.reorder_count,
        summary.order_needed_count
    );

    let orders = api
        .generate_auto_orders_with_config(&analyzed)
        .await
        .map_err(|e| anyhow::anyhow!("自动发注生成失败: {}", e))?;

    tracing::info!("发注推荐 {} 条（按优先级分值降序）:", orders.len());
    for order in &orders {
        tracing::info!(
            "  [{}:{}] {} {}（{}）推荐 {} 个（预计金额 {:.0}，消尽 {} 天，趋势 {}）",
            order.priority,
            order.priority_score,
            order.sku_id,
            order.name,
            order.status.display_name(),
            order.recommended_qty,
            order.estimated_cost,
            order.coverage_days,
            order.forecast_trend
        );
    }

    Ok(())
}

/// 读取 `--key value` 形式的命令行参数
fn arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
