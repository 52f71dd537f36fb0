// ==========================================
// 智能补货决策系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等（CREATE TABLE IF NOT EXISTS），首次打开即可用
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 表:
/// - sku_master: SKU 主数据（导入层写入，引擎只读）
/// - sales_reference: 销售参照表（批量分析左连接源）
/// - sales_history: 按期销售历史（高级预测/XYZ 分级输入）
/// - order_record: 发注台账
/// - config_kv: 策略配置 (scope + key-value)
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sku_master (
            sku_id          TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            category        TEXT,
            supplier        TEXT,
            abc_grade       TEXT NOT NULL,
            xyz_grade       TEXT,
            current_stock   REAL NOT NULL DEFAULT 0,
            safety_stock    REAL NOT NULL DEFAULT 0,
            daily_avg_sales REAL NOT NULL DEFAULT 0,
            lead_time_days  INTEGER NOT NULL DEFAULT 30,
            moq             REAL,
            unit_cost       REAL NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sales_reference (
            sku_id          TEXT PRIMARY KEY,
            daily_avg_sales REAL NOT NULL DEFAULT 0,
            lead_time_days  INTEGER NOT NULL DEFAULT 30,
            xyz_grade       TEXT,
            moq             REAL,
            supplier        TEXT
        );

        CREATE TABLE IF NOT EXISTS sales_history (
            sku_id       TEXT NOT NULL,
            period_index INTEGER NOT NULL,
            quantity     REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (sku_id, period_index)
        );

        CREATE TABLE IF NOT EXISTS order_record (
            order_id              TEXT PRIMARY KEY,
            order_date            TEXT NOT NULL,
            sku_id                TEXT NOT NULL,
            name                  TEXT NOT NULL,
            abc_grade             TEXT NOT NULL,
            xyz_grade             TEXT,
            current_stock         REAL NOT NULL,
            order_qty             INTEGER NOT NULL,
            unit_cost             REAL NOT NULL,
            order_amount          REAL NOT NULL,
            lead_time_days        INTEGER NOT NULL,
            expected_receipt_date TEXT NOT NULL,
            coverage_days_before  REAL NOT NULL,
            coverage_days_after   REAL NOT NULL,
            created_at            TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_order_record_date ON order_record(order_date);
        CREATE INDEX IF NOT EXISTS idx_order_record_sku ON order_record(sku_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key      TEXT NOT NULL,
            value    TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;
    Ok(())
}

/// 默认数据库路径（用户数据目录下）
pub fn get_default_db_path() -> String {
    let mut path: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("smart-procurement");

    // 目录不存在则创建（失败时回退当前目录）
    if std::fs::create_dir_all(&path).is_err() {
        return "smart_procurement.db".to_string();
    }

    path.push("smart_procurement.db");
    path.display().to_string()
}
