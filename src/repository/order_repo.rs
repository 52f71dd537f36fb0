// ==========================================
// 智能补货决策系统 - 发注台账仓储
// ==========================================
// 职责: 管理 order_record 表（已提交发注的追加与查询）
// 红线: 台账只追加，不做更新/删除
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::order::OrderRecord;
use crate::domain::types::{AbcGrade, XyzGrade};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// OrderRecordRepository - 发注台账仓储
// ==========================================
pub struct OrderRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRecordRepository {
    /// 创建新的 OrderRecordRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加一条发注记录
    pub fn append(&self, record: &OrderRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO order_record (
                order_id, order_date, sku_id, name, abc_grade, xyz_grade,
                current_stock, order_qty, unit_cost, order_amount,
                lead_time_days, expected_receipt_date,
                coverage_days_before, coverage_days_after, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                record.order_id,
                record.order_date.to_string(),
                record.sku_id,
                record.name,
                record.abc_grade.to_string(),
                record.xyz_grade.map(|g| g.to_string()),
                record.current_stock,
                record.order_qty as i64,
                record.unit_cost,
                record.order_amount,
                record.lead_time_days,
                record.expected_receipt_date.to_string(),
                record.coverage_days_before,
                record.coverage_days_after,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// 查询全部发注记录（发注日降序，同日按创建时间降序）
    pub fn list_all(&self) -> RepositoryResult<Vec<OrderRecord>> {
        self.query_with_filter("", &[])
    }

    /// 按 SKU 查询发注记录
    pub fn list_by_sku(&self, sku_id: &str) -> RepositoryResult<Vec<OrderRecord>> {
        self.query_with_filter("WHERE sku_id = ?1", &[&sku_id])
    }

    /// 按发注日区间查询（含两端）
    pub fn list_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<OrderRecord>> {
        let from_str = from.to_string();
        let to_str = to.to_string();
        self.query_with_filter(
            "WHERE order_date >= ?1 AND order_date <= ?2",
            &[&from_str, &to_str],
        )
    }

    fn query_with_filter(
        &self,
        filter: &str,
        query_params: &[&dyn rusqlite::ToSql],
    ) -> RepositoryResult<Vec<OrderRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT order_id, order_date, sku_id, name, abc_grade, xyz_grade,
                   current_stock, order_qty, unit_cost, order_amount,
                   lead_time_days, expected_receipt_date,
                   coverage_days_before, coverage_days_after, created_at
            FROM order_record
            {}
            ORDER BY order_date DESC, created_at DESC
            "#,
            filter
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(query_params, map_order_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

/// 行映射: order_record → OrderRecord
fn map_order_row(row: &Row<'_>) -> rusqlite::Result<OrderRecord> {
    let order_date_raw: String = row.get(1)?;
    let abc_raw: String = row.get(4)?;
    let xyz_raw: Option<String> = row.get(5)?;
    let receipt_raw: String = row.get(11)?;
    let created_raw: String = row.get(14)?;

    Ok(OrderRecord {
        order_id: row.get(0)?,
        order_date: parse_date(&order_date_raw),
        sku_id: row.get(2)?,
        name: row.get(3)?,
        abc_grade: AbcGrade::parse(&abc_raw).unwrap_or(AbcGrade::B),
        xyz_grade: xyz_raw.as_deref().and_then(XyzGrade::parse),
        current_stock: row.get(6)?,
        order_qty: row.get::<_, i64>(7)?.max(0) as u64,
        unit_cost: row.get(8)?,
        order_amount: row.get(9)?,
        lead_time_days: row.get(10)?,
        expected_receipt_date: parse_date(&receipt_raw),
        coverage_days_before: row.get(12)?,
        coverage_days_after: row.get(13)?,
        created_at: DateTime::parse_from_rfc3339(&created_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

fn parse_date(value: &str) -> NaiveDate {
    value
        .parse::<NaiveDate>()
        .unwrap_or_else(|_| Utc::now().date_naive())
}
