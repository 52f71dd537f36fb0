// ==========================================
// 智能补货决策系统 - SKU 数据仓储
// ==========================================
// 职责: 管理 sku_master / sales_reference / sales_history 表的数据访问
// 红线: 不含业务逻辑，只负责数据访问；所有查询参数化
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::sku::{SalesReference, SkuRecord};
use crate::domain::types::{AbcGrade, XyzGrade};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SkuMasterRepository - SKU 主数据仓储
// ==========================================
pub struct SkuMasterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SkuMasterRepository {
    /// 创建新的 SkuMasterRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量写入 SKU 主数据（INSERT OR REPLACE，单事务）
    ///
    /// # 返回
    /// - Ok(usize): 成功写入的记录数
    pub fn batch_upsert(&self, records: Vec<SkuRecord>) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for record in records {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO sku_master (
                    sku_id, name, category, supplier, abc_grade, xyz_grade,
                    current_stock, safety_stock, daily_avg_sales,
                    lead_time_days, moq, unit_cost, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                "#,
                params![
                    record.sku_id,
                    record.name,
                    record.category,
                    record.supplier,
                    record.abc_grade.to_string(),
                    record.xyz_grade.map(|g| g.to_string()),
                    record.current_stock,
                    record.safety_stock,
                    record.daily_avg_sales,
                    record.lead_time_days,
                    record.moq,
                    record.unit_cost,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 查询全量 SKU（按 sku_id 排序，保证批量分析输入顺序稳定）
    pub fn list_all(&self) -> RepositoryResult<Vec<SkuRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sku_id, name, category, supplier, abc_grade, xyz_grade,
                   current_stock, safety_stock, daily_avg_sales,
                   lead_time_days, moq, unit_cost, created_at, updated_at
            FROM sku_master
            ORDER BY sku_id
            "#,
        )?;

        let rows = stmt.query_map([], map_sku_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// 按 ID 查询单个 SKU
    pub fn get_by_id(&self, sku_id: &str) -> RepositoryResult<SkuRecord> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            r#"
            SELECT sku_id, name, category, supplier, abc_grade, xyz_grade,
                   current_stock, safety_stock, daily_avg_sales,
                   lead_time_days, moq, unit_cost, created_at, updated_at
            FROM sku_master
            WHERE sku_id = ?1
            "#,
            params![sku_id],
            map_sku_row,
        );

        match result {
            Ok(record) => Ok(record),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(RepositoryError::NotFound {
                entity: "sku_master".to_string(),
                id: sku_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// 行映射: sku_master → SkuRecord
///
/// 防御口径: 等级字段无法识别时回退（ABC→B，XYZ→无），时间字段解析失败回退当前时间
fn map_sku_row(row: &Row<'_>) -> rusqlite::Result<SkuRecord> {
    let abc_raw: String = row.get(4)?;
    let xyz_raw: Option<String> = row.get(5)?;
    let created_raw: String = row.get(12)?;
    let updated_raw: String = row.get(13)?;

    Ok(SkuRecord {
        sku_id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        supplier: row.get(3)?,
        abc_grade: AbcGrade::parse(&abc_raw).unwrap_or(AbcGrade::B),
        xyz_grade: xyz_raw.as_deref().and_then(XyzGrade::parse),
        current_stock: row.get(6)?,
        safety_stock: row.get(7)?,
        daily_avg_sales: row.get(8)?,
        lead_time_days: row.get(9)?,
        moq: row.get(10)?,
        unit_cost: row.get(11)?,
        created_at: parse_rfc3339(&created_raw),
        updated_at: parse_rfc3339(&updated_raw),
    })
}

fn parse_rfc3339(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

// ==========================================
// SalesReferenceRepository - 销售参照表仓储
// ==========================================
pub struct SalesReferenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SalesReferenceRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量写入参照表（INSERT OR REPLACE，单事务）
    pub fn batch_upsert(&self, references: Vec<SalesReference>) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for reference in references {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO sales_reference (
                    sku_id, daily_avg_sales, lead_time_days, xyz_grade, moq, supplier
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    reference.sku_id,
                    reference.daily_avg_sales,
                    reference.lead_time_days,
                    reference.xyz_grade.map(|g| g.to_string()),
                    reference.moq,
                    reference.supplier,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 查询全量参照表
    pub fn list_all(&self) -> RepositoryResult<Vec<SalesReference>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sku_id, daily_avg_sales, lead_time_days, xyz_grade, moq, supplier
            FROM sales_reference
            ORDER BY sku_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let xyz_raw: Option<String> = row.get(3)?;
            Ok(SalesReference {
                sku_id: row.get(0)?,
                daily_avg_sales: row.get(1)?,
                lead_time_days: row.get(2)?,
                xyz_grade: xyz_raw.as_deref().and_then(XyzGrade::parse),
                moq: row.get(4)?,
                supplier: row.get(5)?,
            })
        })?;

        let mut references = Vec::new();
        for row in rows {
            references.push(row?);
        }
        Ok(references)
    }
}

// ==========================================
// SalesHistoryRepository - 按期销售历史仓储
// ==========================================
// 口径: period_index 升序 = 旧→新，最近一期在末位
pub struct SalesHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SalesHistoryRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整体替换某 SKU 的销售历史（删除后重写，单事务）
    pub fn replace_history(&self, sku_id: &str, quantities: &[f64]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "DELETE FROM sales_history WHERE sku_id = ?1",
            params![sku_id],
        )?;

        for (index, quantity) in quantities.iter().enumerate() {
            tx.execute(
                "INSERT INTO sales_history (sku_id, period_index, quantity) VALUES (?1, ?2, ?3)",
                params![sku_id, index as i64, quantity],
            )?;
        }

        tx.commit()?;
        Ok(quantities.len())
    }

    /// 查询某 SKU 的销售历史（旧→新）
    pub fn get_history(&self, sku_id: &str) -> RepositoryResult<Vec<f64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT quantity FROM sales_history WHERE sku_id = ?1 ORDER BY period_index",
        )?;

        let rows = stmt.query_map(params![sku_id], |row| row.get::<_, f64>(0))?;
        let mut quantities = Vec::new();
        for row in rows {
            quantities.push(row?);
        }
        Ok(quantities)
    }
}
