// ==========================================
// 智能补货决策系统 - 发注记录领域模型
// ==========================================
// 用途: 已提交发注的台账（原发注列表）
// 对齐: order_record 表
// ==========================================

use crate::domain::analysis::NO_SALES_COVERAGE_DAYS;
use crate::domain::types::{AbcGrade, XyzGrade};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// OrderRecord - 发注记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,     // 发注 ID（UUID）
    pub order_date: NaiveDate, // 发注日（仅日期）

    // ===== SKU 识别字段 =====
    pub sku_id: String,
    pub name: String,
    pub abc_grade: AbcGrade,
    pub xyz_grade: Option<XyzGrade>,

    // ===== 发注数字 =====
    pub current_stock: f64, // 发注时点现在库
    pub order_qty: u64,     // 发注量
    pub unit_cost: f64,     // 采购单价
    pub order_amount: f64,  // 发注金额 = 发注量 × 单价

    // ===== 到货与覆盖 =====
    pub lead_time_days: i64,              // 交货提前期
    pub expected_receipt_date: NaiveDate, // 预计到货日 = 发注日 + 提前期
    pub coverage_days_before: f64,        // 发注前再库消尽天数（999=无销售）
    pub coverage_days_after: f64,         // 发注后再库消尽天数（999=无销售）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
}

impl OrderRecord {
    /// 计算发注后的再库消尽天数
    ///
    /// 口径: (现在库 + 发注量) / 日均销量；无销售时返回哨兵值 999
    pub fn coverage_after_order(current_stock: f64, order_qty: u64, daily_avg_sales: f64) -> f64 {
        if daily_avg_sales > 0.0 {
            let post_stock = current_stock + order_qty as f64;
            (post_stock / daily_avg_sales * 10.0).round() / 10.0
        } else {
            NO_SALES_COVERAGE_DAYS
        }
    }

    /// 计算预计到货日（发注日 + 提前期）
    pub fn expected_receipt(order_date: NaiveDate, lead_time_days: i64) -> NaiveDate {
        order_date + Duration::days(lead_time_days.max(0))
    }
}
