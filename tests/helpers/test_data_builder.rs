// ==========================================
// 测试数据构造器
// ==========================================
// 职责: 为集成测试提供 SKU / 参照表行的便捷构造
// ==========================================

use chrono::Utc;
use smart_procurement::domain::sku::{SalesReference, SkuRecord};
use smart_procurement::domain::types::{AbcGrade, XyzGrade};

/// 创建测试用 SkuRecord（库存侧字段）
pub fn build_sku(
    sku_id: &str,
    abc_grade: AbcGrade,
    current_stock: f64,
    safety_stock: f64,
    unit_cost: f64,
) -> SkuRecord {
    SkuRecord {
        sku_id: sku_id.to_string(),
        name: format!("品目{}", sku_id),
        category: Some("测试品类".to_string()),
        supplier: None,
        abc_grade,
        xyz_grade: None,
        current_stock,
        safety_stock,
        daily_avg_sales: 0.0, // 由参照表合并提供
        lead_time_days: 0,
        moq: None,
        unit_cost,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// 创建测试用 SalesReference（参照侧字段）
pub fn build_reference(
    sku_id: &str,
    daily_avg_sales: f64,
    lead_time_days: i64,
    moq: Option<f64>,
) -> SalesReference {
    SalesReference {
        sku_id: sku_id.to_string(),
        daily_avg_sales,
        lead_time_days,
        xyz_grade: Some(XyzGrade::Y),
        moq,
        supplier: Some("测试供应商".to_string()),
    }
}
