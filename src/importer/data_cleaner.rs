// ==========================================
// 智能补货决策系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 缺失与非法值补安全默认
// 口径: 销量/库存/单价 缺失或为负 → 0；提前期缺失或非正 → 30；
//       MOQ 非正 → 无约束；ABC 无法识别 → C
// ==========================================

use crate::config::DEFAULT_LEAD_TIME_DAYS;
use crate::domain::sku::{RawSkuRecord, SkuRecord};
use crate::domain::types::{AbcGrade, XyzGrade};
use crate::importer::error::{ImportError, ImportResult};
use chrono::Utc;

pub struct DataCleaner;

impl DataCleaner {
    pub fn new() -> Self {
        Self
    }

    /// 清洗并转换为 SkuRecord
    ///
    /// # 错误
    /// - PrimaryKeyMissing: sku_id 缺失（唯一的阻断性 DQ 规则）
    pub fn clean(&self, raw: &RawSkuRecord) -> ImportResult<SkuRecord> {
        // 主键是唯一阻断项
        let sku_id = match &raw.sku_id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => return Err(ImportError::PrimaryKeyMissing(raw.row_number)),
        };

        let now = Utc::now();

        Ok(SkuRecord {
            name: self
                .normalize_null(raw.name.clone())
                .unwrap_or_else(|| sku_id.clone()),
            category: self.normalize_null(raw.category.clone()),
            supplier: self.normalize_null(raw.supplier.clone()),
            abc_grade: self.clean_abc_grade(raw.abc_grade.as_deref()),
            xyz_grade: self.clean_xyz_grade(raw.xyz_grade.as_deref()),
            current_stock: self.coerce_non_negative(raw.current_stock),
            safety_stock: self.coerce_non_negative(raw.safety_stock),
            daily_avg_sales: self.coerce_non_negative(raw.daily_avg_sales),
            lead_time_days: self.coerce_lead_time(raw.lead_time_days),
            moq: self.coerce_moq(raw.moq),
            unit_cost: self.coerce_non_negative(raw.unit_cost),
            created_at: now,
            updated_at: now,
            sku_id,
        })
    }

    /// 空白字符串标准化为 None
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// ABC 等级清洗（TRIM + UPPER，无法识别 → C）
    pub fn clean_abc_grade(&self, value: Option<&str>) -> AbcGrade {
        value.and_then(AbcGrade::parse).unwrap_or(AbcGrade::C)
    }

    /// XYZ 等级清洗（无法识别 → None）
    pub fn clean_xyz_grade(&self, value: Option<&str>) -> Option<XyzGrade> {
        value.and_then(XyzGrade::parse)
    }

    /// 缺失/负值/非数 → 0
    fn coerce_non_negative(&self, value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => 0.0,
        }
    }

    /// 缺失/非正提前期 → 默认 30 天
    fn coerce_lead_time(&self, value: Option<i64>) -> i64 {
        match value {
            Some(v) if v > 0 => v,
            _ => DEFAULT_LEAD_TIME_DAYS,
        }
    }

    /// 非正 MOQ → 无约束
    fn coerce_moq(&self, value: Option<f64>) -> Option<f64> {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => Some(v),
            _ => None,
        }
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new()
    }
}
