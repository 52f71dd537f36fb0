// ==========================================
// 智能补货决策系统 - 字段映射器实现
// ==========================================
// 职责: 源字段 → 标准字段映射 + 类型转换
// 说明: PSI 源表表头为韩文，兼容中/英文别名；
//       数值解析失败按缺失处理（清洗层统一补默认值）
// ==========================================

use crate::domain::sku::RawSkuRecord;
use std::collections::HashMap;

pub struct FieldMapper;

impl FieldMapper {
    pub fn new() -> Self {
        Self
    }

    /// 单行映射: 表头→单元格 映射表 → RawSkuRecord
    pub fn map_to_raw_sku(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> RawSkuRecord {
        RawSkuRecord {
            // 主键
            sku_id: self.get_string(row, "SKU코드"),

            // 基础信息
            name: self.get_string(row, "제품명"),
            category: self.get_string(row, "카테고리"),
            supplier: self.get_string(row, "공급업체"),

            // 分级维度
            abc_grade: self.get_string(row, "ABC등급"),
            xyz_grade: self.get_string(row, "XYZ등급"),

            // 库存与销售
            current_stock: self.parse_f64(row, "현재고"),
            safety_stock: self.parse_f64(row, "안전재고"),
            daily_avg_sales: self.parse_f64(row, "일평균판매"),

            // 采购条件
            lead_time_days: self.parse_i64(row, "리드타임"),
            moq: self.parse_f64(row, "MOQ"),
            unit_cost: self.parse_f64(row, "매입원가"),

            // 元信息
            row_number,
        }
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        // 定义列名别名映射（韩文源表头 + 中/英文别名）
        let aliases: Vec<&str> = match key {
            "SKU코드" => vec!["SKU코드", "SKU#", "SKU编码", "sku_id"],
            "제품명" => vec!["제품명", "品名", "name"],
            "카테고리" => vec!["카테고리", "品类", "category"],
            "공급업체" => vec!["공급업체", "供应商", "supplier"],
            "ABC등급" => vec!["ABC등급", "ABC", "ABC等级", "abc_grade"],
            "XYZ등급" => vec!["XYZ등급", "XYZ", "XYZ等级", "xyz_grade"],
            "현재고" => vec!["현재고", "现在库", "当前库存", "current_stock"],
            "안전재고" => vec!["안전재고", "安全库存", "safety_stock"],
            "일평균판매" => vec!["일평균판매", "日均销量", "daily_avg_sales"],
            "리드타임" => vec!["리드타임", "交货提前期", "提前期", "lead_time_days"],
            "MOQ" => vec!["MOQ", "最小发注量", "moq"],
            "매입원가" => vec!["매입원가", "采购单价", "unit_cost"],
            _ => vec![key],
        };

        // 尝试所有可能的列名
        for alias in aliases {
            if let Some(v) = row.get(alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// 解析浮点数（失败按缺失处理，千位分隔符容忍）
    fn parse_f64(&self, row: &HashMap<String, String>, key: &str) -> Option<f64> {
        self.get_string(row, key)
            .and_then(|v| v.replace(',', "").trim().parse::<f64>().ok())
    }

    /// 解析整数（兼容 "30.0" 这类浮点写法）
    fn parse_i64(&self, row: &HashMap<String, String>, key: &str) -> Option<i64> {
        self.parse_f64(row, key).map(|v| v.trunc() as i64)
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn row_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_korean_headers_mapped() {
        let mapper = FieldMapper::new();
        let row = row_of(&[
            ("SKU코드", "SKU-001"),
            ("제품명", "아메리카노 원두"),
            ("ABC등급", "A"),
            ("현재고", "120"),
            ("안전재고", "40"),
            ("일평균판매", "5.5"),
            ("리드타임", "30"),
            ("MOQ", "24"),
            ("매입원가", "1,500"),
        ]);

        let raw = mapper.map_to_raw_sku(&row, 2);

        assert_eq!(raw.sku_id.as_deref(), Some("SKU-001"));
        assert_eq!(raw.abc_grade.as_deref(), Some("A"));
        assert_eq!(raw.current_stock, Some(120.0));
        assert_eq!(raw.daily_avg_sales, Some(5.5));
        assert_eq!(raw.lead_time_days, Some(30));
        assert_eq!(raw.unit_cost, Some(1500.0)); // 千位分隔符
        assert_eq!(raw.row_number, 2);
    }

    #[test]
    fn test_alias_headers_mapped() {
        let mapper = FieldMapper::new();
        let row = row_of(&[
            ("sku_id", "SKU-002"),
            ("品名", "滤纸"),
            ("ABC", "C"),
            ("当前库存", "10"),
        ]);

        let raw = mapper.map_to_raw_sku(&row, 3);

        assert_eq!(raw.sku_id.as_deref(), Some("SKU-002"));
        assert_eq!(raw.name.as_deref(), Some("滤纸"));
        assert_eq!(raw.abc_grade.as_deref(), Some("C"));
        assert_eq!(raw.current_stock, Some(10.0));
    }

    #[test]
    fn test_malformed_numbers_become_missing() {
        let mapper = FieldMapper::new();
        let row = row_of(&[
            ("SKU코드", "SKU-003"),
            ("현재고", "N/A"),
            ("리드타임", "-"),
        ]);

        let raw = mapper.map_to_raw_sku(&row, 4);

        // 解析失败按缺失处理，由清洗层补默认值
        assert_eq!(raw.current_stock, None);
        assert_eq!(raw.lead_time_days, None);
    }

    #[test]
    fn test_float_lead_time_truncated() {
        let mapper = FieldMapper::new();
        let row = row_of(&[("SKU코드", "SKU-004"), ("리드타임", "30.0")]);

        let raw = mapper.map_to_raw_sku(&row, 5);
        assert_eq!(raw.lead_time_days, Some(30));
    }
}
