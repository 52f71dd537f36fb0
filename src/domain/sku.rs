// ==========================================
// 智能补货决策系统 - SKU 领域模型
// ==========================================
// 职责: 定义 SKU 主数据与参照表行（导入层写入，引擎层只读）
// 对齐: sku_master / sales_reference 表
// ==========================================

use crate::domain::types::{AbcGrade, XyzGrade};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// SkuRecord - SKU 主数据
// ==========================================
// 用途: 每个品目一行，是所有派生计算的唯一输入快照
// 红线: 引擎层不回写此结构；current_stock 变化即使全部下游派生值失效
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuRecord {
    // ===== 主键 =====
    pub sku_id: String, // SKU 唯一标识（SKU 编码）

    // ===== 基础信息 =====
    pub name: String,                 // 品名
    pub category: Option<String>,     // 品类（来自 ABC-XYZ 分析表）
    pub supplier: Option<String>,     // 供应商（来自参照表）

    // ===== 分级维度 =====
    pub abc_grade: AbcGrade,          // ABC 等级（按销售额贡献）
    pub xyz_grade: Option<XyzGrade>,  // XYZ 等级（按需求波动，可缺失）

    // ===== 库存与销售 =====
    pub current_stock: f64,    // 现在库（非负）
    pub safety_stock: f64,     // 安全库存（非负，可由外部预计算）
    pub daily_avg_sales: f64,  // 日平均销量（非负，缺失按 0）

    // ===== 采购条件 =====
    pub lead_time_days: i64,   // 交货提前期（天，正整数，缺失按 30）
    pub moq: Option<f64>,      // 最小发注量（可缺失）
    pub unit_cost: f64,        // 采购单价（非负，缺失按 0）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

impl SkuRecord {
    /// 有效交货提前期（防御: 非正值回退默认 30 天）
    pub fn effective_lead_time(&self) -> i64 {
        if self.lead_time_days > 0 {
            self.lead_time_days
        } else {
            crate::config::DEFAULT_LEAD_TIME_DAYS
        }
    }

    /// 有效 MOQ（None 或非正值视为无约束）
    pub fn effective_moq(&self) -> Option<f64> {
        match self.moq {
            Some(m) if m > 0.0 => Some(m),
            _ => None,
        }
    }
}

// ==========================================
// SalesReference - 销售参照表行
// ==========================================
// 用途: 批量分析的二次参照（左连接源，原 PSI 安全库存表）
// 约束: sku_id 未命中时，lead_time 默认 30，daily_avg_sales 默认 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReference {
    pub sku_id: String,              // 关联 SKU 编码
    pub daily_avg_sales: f64,        // 日平均销量
    pub lead_time_days: i64,         // 交货提前期（天）
    pub xyz_grade: Option<XyzGrade>, // XYZ 等级
    pub moq: Option<f64>,            // 最小发注量
    pub supplier: Option<String>,    // 供应商
}

// ==========================================
// RawSkuRecord - 导入中间结构体
// ==========================================
// 用途: 导入管道中间产物（文件解析 → 字段映射 → 此结构）
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSkuRecord {
    // 源字段（已类型转换，清洗前允许缺失）
    pub sku_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub abc_grade: Option<String>,
    pub xyz_grade: Option<String>,
    pub current_stock: Option<f64>,
    pub safety_stock: Option<f64>,
    pub daily_avg_sales: Option<f64>,
    pub lead_time_days: Option<i64>,
    pub moq: Option<f64>,
    pub unit_cost: Option<f64>,

    // 元信息
    pub row_number: usize, // 原始文件行号（用于 DQ 报告）
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
// 用途: 记录导入批次元信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,          // 批次 ID（UUID）
    pub file_name: Option<String>, // 源文件名
    pub total_rows: usize,         // 总行数
    pub success_rows: usize,       // 成功导入行数
    pub skipped_rows: usize,       // 跳过行数（DQ 不合格）
    pub imported_at: DateTime<Utc>, // 导入时间
}
