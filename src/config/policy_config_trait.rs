// ==========================================
// 智能补货决策系统 - 策略配置读取 Trait
// ==========================================
// 职责: 定义补货策略所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::reorder::DynamicPolicyParams;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// PolicyConfigReader Trait
// ==========================================
// 用途: 策略引擎/API 层所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PolicyConfigReader: Send + Sync {
    // ===== ABC 安全系数 =====

    /// 获取 A 级安全系数
    ///
    /// # 默认值
    /// - 1.5
    async fn get_safety_factor_a(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取 B 级安全系数（等级无法识别时也用此值）
    ///
    /// # 默认值
    /// - 1.2
    async fn get_safety_factor_b(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取 C 级安全系数
    ///
    /// # 默认值
    /// - 1.0
    async fn get_safety_factor_c(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 预测置信度修正 =====

    /// 获取低置信度阈值（预测置信度小数形式低于此值时加成安全系数）
    ///
    /// # 默认值
    /// - 0.6
    async fn get_low_confidence_threshold(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取低置信度安全系数加成倍率
    ///
    /// # 默认值
    /// - 1.2
    async fn get_low_confidence_multiplier(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 发注量口径 =====

    /// 获取目标库存倍率（目标库存 = 发注点 × 此倍率）
    ///
    /// # 默认值
    /// - 1.5
    async fn get_target_stock_multiplier(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取批量分析发注量的安全边际天数（缺口外加 N 天销量）
    ///
    /// # 默认值
    /// - 7
    async fn get_safety_margin_days(&self) -> Result<i64, Box<dyn Error>>;

    /// 获取发注判定闸门天数（消尽天数达到此值一律不发注）
    ///
    /// # 默认值
    /// - 30
    async fn get_order_coverage_gate_days(&self) -> Result<i64, Box<dyn Error>>;

    // ===== 预测参数 =====

    /// 获取自动发注的预测期（天）
    ///
    /// # 默认值
    /// - 30
    async fn get_forecast_horizon_days(&self) -> Result<u32, Box<dyn Error>>;

    // ===== 组合读取 =====

    /// 组装动态策略参数（单次读取，避免逐项往返）
    async fn get_dynamic_policy_params(&self) -> Result<DynamicPolicyParams, Box<dyn Error>> {
        let safety_factor_a = self.get_safety_factor_a().await?;
        let safety_factor_b = self.get_safety_factor_b().await?;
        let safety_factor_c = self.get_safety_factor_c().await?;
        let low_confidence_threshold = self.get_low_confidence_threshold().await?;
        let low_confidence_multiplier = self.get_low_confidence_multiplier().await?;
        let target_stock_multiplier = self.get_target_stock_multiplier().await?;
        Ok(DynamicPolicyParams {
            safety_factor_a,
            safety_factor_b,
            safety_factor_c,
            low_confidence_threshold,
            low_confidence_multiplier,
            target_stock_multiplier,
        })
    }
}
