use serde::{Deserialize, Serialize};

/// 自定义补货策略（持久化对象）
///
/// 存储位置：config_kv（scope_id='global'，key='custom_policy/{policy_id}'）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPolicyProfile {
    /// 自定义策略 ID（用于选择/引用）
    pub policy_id: String,

    /// 显示名称（中文）
    pub title: String,

    /// 说明（可选）
    #[serde(default)]
    pub description: Option<String>,

    /// 参数（系数/阈值等，未设置项回退默认口径）
    #[serde(default)]
    pub parameters: CustomPolicyParameters,
}

/// 自定义补货策略参数（轻量版：仅覆盖"无需查库"的策略微调维度）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomPolicyParameters {
    /// A 级安全系数覆写
    #[serde(default)]
    pub safety_factor_a: Option<f64>,

    /// B 级安全系数覆写
    #[serde(default)]
    pub safety_factor_b: Option<f64>,

    /// C 级安全系数覆写
    #[serde(default)]
    pub safety_factor_c: Option<f64>,

    /// 低置信度阈值覆写
    #[serde(default)]
    pub low_confidence_threshold: Option<f64>,

    /// 低置信度加成倍率覆写
    #[serde(default)]
    pub low_confidence_multiplier: Option<f64>,

    /// 目标库存倍率覆写
    #[serde(default)]
    pub target_stock_multiplier: Option<f64>,
}

impl CustomPolicyParameters {
    /// 是否设置了任何覆写项（全空时调用方应退回默认策略，避免行为漂移）
    pub fn has_any(&self) -> bool {
        self.safety_factor_a.is_some()
            || self.safety_factor_b.is_some()
            || self.safety_factor_c.is_some()
            || self.low_confidence_threshold.is_some()
            || self.low_confidence_multiplier.is_some()
            || self.target_stock_multiplier.is_some()
    }

    /// 合并到默认参数之上（未设置项保持默认值）
    pub fn apply_to(
        &self,
        mut base: crate::engine::reorder::DynamicPolicyParams,
    ) -> crate::engine::reorder::DynamicPolicyParams {
        if let Some(v) = self.safety_factor_a {
            base.safety_factor_a = v;
        }
        if let Some(v) = self.safety_factor_b {
            base.safety_factor_b = v;
        }
        if let Some(v) = self.safety_factor_c {
            base.safety_factor_c = v;
        }
        if let Some(v) = self.low_confidence_threshold {
            base.low_confidence_threshold = v;
        }
        if let Some(v) = self.low_confidence_multiplier {
            base.low_confidence_multiplier = v;
        }
        if let Some(v) = self.target_stock_multiplier {
            base.target_stock_multiplier = v;
        }
        base
    }
}
