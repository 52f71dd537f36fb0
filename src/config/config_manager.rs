// ==========================================
// 智能补货决策系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::policy_config_trait::PolicyConfigReader;
use crate::config::policy_profile::CustomPolicyProfile;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键与默认值
// ==========================================
const KEY_SAFETY_FACTOR_A: &str = "policy/safety_factor_a";
const KEY_SAFETY_FACTOR_B: &str = "policy/safety_factor_b";
const KEY_SAFETY_FACTOR_C: &str = "policy/safety_factor_c";
const KEY_LOW_CONFIDENCE_THRESHOLD: &str = "policy/low_confidence_threshold";
const KEY_LOW_CONFIDENCE_MULTIPLIER: &str = "policy/low_confidence_multiplier";
const KEY_TARGET_STOCK_MULTIPLIER: &str = "policy/target_stock_multiplier";
const KEY_SAFETY_MARGIN_DAYS: &str = "policy/safety_margin_days";
const KEY_ORDER_COVERAGE_GATE_DAYS: &str = "policy/order_coverage_gate_days";
const KEY_FORECAST_HORIZON_DAYS: &str = "policy/forecast_horizon_days";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入配置值（scope_id='global'，INSERT OR REPLACE）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            params![key, value],
        )?;

        Ok(())
    }

    /// 读取 f64 配置，缺失/非法回退默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(default))
    }

    /// 读取 i64 配置，缺失/非法回退默认值
    fn get_i64_or_default(&self, key: &str, default: i64) -> Result<i64, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(default))
    }

    /// 读取自定义策略配置（存储于 config_kv: custom_policy/{policy_id}）
    pub fn get_custom_policy_profile(
        &self,
        policy_id: &str,
    ) -> Result<Option<CustomPolicyProfile>, Box<dyn Error>> {
        let id = policy_id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let key = format!("custom_policy/{}", id);
        let raw = match self.get_config_value(&key)? {
            Some(v) => v,
            None => return Ok(None),
        };

        let profile: CustomPolicyProfile = serde_json::from_str(&raw)?;
        Ok(Some(profile))
    }

    /// 保存自定义策略配置
    pub fn save_custom_policy_profile(
        &self,
        profile: &CustomPolicyProfile,
    ) -> Result<(), Box<dyn Error>> {
        let key = format!("custom_policy/{}", profile.policy_id.trim());
        let raw = serde_json::to_string(profile)?;
        self.set_config_value(&key, &raw)
    }

    /// 获取所有策略配置覆写项的快照（JSON 格式）
    ///
    /// # 用途
    /// - 分析批次落盘时记录配置快照，保证结果可复现
    pub fn snapshot(&self) -> Result<String, Box<dyn Error>> {
        let mut values: HashMap<&str, String> = HashMap::new();
        for key in [
            KEY_SAFETY_FACTOR_A,
            KEY_SAFETY_FACTOR_B,
            KEY_SAFETY_FACTOR_C,
            KEY_LOW_CONFIDENCE_THRESHOLD,
            KEY_LOW_CONFIDENCE_MULTIPLIER,
            KEY_TARGET_STOCK_MULTIPLIER,
            KEY_SAFETY_MARGIN_DAYS,
            KEY_ORDER_COVERAGE_GATE_DAYS,
            KEY_FORECAST_HORIZON_DAYS,
        ] {
            if let Some(v) = self.get_config_value(key)? {
                values.insert(key, v);
            }
        }

        Ok(json!({ "overrides": values }).to_string())
    }
}

// ==========================================
// PolicyConfigReader 实现
// ==========================================
#[async_trait]
impl PolicyConfigReader for ConfigManager {
    async fn get_safety_factor_a(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(KEY_SAFETY_FACTOR_A, 1.5)
    }

    async fn get_safety_factor_b(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(KEY_SAFETY_FACTOR_B, 1.2)
    }

    async fn get_safety_factor_c(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(KEY_SAFETY_FACTOR_C, 1.0)
    }

    async fn get_low_confidence_threshold(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(KEY_LOW_CONFIDENCE_THRESHOLD, 0.6)
    }

    async fn get_low_confidence_multiplier(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(KEY_LOW_CONFIDENCE_MULTIPLIER, 1.2)
    }

    async fn get_target_stock_multiplier(&self) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(KEY_TARGET_STOCK_MULTIPLIER, 1.5)
    }

    async fn get_safety_margin_days(&self) -> Result<i64, Box<dyn Error>> {
        self.get_i64_or_default(KEY_SAFETY_MARGIN_DAYS, 7)
    }

    async fn get_order_coverage_gate_days(&self) -> Result<i64, Box<dyn Error>> {
        self.get_i64_or_default(KEY_ORDER_COVERAGE_GATE_DAYS, 30)
    }

    async fn get_forecast_horizon_days(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.get_i64_or_default(KEY_FORECAST_HORIZON_DAYS, 30)? as u32)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::policy_profile::{CustomPolicyParameters, CustomPolicyProfile};
    use crate::db::initialize_schema;

    fn test_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let manager = test_manager();

        assert_eq!(manager.get_safety_factor_a().await.unwrap(), 1.5);
        assert_eq!(manager.get_safety_factor_b().await.unwrap(), 1.2);
        assert_eq!(manager.get_safety_factor_c().await.unwrap(), 1.0);
        assert_eq!(manager.get_order_coverage_gate_days().await.unwrap(), 30);
        assert_eq!(manager.get_forecast_horizon_days().await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_override_and_invalid_value_fallback() {
        let manager = test_manager();

        manager
            .set_config_value("policy/safety_factor_a", "2.0")
            .unwrap();
        assert_eq!(manager.get_safety_factor_a().await.unwrap(), 2.0);

        // 非法值回退默认
        manager
            .set_config_value("policy/safety_factor_b", "not-a-number")
            .unwrap();
        assert_eq!(manager.get_safety_factor_b().await.unwrap(), 1.2);
    }

    #[tokio::test]
    async fn test_dynamic_policy_params_composition() {
        let manager = test_manager();
        manager
            .set_config_value("policy/target_stock_multiplier", "2.0")
            .unwrap();

        let params = manager.get_dynamic_policy_params().await.unwrap();
        assert_eq!(params.target_stock_multiplier, 2.0);
        assert_eq!(params.safety_factor_a, 1.5);
    }

    #[test]
    fn test_custom_policy_profile_roundtrip() {
        let manager = test_manager();

        let profile = CustomPolicyProfile {
            policy_id: "aggressive".to_string(),
            title: "激进补货".to_string(),
            description: None,
            parameters: CustomPolicyParameters {
                safety_factor_a: Some(2.0),
                ..Default::default()
            },
        };

        manager.save_custom_policy_profile(&profile).unwrap();
        let loaded = manager
            .get_custom_policy_profile("aggressive")
            .unwrap()
            .unwrap();

        assert_eq!(loaded.title, "激进补货");
        assert_eq!(loaded.parameters.safety_factor_a, Some(2.0));
        assert!(loaded.parameters.has_any());
    }

    #[test]
    fn test_unknown_profile_returns_none() {
        let manager = test_manager();
        assert!(manager
            .get_custom_policy_profile("missing")
            .unwrap()
            .is_none());
        assert!(manager.get_custom_policy_profile("  ").unwrap().is_none());
    }
}
