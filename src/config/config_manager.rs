// ==========================================
// 配送派单系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)，目前仅使用 global scope
// ==========================================

use crate::config::dispatch_config_trait::DispatchConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::capacity::{CapacityPolicy, CapacityPolicyTable};
use crate::domain::types::CourierType;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
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

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 覆写某类型的容量策略
    pub fn set_capacity_policy(
        &self,
        courier_type: CourierType,
        policy: &CapacityPolicy,
    ) -> Result<(), Box<dyn Error>> {
        let raw = serde_json::to_string(policy)?;
        self.set_global_config_value(&config_keys::capacity_policy(courier_type), &raw)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 读取数值配置，缺失时使用默认值；格式错误时告警并使用默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        match self.get_global_config_value(key)? {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    warn!(key = key, value = %raw, default = default, "配置值无法解析，使用默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }
}

impl DispatchConfigReader for ConfigManager {
    fn get_capacity_policy_table(&self) -> Result<CapacityPolicyTable, Box<dyn Error>> {
        let mut table = CapacityPolicyTable::default();

        for courier_type in CourierType::PRIORITY_ORDER {
            let key = config_keys::capacity_policy(courier_type);
            if let Some(raw) = self.get_global_config_value(&key)? {
                let policy: CapacityPolicy = serde_json::from_str(&raw)?;
                table.set(courier_type, policy);
            }
        }

        Ok(table)
    }

    fn get_rating_coefficient(&self, courier_type: CourierType) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(
            &config_keys::rating_coef(courier_type),
            defaults::rating_coefficient(courier_type),
        )
    }

    fn get_earnings_coefficient(&self, courier_type: CourierType) -> Result<f64, Box<dyn Error>> {
        self.get_f64_or_default(
            &config_keys::earnings_coef(courier_type),
            defaults::earnings_coefficient(courier_type),
        )
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    use crate::domain::types::CourierType;

    // 容量策略 (JSON CapacityPolicy)
    pub const CAPACITY_POLICY_PREFIX: &str = "capacity_policy";

    // 统计系数
    pub const RATING_COEF_PREFIX: &str = "rating_coef";
    pub const EARNINGS_COEF_PREFIX: &str = "earnings_coef";

    pub fn capacity_policy(courier_type: CourierType) -> String {
        format!("{}/{}", CAPACITY_POLICY_PREFIX, courier_type.as_str())
    }

    pub fn rating_coef(courier_type: CourierType) -> String {
        format!("{}/{}", RATING_COEF_PREFIX, courier_type.as_str())
    }

    pub fn earnings_coef(courier_type: CourierType) -> String {
        format!("{}/{}", EARNINGS_COEF_PREFIX, courier_type.as_str())
    }
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    use crate::domain::types::CourierType;

    pub fn rating_coefficient(courier_type: CourierType) -> f64 {
        match courier_type {
            CourierType::Foot => 3.0,
            CourierType::Bike => 2.0,
            CourierType::Auto => 1.0,
        }
    }

    pub fn earnings_coefficient(courier_type: CourierType) -> f64 {
        match courier_type {
            CourierType::Foot => 2.0,
            CourierType::Bike => 3.0,
            CourierType::Auto => 4.0,
        }
    }
}
