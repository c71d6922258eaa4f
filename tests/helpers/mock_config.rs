// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use courier_dispatch::config::{defaults, DispatchConfigReader};
use courier_dispatch::domain::{CapacityPolicy, CapacityPolicyTable, CourierType};
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub policy_table: CapacityPolicyTable,
    pub rating_multiplier: f64,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            policy_table: CapacityPolicyTable::default(),
            rating_multiplier: 1.0,
        }
    }

    /// 覆写某类型的订单数上限
    pub fn with_max_orders(courier_type: CourierType, max_orders: usize) -> Self {
        let mut config = Self::default();
        config.policy_table.set(
            courier_type,
            CapacityPolicy {
                max_orders,
                ..CapacityPolicy::default_for(courier_type)
            },
        );
        config
    }
}

impl DispatchConfigReader for MockConfig {
    fn get_capacity_policy_table(&self) -> Result<CapacityPolicyTable, Box<dyn Error>> {
        Ok(self.policy_table.clone())
    }

    fn get_rating_coefficient(&self, courier_type: CourierType) -> Result<f64, Box<dyn Error>> {
        Ok(defaults::rating_coefficient(courier_type) * self.rating_multiplier)
    }

    fn get_earnings_coefficient(&self, courier_type: CourierType) -> Result<f64, Box<dyn Error>> {
        Ok(defaults::earnings_coefficient(courier_type))
    }
}
