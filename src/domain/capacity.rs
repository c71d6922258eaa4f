// ==========================================
// 配送派单系统 - 容量策略领域模型
// ==========================================
// 用途: 按配送员类型索引的容量策略表
// 红线: 三种类型共用同一张表，不允许按类型分叉实现
// ==========================================

use crate::domain::types::CourierType;
use serde::{Deserialize, Serialize};

// ==========================================
// CapacityPolicy - 容量策略行
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityPolicy {
    pub max_orders: usize,                 // 同时配送订单数上限
    pub max_weight: f64,                   // 可携带总重量上限
    pub max_regions: usize,                // 同时服务区域数上限
    pub first_order_in_region_min: i64,    // 新区域首单耗时（分钟）
    pub subsequent_order_in_region_min: i64, // 已服务区域后续单耗时（分钟）
}

impl CapacityPolicy {
    /// 默认策略行
    pub fn default_for(courier_type: CourierType) -> Self {
        match courier_type {
            CourierType::Foot => Self {
                max_orders: 2,
                max_weight: 10.0,
                max_regions: 1,
                first_order_in_region_min: 25,
                subsequent_order_in_region_min: 10,
            },
            CourierType::Bike => Self {
                max_orders: 4,
                max_weight: 20.0,
                max_regions: 2,
                first_order_in_region_min: 12,
                subsequent_order_in_region_min: 8,
            },
            CourierType::Auto => Self {
                max_orders: 7,
                max_weight: 40.0,
                max_regions: 4,
                first_order_in_region_min: 8,
                subsequent_order_in_region_min: 4,
            },
        }
    }
}

// ==========================================
// CapacityPolicyTable - 容量策略表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPolicyTable {
    pub foot: CapacityPolicy,
    pub bike: CapacityPolicy,
    pub auto: CapacityPolicy,
}

impl CapacityPolicyTable {
    /// 按类型取策略行
    pub fn for_type(&self, courier_type: CourierType) -> &CapacityPolicy {
        match courier_type {
            CourierType::Foot => &self.foot,
            CourierType::Bike => &self.bike,
            CourierType::Auto => &self.auto,
        }
    }

    /// 覆写某一类型的策略行
    pub fn set(&mut self, courier_type: CourierType, policy: CapacityPolicy) {
        match courier_type {
            CourierType::Foot => self.foot = policy,
            CourierType::Bike => self.bike = policy,
            CourierType::Auto => self.auto = policy,
        }
    }
}

impl Default for CapacityPolicyTable {
    fn default() -> Self {
        Self {
            foot: CapacityPolicy::default_for(CourierType::Foot),
            bike: CapacityPolicy::default_for(CourierType::Bike),
            auto: CapacityPolicy::default_for(CourierType::Auto),
        }
    }
}
