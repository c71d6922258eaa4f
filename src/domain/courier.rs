// ==========================================
// 配送派单系统 - 配送员领域模型
// ==========================================
// 红线: courier_type 创建后不可变更
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::interval::parse_hours;
use crate::domain::types::CourierType;
use serde::{Deserialize, Serialize};

// ==========================================
// Courier - 配送员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Courier {
    pub courier_id: i64,
    pub courier_type: CourierType,
    pub regions: Vec<i64>,            // 可服务区域
    pub working_hours: Vec<String>,   // "HH:MM-HH:MM"
    #[serde(default, skip_serializing)]
    pub orders: Vec<i64>,             // 历史上分配给该配送员的全部订单（只增不减）
}

impl Courier {
    /// 是否服务该区域
    pub fn serves_region(&self, region: i64) -> bool {
        self.regions.contains(&region)
    }
}

// ==========================================
// NewCourier - 创建配送员请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourier {
    pub courier_type: CourierType,
    pub regions: Vec<i64>,
    pub working_hours: Vec<String>,
}

impl NewCourier {
    /// 创建前校验
    pub fn validate(&self) -> DomainResult<()> {
        if self.regions.is_empty() {
            return Err(DomainError::FieldValueError {
                field: "regions".to_string(),
                message: "至少需要一个服务区域".to_string(),
            });
        }
        if let Some(region) = self.regions.iter().find(|r| **r <= 0) {
            return Err(DomainError::FieldValueError {
                field: "regions".to_string(),
                message: format!("区域编号必须为正整数: {}", region),
            });
        }
        if self.working_hours.is_empty() {
            return Err(DomainError::FieldValueError {
                field: "working_hours".to_string(),
                message: "至少需要一个工作时段".to_string(),
            });
        }
        for raw in &self.working_hours {
            parse_hours(raw)?;
        }
        Ok(())
    }
}
