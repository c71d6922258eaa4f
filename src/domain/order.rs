// ==========================================
// 配送派单系统 - 订单领域模型
// ==========================================
// 红线: 已完成订单（complete_time 非空）永不可再分配
// 状态: 未分配 → 配送中(in flight) → 已完成
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::interval::parse_hours;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Order - 配送订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub weight: f64,
    pub region: i64,
    pub delivery_hours: Vec<String>,            // "HH:MM-HH:MM"
    pub cost: f64,                              // 定价前为基础价格，分配时只下调一次
    pub courier_id: Option<i64>,
    pub assignment_date: Option<NaiveDate>,
    pub complete_time: Option<NaiveDateTime>,
}

impl Order {
    /// 已完成
    pub fn is_completed(&self) -> bool {
        self.complete_time.is_some()
    }

    /// 配送中：已分配且未完成
    pub fn is_in_flight(&self) -> bool {
        self.courier_id.is_some() && self.complete_time.is_none()
    }

    /// 可进入派单池：未分配且未完成
    pub fn is_assignable(&self) -> bool {
        self.courier_id.is_none() && self.complete_time.is_none()
    }
}

// ==========================================
// NewOrder - 创建订单请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub weight: f64,
    #[serde(alias = "regions")]
    pub region: i64,
    pub delivery_hours: Vec<String>,
    pub cost: f64,
}

impl NewOrder {
    /// 创建前校验
    pub fn validate(&self) -> DomainResult<()> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(field_error("weight", format!("重量必须为正数: {}", self.weight)));
        }
        if !(self.cost.is_finite() && self.cost > 0.0) {
            return Err(field_error("cost", format!("价格必须为正数: {}", self.cost)));
        }
        if self.region <= 0 {
            return Err(field_error("regions", format!("区域编号必须为正整数: {}", self.region)));
        }
        if self.delivery_hours.is_empty() {
            return Err(field_error("delivery_hours", "至少需要一个配送时间段".to_string()));
        }
        for raw in &self.delivery_hours {
            parse_hours(raw)?;
        }
        Ok(())
    }
}

fn field_error(field: &str, message: String) -> DomainError {
    DomainError::FieldValueError {
        field: field.to_string(),
        message,
    }
}

// ==========================================
// CompleteInfo - 订单完成请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteInfo {
    pub courier_id: i64,
    pub order_id: i64,
    pub complete_time: String,
}
