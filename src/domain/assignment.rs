// ==========================================
// 配送派单系统 - 派单结果模型
// ==========================================
// 输出结构: {date, couriers: [{courier_id, orders: {group_order_id, orders: [...]}}]}
// 红线: couriers 按 courier_id 升序
// ==========================================

use crate::domain::order::Order;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 订单分组编号（目前恒为 1，尚无真实的分组逻辑）
pub const GROUP_ORDER_ID: i64 = 1;

// ==========================================
// AssignmentCommit - 单条派单提交
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentCommit {
    pub order_id: i64,
    pub courier_id: i64,
    pub assignment_date: NaiveDate,
    pub cost: f64,          // 定价后价格
    pub coefficient: f64,   // 定价系数
}

// ==========================================
// 输出 DTO
// ==========================================

/// 单个订单的输出视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedOrder {
    pub order_id: i64,
    pub weight: f64,
    pub regions: i64,
    pub delivery_hours: Vec<String>,
    pub cost: f64,
}

impl From<&Order> for AssignedOrder {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id,
            weight: order.weight,
            regions: order.region,
            delivery_hours: order.delivery_hours.clone(),
            cost: order.cost,
        }
    }
}

/// 订单分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderGroup {
    pub group_order_id: i64,
    pub orders: Vec<AssignedOrder>,
}

/// 单个配送员的派单结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierAssignment {
    pub courier_id: i64,
    pub orders: OrderGroup,
}

impl CourierAssignment {
    pub fn new(courier_id: i64, orders: &[Order]) -> Self {
        Self {
            courier_id,
            orders: OrderGroup {
                group_order_id: GROUP_ORDER_ID,
                orders: orders.iter().map(AssignedOrder::from).collect(),
            },
        }
    }
}

/// 派单结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub date: String,
    pub couriers: Vec<CourierAssignment>,
}

impl AssignmentResult {
    /// 按 courier_id 升序构建；无订单的配送员不出现在结果中
    pub fn from_groups<'a, I>(date: NaiveDate, groups: I) -> Self
    where
        I: IntoIterator<Item = (i64, &'a [Order])>,
    {
        let mut couriers: Vec<CourierAssignment> = groups
            .into_iter()
            .filter(|(_, orders)| !orders.is_empty())
            .map(|(courier_id, orders)| CourierAssignment::new(courier_id, orders))
            .collect();
        couriers.sort_by_key(|c| c.courier_id);

        Self {
            date: date.format(crate::domain::interval::DATE_FORMAT).to_string(),
            couriers,
        }
    }

    /// 本次结果中的订单总数
    pub fn order_count(&self) -> usize {
        self.couriers.iter().map(|c| c.orders.orders.len()).sum()
    }
}

// ==========================================
// AssignmentLog - 派单执行记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentLog {
    pub pass_id: String,
    pub assignment_date: NaiveDate,
    pub assigned_count: usize,
    pub courier_count: usize,
    pub created_at: NaiveDateTime,
}

// ==========================================
// CourierMetaInfo - 配送员统计信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierMetaInfo {
    pub courier_id: i64,
    pub courier_type: crate::domain::types::CourierType,
    pub regions: Vec<i64>,
    pub working_hours: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earnings: Option<f64>,
}
