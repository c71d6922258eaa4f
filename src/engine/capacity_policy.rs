// ==========================================
// 配送派单系统 - 容量策略判定
// ==========================================
// 输入: 配送员当前负载(AssignmentAttempt) + 候选订单 + 配送员类型
// 输出: 可行性 + 所需时长(分钟) + 定价系数
// 红线: 所有拒绝必须给出原因
// ==========================================

use crate::domain::capacity::{CapacityPolicy, CapacityPolicyTable};
use crate::domain::courier::Courier;
use crate::domain::order::Order;
use crate::domain::types::CourierType;
use crate::engine::pricing::{NEW_REGION_COEFFICIENT, SERVED_REGION_COEFFICIENT};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// AssignmentAttempt - 单个配送员在一次派单中的运行累计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentAttempt {
    pub weight: f64,
    pub regions: BTreeSet<i64>,
    pub count: usize,
}

impl AssignmentAttempt {
    /// 以配送员当前配送中的订单作为初始负载
    pub fn seeded_from<'a, I>(in_flight: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut attempt = Self::default();
        for order in in_flight.into_iter().filter(|o| o.is_in_flight()) {
            attempt.record(order);
        }
        attempt
    }

    /// 记录一个新接单
    pub fn record(&mut self, order: &Order) {
        self.weight += order.weight;
        self.regions.insert(order.region);
        self.count += 1;
    }
}

// ==========================================
// 判定结果
// ==========================================

/// 可行时的判定结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityDecision {
    pub required_minutes: i64,
    pub coefficient: f64,
    pub new_region: bool,
}

/// 不可行原因（按判定顺序）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapacityRejection {
    OrderLimitReached { count: usize, max_orders: usize },
    WeightExceeded { total: f64, max_weight: f64 },
    RegionNotServed { region: i64 },
    RegionLimitExceeded { regions: usize, max_regions: usize },
}

impl fmt::Display for CapacityRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityRejection::OrderLimitReached { count, max_orders } => {
                write!(f, "ORDER_LIMIT_REACHED: {} >= {}", count, max_orders)
            }
            CapacityRejection::WeightExceeded { total, max_weight } => {
                write!(f, "WEIGHT_EXCEEDED: {} > {}", total, max_weight)
            }
            CapacityRejection::RegionNotServed { region } => {
                write!(f, "REGION_NOT_SERVED: region={}", region)
            }
            CapacityRejection::RegionLimitExceeded { regions, max_regions } => {
                write!(f, "REGION_LIMIT_EXCEEDED: {} > {}", regions, max_regions)
            }
        }
    }
}

// ==========================================
// CapacityEvaluator - 容量策略判定引擎
// ==========================================
pub struct CapacityEvaluator {
    table: CapacityPolicyTable,
}

impl CapacityEvaluator {
    pub fn new(table: CapacityPolicyTable) -> Self {
        Self { table }
    }

    /// 某类型的策略行
    pub fn policy(&self, courier_type: CourierType) -> &CapacityPolicy {
        self.table.for_type(courier_type)
    }

    /// 配送员是否仍有余量（配送中订单数严格小于上限）
    pub fn has_spare_capacity(&self, courier_type: CourierType, attempt: &AssignmentAttempt) -> bool {
        attempt.count < self.policy(courier_type).max_orders
    }

    /// 判定候选订单能否加入配送员当前负载
    ///
    /// 所需时长：R = 加入后区域数, N = 当前订单数
    /// - 新区域: R·first + (N − R + 1)·subsequent, 系数 1.0
    /// - 已服务区域: R·first + (N − R)·subsequent, 系数 0.8
    pub fn evaluate(
        &self,
        courier: &Courier,
        attempt: &AssignmentAttempt,
        candidate: &Order,
    ) -> Result<CapacityDecision, CapacityRejection> {
        let policy = self.policy(courier.courier_type);

        if attempt.count >= policy.max_orders {
            return Err(CapacityRejection::OrderLimitReached {
                count: attempt.count,
                max_orders: policy.max_orders,
            });
        }

        let total = attempt.weight + candidate.weight;
        if total > policy.max_weight {
            return Err(CapacityRejection::WeightExceeded {
                total,
                max_weight: policy.max_weight,
            });
        }

        if !courier.serves_region(candidate.region) {
            return Err(CapacityRejection::RegionNotServed {
                region: candidate.region,
            });
        }

        let new_region = !attempt.regions.contains(&candidate.region);
        let region_count = attempt.regions.len() + usize::from(new_region);
        if region_count > policy.max_regions {
            return Err(CapacityRejection::RegionLimitExceeded {
                regions: region_count,
                max_regions: policy.max_regions,
            });
        }

        let r = region_count as i64;
        let n = attempt.count as i64;
        let (subsequent_count, coefficient) = if new_region {
            (n - r + 1, NEW_REGION_COEFFICIENT)
        } else {
            (n - r, SERVED_REGION_COEFFICIENT)
        };

        Ok(CapacityDecision {
            required_minutes: r * policy.first_order_in_region_min
                + subsequent_count * policy.subsequent_order_in_region_min,
            coefficient,
            new_region,
        })
    }
}

impl Default for CapacityEvaluator {
    fn default() -> Self {
        Self::new(CapacityPolicyTable::default())
    }
}
