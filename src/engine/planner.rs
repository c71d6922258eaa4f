// ==========================================
// 配送派单系统 - 派单规划引擎
// ==========================================
// 职责: 单日单次派单（一次确定性的贪心扫描，不做搜索）
// 输入: 未分配订单池 + 有余量的配送员(及其配送中订单)
// 输出: 订单 → 配送员 的提交列表 + 按配送员分组的结果
// ==========================================
// 顺序:
// 1) 订单按最早配送开始时间升序（稳定排序）
// 2) 配送员按类型 FOOT → BIKE → AUTO，同类型按 courier_id 升序
// 3) 每个配送员对订单池做一次从左到右的首次适配，不回溯
// 红线: 同一次派单中订单一经认领，不再被其他配送员考虑
// ==========================================

use crate::domain::assignment::{AssignmentCommit, AssignmentResult};
use crate::domain::capacity::CapacityPolicyTable;
use crate::domain::courier::Courier;
use crate::domain::interval::TimeInterval;
use crate::domain::order::Order;
use crate::engine::capacity_policy::{AssignmentAttempt, CapacityEvaluator};
use crate::engine::error::AssignmentError;
use crate::engine::interval_overlap::find_overlap;
use crate::engine::pricing::final_cost;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, trace};

/// 订单池条目：订单与其解析后的配送区间始终成对携带
#[derive(Debug, Clone)]
struct PoolEntry {
    order: Order,
    delivery_hours: Vec<TimeInterval>,
    earliest_start: Option<NaiveDateTime>,
}

// ==========================================
// AssignmentPass - 单次派单结果
// ==========================================
#[derive(Debug, Clone)]
pub struct AssignmentPass {
    pub assignment_date: NaiveDate,
    /// 按提交顺序记录的派单
    pub commits: Vec<AssignmentCommit>,
    /// courier_id → 本次派给该配送员的订单（已定价）
    pub courier_orders: BTreeMap<i64, Vec<Order>>,
    /// 处理后的配送员（orders 已追加本次订单）
    pub couriers: Vec<Courier>,
    /// 本次未能分配的订单（保留至下一次派单）
    pub unassigned: Vec<Order>,
}

impl AssignmentPass {
    pub fn assigned_count(&self) -> usize {
        self.commits.len()
    }

    /// 构建按配送员分组的输出
    pub fn to_result(&self) -> AssignmentResult {
        AssignmentResult::from_groups(
            self.assignment_date,
            self.courier_orders
                .iter()
                .map(|(courier_id, orders)| (*courier_id, orders.as_slice())),
        )
    }
}

// ==========================================
// AssignmentPlanner - 派单规划引擎
// ==========================================
pub struct AssignmentPlanner {
    evaluator: CapacityEvaluator,
}

impl AssignmentPlanner {
    pub fn new(policy_table: CapacityPolicyTable) -> Self {
        Self {
            evaluator: CapacityEvaluator::new(policy_table),
        }
    }

    /// 执行一次派单
    ///
    /// # 参数
    /// - `assignment_date`: 派单日期（区间锚定日期）
    /// - `orders`: 订单池（仅未分配且未完成的订单会参与）
    /// - `couriers`: (配送员, 其配送中订单) 列表
    ///
    /// # 错误
    /// 任一订单或配送员的时间段无法解析时整次派单失败，不产生任何提交
    #[instrument(skip(self, orders, couriers), fields(
        assignment_date = %assignment_date,
        orders_count = orders.len(),
        couriers_count = couriers.len()
    ))]
    pub fn plan(
        &self,
        assignment_date: NaiveDate,
        orders: Vec<Order>,
        couriers: Vec<(Courier, Vec<Order>)>,
    ) -> Result<AssignmentPass, AssignmentError> {
        // 1. 解析订单配送区间，与订单成对保存
        let mut pool = Self::build_pool(assignment_date, orders)?;

        // 2. 按最早配送开始时间稳定排序；无区间的订单排在最后
        pool.sort_by_key(|entry| (entry.earliest_start.is_none(), entry.earliest_start));

        // 3. 先解析全部工作区间，保证输入错误在任何认领之前暴露
        let mut couriers = couriers
            .into_iter()
            .map(|(courier, in_flight)| {
                let working_hours = TimeInterval::parse_all(&courier.working_hours, assignment_date)
                    .map_err(|source| AssignmentError::InvalidWorkingHours {
                        courier_id: courier.courier_id,
                        source,
                    })?;
                Ok((courier, in_flight, working_hours))
            })
            .collect::<Result<Vec<_>, AssignmentError>>()?;
        couriers.sort_by_key(|(courier, _, _)| (courier.courier_type, courier.courier_id));

        let mut commits = Vec::new();
        let mut courier_orders: BTreeMap<i64, Vec<Order>> = BTreeMap::new();

        // 4. 逐个配送员贪心填充
        for (courier, in_flight, working_hours) in couriers.iter_mut() {
            let mut attempt = AssignmentAttempt::seeded_from(in_flight.iter());

            if !self.evaluator.has_spare_capacity(courier.courier_type, &attempt) {
                debug!(
                    courier_id = courier.courier_id,
                    in_flight = attempt.count,
                    "配送员无余量，跳过"
                );
                continue;
            }

            for entry in pool.iter_mut() {
                if entry.order.courier_id.is_some() {
                    continue;
                }

                let decision = match self.evaluator.evaluate(courier, &attempt, &entry.order) {
                    Ok(decision) => decision,
                    Err(reason) => {
                        trace!(
                            courier_id = courier.courier_id,
                            order_id = entry.order.order_id,
                            reason = %reason,
                            "容量约束不满足"
                        );
                        continue;
                    }
                };

                let Some(case) =
                    find_overlap(working_hours, &entry.delivery_hours, decision.required_minutes)
                else {
                    trace!(
                        courier_id = courier.courier_id,
                        order_id = entry.order.order_id,
                        required_minutes = decision.required_minutes,
                        "时间窗不满足"
                    );
                    continue;
                };

                // 提交：认领 + 定价 + 更新运行累计
                let order = &mut entry.order;
                order.courier_id = Some(courier.courier_id);
                order.assignment_date = Some(assignment_date);
                order.cost = final_cost(order.cost, decision.coefficient);

                courier.orders.push(order.order_id);
                attempt.record(order);

                debug!(
                    courier_id = courier.courier_id,
                    order_id = order.order_id,
                    cost = order.cost,
                    coefficient = decision.coefficient,
                    new_region = decision.new_region,
                    required_minutes = decision.required_minutes,
                    overlap = ?case,
                    "订单已分配"
                );

                commits.push(AssignmentCommit {
                    order_id: order.order_id,
                    courier_id: courier.courier_id,
                    assignment_date,
                    cost: order.cost,
                    coefficient: decision.coefficient,
                });
                courier_orders
                    .entry(courier.courier_id)
                    .or_default()
                    .push(order.clone());

                if !self.evaluator.has_spare_capacity(courier.courier_type, &attempt) {
                    break;
                }
            }
        }

        let unassigned: Vec<Order> = pool
            .into_iter()
            .filter(|entry| entry.order.courier_id.is_none())
            .map(|entry| entry.order)
            .collect();

        info!(
            assigned_count = commits.len(),
            courier_count = courier_orders.len(),
            unassigned_count = unassigned.len(),
            "派单完成"
        );

        Ok(AssignmentPass {
            assignment_date,
            commits,
            courier_orders,
            couriers: couriers.into_iter().map(|(courier, _, _)| courier).collect(),
            unassigned,
        })
    }

    /// 构建订单池（过滤不可分配订单，解析配送区间）
    fn build_pool(
        assignment_date: NaiveDate,
        orders: Vec<Order>,
    ) -> Result<Vec<PoolEntry>, AssignmentError> {
        let mut pool = Vec::with_capacity(orders.len());

        for order in orders {
            if !order.is_assignable() {
                debug!(order_id = order.order_id, "订单已分配或已完成，不进入订单池");
                continue;
            }

            let delivery_hours = TimeInterval::parse_all(&order.delivery_hours, assignment_date)
                .map_err(|source| AssignmentError::InvalidDeliveryHours {
                    order_id: order.order_id,
                    source,
                })?;
            let earliest_start = delivery_hours.iter().map(|iv| iv.start).min();

            pool.push(PoolEntry {
                order,
                delivery_hours,
                earliest_start,
            });
        }

        Ok(pool)
    }
}

impl Default for AssignmentPlanner {
    fn default() -> Self {
        Self::new(CapacityPolicyTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capacity::CapacityPolicy;
    use crate::domain::types::CourierType;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, 10).unwrap()
    }

    fn courier(courier_id: i64, courier_type: CourierType, regions: Vec<i64>, hours: &[&str]) -> Courier {
        Courier {
            courier_id,
            courier_type,
            regions,
            working_hours: hours.iter().map(|h| h.to_string()).collect(),
            orders: vec![],
        }
    }

    fn order(order_id: i64, weight: f64, region: i64, hours: &[&str], cost: f64) -> Order {
        Order {
            order_id,
            weight,
            region,
            delivery_hours: hours.iter().map(|h| h.to_string()).collect(),
            cost,
            courier_id: None,
            assignment_date: None,
            complete_time: None,
        }
    }

    fn assigned_ids(pass: &AssignmentPass, courier_id: i64) -> Vec<i64> {
        pass.courier_orders
            .get(&courier_id)
            .map(|orders| orders.iter().map(|o| o.order_id).collect())
            .unwrap_or_default()
    }

    // ==========================================
    // 端到端场景
    // ==========================================

    #[test]
    fn test_foot_courier_two_orders_same_region() {
        let planner = AssignmentPlanner::default();
        let foot = courier(1, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let orders = vec![
            order(1, 3.0, 1, &["09:00-10:00"], 100.0),
            order(2, 3.0, 1, &["10:05-11:00"], 100.0),
        ];

        let pass = planner.plan(date(), orders, vec![(foot, vec![])]).unwrap();

        assert_eq!(pass.assigned_count(), 2);
        let assigned = &pass.courier_orders[&1];
        assert_eq!(assigned[0].order_id, 1);
        assert_eq!(assigned[0].cost, 100.0);
        assert_eq!(assigned[1].order_id, 2);
        assert_eq!(assigned[1].cost, 80.0);
        assert!(assigned.iter().all(|o| o.assignment_date == Some(date())));
        assert_eq!(assigned.iter().map(|o| o.weight).sum::<f64>(), 6.0);
        assert_eq!(pass.couriers[0].orders, vec![1, 2]);
        assert_eq!(pass.commits[1].coefficient, 0.8);
    }

    #[test]
    fn test_third_order_rejected_when_foot_is_full() {
        let planner = AssignmentPlanner::default();
        let foot = courier(1, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let orders = vec![
            order(1, 3.0, 1, &["09:00-10:00"], 100.0),
            order(2, 3.0, 1, &["10:05-11:00"], 100.0),
            order(3, 5.0, 1, &["11:00-12:00"], 100.0),
        ];

        let pass = planner.plan(date(), orders, vec![(foot, vec![])]).unwrap();

        assert_eq!(assigned_ids(&pass, 1), vec![1, 2]);
        assert_eq!(pass.unassigned.len(), 1);
        assert_eq!(pass.unassigned[0].order_id, 3);
        assert_eq!(pass.unassigned[0].cost, 100.0);
    }

    #[test]
    fn test_pool_sorted_by_earliest_delivery_start() {
        let planner = AssignmentPlanner::default();
        let foot = courier(1, CourierType::Foot, vec![1], &["08:00-20:00"]);
        let orders = vec![
            order(10, 1.0, 1, &["15:00-16:00"], 50.0),
            order(11, 1.0, 1, &["17:00-18:00", "08:30-09:30"], 50.0),
            order(12, 1.0, 1, &["12:00-13:00"], 50.0),
        ];

        let pass = planner.plan(date(), orders, vec![(foot, vec![])]).unwrap();

        // 最早开始: 11(08:30) → 12(12:00) → 10(15:00)，FOOT 只能拿两单
        assert_eq!(assigned_ids(&pass, 1), vec![11, 12]);
        assert_eq!(pass.unassigned[0].order_id, 10);
    }

    #[test]
    fn test_courier_types_processed_foot_bike_auto() {
        let planner = AssignmentPlanner::default();
        let auto = courier(1, CourierType::Auto, vec![1], &["09:00-18:00"]);
        let bike = courier(2, CourierType::Bike, vec![1], &["09:00-18:00"]);
        let foot = courier(3, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let orders = (1..=8)
            .map(|id| order(id, 1.0, 1, &["10:00-11:00"], 100.0))
            .collect();

        let pass = planner
            .plan(date(), orders, vec![(auto, vec![]), (bike, vec![]), (foot, vec![])])
            .unwrap();

        assert_eq!(assigned_ids(&pass, 3), vec![1, 2]);
        assert_eq!(assigned_ids(&pass, 2), vec![3, 4, 5, 6]);
        assert_eq!(assigned_ids(&pass, 1), vec![7, 8]);

        // 结果按 courier_id 升序
        let result = pass.to_result();
        let ids: Vec<i64> = result.couriers.iter().map(|c| c.courier_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result.date, "2023-05-10");
    }

    #[test]
    fn test_same_type_couriers_ordered_by_id() {
        let planner = AssignmentPlanner::default();
        let later = courier(9, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let earlier = courier(4, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let orders = vec![order(1, 1.0, 1, &["10:00-11:00"], 100.0)];

        let pass = planner
            .plan(date(), orders, vec![(later, vec![]), (earlier, vec![])])
            .unwrap();

        assert_eq!(assigned_ids(&pass, 4), vec![1]);
        assert!(assigned_ids(&pass, 9).is_empty());
    }

    #[test]
    fn test_order_skipped_by_one_courier_won_by_next() {
        let planner = AssignmentPlanner::default();
        let foot = courier(1, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let bike = courier(2, CourierType::Bike, vec![1, 2], &["09:00-18:00"]);
        let orders = vec![
            order(1, 2.0, 2, &["09:00-10:00"], 100.0), // FOOT 不服务区域 2
            order(2, 12.0, 1, &["10:00-11:00"], 100.0), // FOOT 超重
            order(3, 2.0, 1, &["11:00-12:00"], 100.0),
        ];

        let pass = planner
            .plan(date(), orders, vec![(foot, vec![]), (bike, vec![])])
            .unwrap();

        assert_eq!(assigned_ids(&pass, 1), vec![3]);
        assert_eq!(assigned_ids(&pass, 2), vec![1, 2]);
    }

    #[test]
    fn test_in_flight_orders_seed_capacity() {
        let planner = AssignmentPlanner::default();
        let foot = courier(1, CourierType::Foot, vec![1, 2], &["09:00-18:00"]);
        let mut in_flight = order(100, 8.0, 2, &["09:00-10:00"], 100.0);
        in_flight.courier_id = Some(1);

        let orders = vec![
            order(1, 3.0, 2, &["10:00-11:00"], 100.0), // 8 + 3 > 10
            order(2, 1.0, 1, &["10:00-11:00"], 100.0), // 区域数超限
            order(3, 2.0, 2, &["10:00-11:00"], 100.0), // 同区域，系数 0.8
        ];

        let pass = planner.plan(date(), orders, vec![(foot, vec![in_flight])]).unwrap();

        let assigned = &pass.courier_orders[&1];
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].order_id, 3);
        assert_eq!(assigned[0].cost, 80.0);
    }

    #[test]
    fn test_full_courier_is_skipped() {
        let planner = AssignmentPlanner::default();
        let foot = courier(1, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let mut a = order(100, 1.0, 1, &["09:00-10:00"], 100.0);
        let mut b = order(101, 1.0, 1, &["09:00-10:00"], 100.0);
        a.courier_id = Some(1);
        b.courier_id = Some(1);

        let orders = vec![order(1, 1.0, 1, &["10:00-11:00"], 100.0)];
        let pass = planner.plan(date(), orders, vec![(foot, vec![a, b])]).unwrap();

        assert_eq!(pass.assigned_count(), 0);
        assert!(pass.to_result().couriers.is_empty());
    }

    #[test]
    fn test_time_window_requirement_grows_with_load() {
        let planner = AssignmentPlanner::default();
        // 工作至 10:30；第二单在 10:20 开始，已服务区域所需 25 分钟，剩余仅 10 分钟
        let foot = courier(1, CourierType::Foot, vec![1], &["09:00-10:30"]);
        let orders = vec![
            order(1, 1.0, 1, &["09:00-09:30"], 100.0),
            order(2, 1.0, 1, &["10:20-10:40"], 100.0),
        ];

        let pass = planner.plan(date(), orders, vec![(foot, vec![])]).unwrap();
        assert_eq!(assigned_ids(&pass, 1), vec![1]);
    }

    #[test]
    fn test_completed_and_claimed_orders_not_repriced() {
        let planner = AssignmentPlanner::default();
        let foot = courier(1, CourierType::Foot, vec![1], &["09:00-18:00"]);

        let first = planner
            .plan(
                date(),
                vec![order(1, 1.0, 1, &["09:00-10:00"], 100.0)],
                vec![(foot.clone(), vec![])],
            )
            .unwrap();
        let claimed = first.courier_orders[&1][0].clone();
        assert_eq!(claimed.cost, 100.0);

        // 已认领订单再次出现在输入中也不会被重新定价/认领
        let second = planner
            .plan(date(), vec![claimed.clone()], vec![(foot, vec![claimed])])
            .unwrap();
        assert_eq!(second.assigned_count(), 0);
        assert!(second.unassigned.is_empty());
    }

    #[test]
    fn test_capacity_invariants_hold_after_pass() {
        let planner = AssignmentPlanner::default();
        let couriers = vec![
            (courier(1, CourierType::Foot, vec![1, 2], &["08:00-20:00"]), vec![]),
            (courier(2, CourierType::Bike, vec![1, 2, 3], &["08:00-20:00"]), vec![]),
            (courier(3, CourierType::Auto, vec![1, 2, 3, 4, 5], &["08:00-20:00"]), vec![]),
        ];
        let orders = (1..=30)
            .map(|id| {
                let region = id % 5 + 1;
                let weight = (id % 7) as f64 + 0.5;
                let start = 8 + (id % 10);
                let hours = format!("{:02}:00-{:02}:30", start, start);
                order(id, weight, region, &[hours.as_str()], 100.0)
            })
            .collect();

        let pass = planner.plan(date(), orders, couriers).unwrap();

        for courier in &pass.couriers {
            let policy = CapacityPolicy::default_for(courier.courier_type);
            let assigned = pass
                .courier_orders
                .get(&courier.courier_id)
                .cloned()
                .unwrap_or_default();
            let weight: f64 = assigned.iter().map(|o| o.weight).sum();
            let regions: std::collections::BTreeSet<i64> =
                assigned.iter().map(|o| o.region).collect();

            assert!(assigned.len() <= policy.max_orders);
            assert!(weight <= policy.max_weight);
            assert!(regions.len() <= policy.max_regions);
        }
    }

    #[test]
    fn test_malformed_hours_fail_whole_pass() {
        let planner = AssignmentPlanner::default();
        let foot = courier(1, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let orders = vec![
            order(1, 1.0, 1, &["09:00-10:00"], 100.0),
            order(2, 1.0, 1, &["ten-eleven"], 100.0),
        ];
        let err = planner.plan(date(), orders, vec![(foot, vec![])]).unwrap_err();
        assert!(matches!(err, AssignmentError::InvalidDeliveryHours { order_id: 2, .. }));

        let broken = courier(2, CourierType::Bike, vec![1], &["18:00-09:00"]);
        let orders = vec![order(1, 1.0, 1, &["09:00-10:00"], 100.0)];
        let err = planner.plan(date(), orders, vec![(broken, vec![])]).unwrap_err();
        assert!(matches!(err, AssignmentError::InvalidWorkingHours { courier_id: 2, .. }));
    }

    #[test]
    fn test_custom_policy_table_is_used() {
        let mut table = CapacityPolicyTable::default();
        table.set(
            CourierType::Foot,
            CapacityPolicy {
                max_orders: 1,
                ..CapacityPolicy::default_for(CourierType::Foot)
            },
        );
        let planner = AssignmentPlanner::new(table);
        let foot = courier(1, CourierType::Foot, vec![1], &["09:00-18:00"]);
        let orders = vec![
            order(1, 1.0, 1, &["09:00-10:00"], 100.0),
            order(2, 1.0, 1, &["10:00-11:00"], 100.0),
        ];

        let pass = planner.plan(date(), orders, vec![(foot, vec![])]).unwrap();
        assert_eq!(assigned_ids(&pass, 1), vec![1]);
    }
}
