// ==========================================
// 配送派单系统 - 派单 API
// ==========================================
// 职责: 执行派单、查询派单结果
// 流程: 读取配置 → 加载订单池/有余量的配送员 → 引擎派单 → 单事务提交 + 执行记录
// ==========================================

use chrono::Local;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::DispatchConfigReader;
use crate::domain::assignment::{AssignmentLog, AssignmentResult};
use crate::domain::courier::Courier;
use crate::domain::interval::resolve_assignment_date;
use crate::domain::order::Order;
use crate::domain::types::CourierType;
use crate::domain::capacity::CapacityPolicyTable;
use crate::engine::planner::AssignmentPlanner;
use crate::repository::{CourierRepository, OrderRepository};

// ==========================================
// AssignmentApi - 派单 API
// ==========================================
pub struct AssignmentApi<C>
where
    C: DispatchConfigReader,
{
    courier_repo: Arc<CourierRepository>,
    order_repo: Arc<OrderRepository>,
    config: Arc<C>,
    // 同一进程内的派单串行执行；跨进程由提交时的前置条件保护
    pass_lock: Mutex<()>,
}

impl<C> AssignmentApi<C>
where
    C: DispatchConfigReader,
{
    pub fn new(
        courier_repo: Arc<CourierRepository>,
        order_repo: Arc<OrderRepository>,
        config: Arc<C>,
    ) -> Self {
        Self {
            courier_repo,
            order_repo,
            config,
            pass_lock: Mutex::new(()),
        }
    }

    /// 执行一次派单
    ///
    /// # 参数
    /// - `date`: 派单日期 (YYYY-MM-DD)；缺失或无法解析时使用当天
    ///
    /// # 返回
    /// - 本次新分配的订单（按配送员分组，courier_id 升序）
    ///
    /// # 错误
    /// - `InvalidInput`: 订单或配送员时间段无法解析（不产生任何提交）
    /// - `ConcurrencyConflict`: 提交时订单已被其他派单认领（整体回滚）
    #[instrument(skip(self))]
    pub fn assign_orders(&self, date: Option<&str>) -> ApiResult<AssignmentResult> {
        let _guard = self
            .pass_lock
            .lock()
            .map_err(|e| ApiError::InternalError(format!("派单锁获取失败: {}", e)))?;

        let assignment_date = resolve_assignment_date(date, Local::now().date_naive());

        // 1. 读取容量策略
        let policy_table = self
            .config
            .get_capacity_policy_table()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        // 2. 加载订单池与候选配送员
        let orders = self.order_repo.find_unassigned()?;
        let couriers = self.load_candidates(&policy_table)?;
        info!(
            %assignment_date,
            orders_count = orders.len(),
            couriers_count = couriers.len(),
            "开始派单"
        );

        // 3. 引擎派单
        let planner = AssignmentPlanner::new(policy_table);
        let pass = planner.plan(assignment_date, orders, couriers)?;
        let result = pass.to_result();

        // 4. 单事务提交（含执行记录）
        let log = AssignmentLog {
            pass_id: Uuid::new_v4().to_string(),
            assignment_date,
            assigned_count: pass.assigned_count(),
            courier_count: result.couriers.len(),
            created_at: Local::now().naive_local(),
        };
        self.order_repo.commit_assignments(&pass.commits, Some(&log))?;

        info!(
            pass_id = %log.pass_id,
            assigned_count = log.assigned_count,
            courier_count = log.courier_count,
            "派单已提交"
        );
        Ok(result)
    }

    /// 查询某日派单结果
    ///
    /// # 参数
    /// - `date`: 派单日期 (YYYY-MM-DD)，缺省或无法解析时取当天（与派单一致）
    /// - `courier_id`: 仅查询某个配送员
    pub fn get_assignments(
        &self,
        date: Option<&str>,
        courier_id: Option<i64>,
    ) -> ApiResult<AssignmentResult> {
        let assignment_date = resolve_assignment_date(date, Local::now().date_naive());
        let orders = self
            .order_repo
            .find_by_assignment_date(assignment_date, courier_id)?;

        let mut groups: BTreeMap<i64, Vec<Order>> = BTreeMap::new();
        for order in orders {
            if let Some(owner) = order.courier_id {
                groups.entry(owner).or_default().push(order);
            }
        }

        Ok(AssignmentResult::from_groups(
            assignment_date,
            groups.iter().map(|(id, orders)| (*id, orders.as_slice())),
        ))
    }

    /// 加载有余量的配送员及其配送中订单
    fn load_candidates(
        &self,
        policy_table: &CapacityPolicyTable,
    ) -> ApiResult<Vec<(Courier, Vec<Order>)>> {
        let mut candidates = Vec::new();

        for courier_type in CourierType::PRIORITY_ORDER {
            let max_orders = policy_table.for_type(courier_type).max_orders;
            for courier in self
                .courier_repo
                .find_eligible_by_type(courier_type, max_orders)?
            {
                let in_flight = self.order_repo.find_in_flight_by_courier(courier.courier_id)?;
                candidates.push((courier, in_flight));
            }
        }

        Ok(candidates)
    }
}
