// ==========================================
// 配送派单系统 - 订单 API
// ==========================================
// 职责: 订单创建、查询、完成
// 红线: 只有订单当前所属配送员才能完成订单
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::interval::parse_timestamp;
use crate::domain::order::{CompleteInfo, NewOrder, Order};
use crate::repository::OrderRepository;

// ==========================================
// OrderApi - 订单 API
// ==========================================
pub struct OrderApi {
    order_repo: Arc<OrderRepository>,
}

impl OrderApi {
    pub fn new(order_repo: Arc<OrderRepository>) -> Self {
        Self { order_repo }
    }

    /// 批量创建订单
    ///
    /// 任一条目校验失败则全部不写入
    pub fn create_orders(&self, orders: Vec<NewOrder>) -> ApiResult<Vec<i64>> {
        for (idx, order) in orders.iter().enumerate() {
            order
                .validate()
                .map_err(|e| ApiError::InvalidInput(format!("第{}个订单: {}", idx + 1, e)))?;
        }

        let ids = self.order_repo.insert_batch(&orders)?;
        info!(count = ids.len(), "订单创建完成");
        Ok(ids)
    }

    /// 查询订单
    pub fn get_order(&self, order_id: i64) -> ApiResult<Order> {
        self.order_repo
            .find_by_id(order_id)?
            .ok_or_else(|| ApiError::NotFound(format!("订单(id={})不存在", order_id)))
    }

    /// 批量完成订单
    ///
    /// # 说明
    /// - 所有 complete_time 先统一解析，任一无法解析则不做任何修改
    /// - 订单不属于该配送员或已完成的条目被跳过
    ///
    /// # 返回
    /// - 本次实际完成的订单
    pub fn complete_orders(&self, infos: Vec<CompleteInfo>) -> ApiResult<Vec<Order>> {
        let parsed = infos
            .iter()
            .map(|info| parse_timestamp(&info.complete_time).map(|ts| (info, ts)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut completed = Vec::new();
        for (info, complete_time) in parsed {
            if self
                .order_repo
                .mark_completed(info.courier_id, info.order_id, complete_time)?
            {
                completed.push(self.get_order(info.order_id)?);
            } else {
                debug!(
                    order_id = info.order_id,
                    courier_id = info.courier_id,
                    "订单不属于该配送员或已完成，跳过"
                );
            }
        }

        info!(requested = infos.len(), completed = completed.len(), "订单完成处理结束");
        Ok(completed)
    }
}
