// ==========================================
// 配送派单系统 - 批量导入仓储
// ==========================================
// 红线: 配送员与订单在同一事务内写入，任一失败整体回滚
// ==========================================

use crate::domain::courier::NewCourier;
use crate::domain::order::NewOrder;
use crate::repository::courier_repo::CourierRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_repo::OrderRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// ImportRepository - 批量导入仓储
// ==========================================
pub struct ImportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ImportRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 单事务写入配送员与订单
    ///
    /// # 返回
    /// - `Ok((courier_ids, order_ids))`: 各自按输入顺序
    pub fn import_batch(
        &self,
        couriers: &[NewCourier],
        orders: &[NewOrder],
    ) -> RepositoryResult<(Vec<i64>, Vec<i64>)> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let courier_ids = CourierRepository::insert_in_tx(&tx, couriers)?;
        let order_ids = OrderRepository::insert_in_tx(&tx, orders)?;

        tx.commit()?;
        debug!(
            couriers = courier_ids.len(),
            orders = order_ids.len(),
            "批量导入写入完成"
        );
        Ok((courier_ids, order_ids))
    }
}
