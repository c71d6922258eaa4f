// ==========================================
// 配送派单系统 - 订单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: 派单提交在单个事务内完成；每条 UPDATE 以
//       "courier_id IS NULL AND complete_time IS NULL" 为前置条件，
//       任一失配则整体回滚并返回 ConcurrencyConflict
// ==========================================

use crate::domain::assignment::{AssignmentCommit, AssignmentLog};
use crate::domain::order::{NewOrder, Order};
use crate::repository::assignment_log_repo::AssignmentLogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{
    format_date, format_timestamp, json_column, optional_date_column, optional_timestamp_column,
    to_json_text,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const ORDER_COLUMNS: &str = "order_id, weight, region, delivery_hours, cost, courier_id, assignment_date, complete_time";

// ==========================================
// OrderRepository - 订单仓储
// ==========================================
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量创建订单
    ///
    /// # 返回
    /// - `Ok(ids)`: 按输入顺序返回新分配的 order_id
    pub fn insert_batch(&self, orders: &[NewOrder]) -> RepositoryResult<Vec<i64>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let ids = Self::insert_in_tx(&tx, orders)?;
        tx.commit()?;
        Ok(ids)
    }

    /// 在调用方事务内批量写入订单（初始状态: 未分配、未完成）
    pub fn insert_in_tx(tx: &Transaction<'_>, orders: &[NewOrder]) -> RepositoryResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(orders.len());
        let mut stmt = tx.prepare(
            "INSERT INTO orders (weight, region, delivery_hours, cost) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for order in orders {
            stmt.execute(params![
                order.weight,
                order.region,
                to_json_text(&order.delivery_hours)?,
                order.cost,
            ])?;
            ids.push(tx.last_insert_rowid());
        }
        Ok(ids)
    }

    /// 按 ID 查询订单
    pub fn find_by_id(&self, order_id: i64) -> RepositoryResult<Option<Order>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM orders WHERE order_id = ?1", ORDER_COLUMNS);

        let order = conn
            .query_row(&sql, params![order_id], map_order_row)
            .optional()?;
        Ok(order)
    }

    /// 订单池：未分配且未完成（按 order_id 升序，排序由引擎负责）
    pub fn find_unassigned(&self) -> RepositoryResult<Vec<Order>> {
        self.query_orders(
            &format!(
                "SELECT {} FROM orders WHERE courier_id IS NULL AND complete_time IS NULL ORDER BY order_id",
                ORDER_COLUMNS
            ),
            params![],
        )
    }

    /// 配送员的配送中订单
    pub fn find_in_flight_by_courier(&self, courier_id: i64) -> RepositoryResult<Vec<Order>> {
        self.query_orders(
            &format!(
                "SELECT {} FROM orders WHERE courier_id = ?1 AND complete_time IS NULL ORDER BY order_id",
                ORDER_COLUMNS
            ),
            params![courier_id],
        )
    }

    /// 按派单日期查询（可按配送员过滤）
    pub fn find_by_assignment_date(
        &self,
        assignment_date: NaiveDate,
        courier_id: Option<i64>,
    ) -> RepositoryResult<Vec<Order>> {
        let date = format_date(assignment_date);
        match courier_id {
            Some(courier_id) => self.query_orders(
                &format!(
                    "SELECT {} FROM orders WHERE assignment_date = ?1 AND courier_id = ?2 ORDER BY order_id",
                    ORDER_COLUMNS
                ),
                params![date, courier_id],
            ),
            None => self.query_orders(
                &format!(
                    "SELECT {} FROM orders WHERE assignment_date = ?1 AND courier_id IS NOT NULL ORDER BY courier_id, order_id",
                    ORDER_COLUMNS
                ),
                params![date],
            ),
        }
    }

    /// 配送员在 [start, end] 内完成的订单
    pub fn find_completed_by_courier_in_range(
        &self,
        courier_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<Order>> {
        self.query_orders(
            &format!(
                r#"SELECT {} FROM orders
                   WHERE courier_id = ?1
                     AND complete_time IS NOT NULL
                     AND complete_time BETWEEN ?2 AND ?3
                   ORDER BY order_id"#,
                ORDER_COLUMNS
            ),
            params![courier_id, format_timestamp(start), format_timestamp(end)],
        )
    }

    /// 提交一次派单
    ///
    /// # 参数
    /// - `commits`: 引擎产出的派单提交
    /// - `log`: 派单执行记录（与订单更新同事务写入）
    ///
    /// # 返回
    /// - `Ok(count)`: 更新的订单数
    /// - `Err(ConcurrencyConflict)`: 某订单已被认领或已完成，全部回滚
    pub fn commit_assignments(
        &self,
        commits: &[AssignmentCommit],
        log: Option<&AssignmentLog>,
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"UPDATE orders
                   SET courier_id = ?1, assignment_date = ?2, cost = ?3
                   WHERE order_id = ?4
                     AND courier_id IS NULL
                     AND complete_time IS NULL"#,
            )?;

            for commit in commits {
                let affected = stmt.execute(params![
                    commit.courier_id,
                    format_date(commit.assignment_date),
                    commit.cost,
                    commit.order_id,
                ])?;

                if affected != 1 {
                    warn!(
                        order_id = commit.order_id,
                        courier_id = commit.courier_id,
                        "派单提交冲突，整体回滚"
                    );
                    return Err(RepositoryError::ConcurrencyConflict {
                        order_id: commit.order_id,
                    });
                }
            }
        }

        if let Some(log) = log {
            AssignmentLogRepository::insert_in_tx(&tx, log)?;
        }

        tx.commit()?;
        debug!(count = commits.len(), "派单提交完成");
        Ok(commits.len())
    }

    /// 标记订单完成
    ///
    /// 仅当订单分配给该配送员且尚未完成时生效
    ///
    /// # 返回
    /// - `Ok(true)`: 已标记
    /// - `Ok(false)`: 订单不存在、配送员不匹配或已完成
    pub fn mark_completed(
        &self,
        courier_id: i64,
        order_id: i64,
        complete_time: NaiveDateTime,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"UPDATE orders
               SET complete_time = ?1
               WHERE order_id = ?2
                 AND courier_id = ?3
                 AND complete_time IS NULL"#,
            params![format_timestamp(complete_time), order_id, courier_id],
        )?;
        Ok(affected == 1)
    }

    fn query_orders(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepositoryResult<Vec<Order>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let orders = stmt
            .query_map(params, map_order_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orders)
    }
}

fn map_order_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        order_id: row.get(0)?,
        weight: row.get(1)?,
        region: row.get(2)?,
        delivery_hours: json_column(row, 3)?,
        cost: row.get(4)?,
        courier_id: row.get(5)?,
        assignment_date: optional_date_column(row, 6)?,
        complete_time: optional_timestamp_column(row, 7)?,
    })
}
