// ==========================================
// 配送派单系统 - 配送员数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: Courier.orders 由 orders 表反查（分配给该配送员的全部订单）
// ==========================================

use crate::domain::courier::{Courier, NewCourier};
use crate::domain::types::CourierType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{json_column, to_json_text};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// CourierRepository - 配送员仓储
// ==========================================
pub struct CourierRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CourierRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量创建配送员
    ///
    /// # 返回
    /// - `Ok(ids)`: 按输入顺序返回新分配的 courier_id
    pub fn insert_batch(&self, couriers: &[NewCourier]) -> RepositoryResult<Vec<i64>> {
        if couriers.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let ids = Self::insert_in_tx(&tx, couriers)?;
        tx.commit()?;
        Ok(ids)
    }

    /// 在调用方事务内批量写入配送员
    pub fn insert_in_tx(tx: &Transaction<'_>, couriers: &[NewCourier]) -> RepositoryResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(couriers.len());
        let mut stmt = tx.prepare(
            "INSERT INTO courier (courier_type, regions, working_hours) VALUES (?1, ?2, ?3)",
        )?;

        for courier in couriers {
            stmt.execute(params![
                courier.courier_type.as_str(),
                to_json_text(&courier.regions)?,
                to_json_text(&courier.working_hours)?,
            ])?;
            ids.push(tx.last_insert_rowid());
        }
        Ok(ids)
    }

    /// 按 ID 查询配送员（含已分配订单列表）
    pub fn find_by_id(&self, courier_id: i64) -> RepositoryResult<Option<Courier>> {
        let conn = self.get_conn()?;

        let courier = conn
            .query_row(
                "SELECT courier_id, courier_type, regions, working_hours FROM courier WHERE courier_id = ?1",
                params![courier_id],
                map_courier_row,
            )
            .optional()?;

        match courier {
            Some(mut courier) => {
                courier.orders = load_order_ids(&conn, courier.courier_id)?;
                Ok(Some(courier))
            }
            None => Ok(None),
        }
    }

    /// 查询全部配送员（按 courier_id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Courier>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT courier_id, courier_type, regions, working_hours FROM courier ORDER BY courier_id",
        )?;
        let couriers = stmt
            .query_map([], map_courier_row)?
            .collect::<Result<Vec<_>, _>>()?;

        attach_order_ids(&conn, couriers)
    }

    /// 查询某类型中配送中订单数严格小于上限的配送员（按 courier_id 升序）
    ///
    /// 没有任何订单的配送员同样有资格
    pub fn find_eligible_by_type(
        &self,
        courier_type: CourierType,
        max_in_flight: usize,
    ) -> RepositoryResult<Vec<Courier>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT c.courier_id, c.courier_type, c.regions, c.working_hours
            FROM courier c
            WHERE c.courier_type = ?1
              AND (
                SELECT COUNT(*) FROM orders o
                WHERE o.courier_id = c.courier_id AND o.complete_time IS NULL
              ) < ?2
            ORDER BY c.courier_id
            "#,
        )?;
        let couriers = stmt
            .query_map(params![courier_type.as_str(), max_in_flight as i64], map_courier_row)?
            .collect::<Result<Vec<_>, _>>()?;

        attach_order_ids(&conn, couriers)
    }
}

fn map_courier_row(row: &Row<'_>) -> rusqlite::Result<Courier> {
    let raw_type: String = row.get(1)?;
    let courier_type = CourierType::from_str(&raw_type).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Courier {
        courier_id: row.get(0)?,
        courier_type,
        regions: json_column(row, 2)?,
        working_hours: json_column(row, 3)?,
        orders: Vec::new(),
    })
}

fn load_order_ids(conn: &Connection, courier_id: i64) -> RepositoryResult<Vec<i64>> {
    let mut stmt =
        conn.prepare("SELECT order_id FROM orders WHERE courier_id = ?1 ORDER BY order_id")?;
    let ids = stmt
        .query_map(params![courier_id], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn attach_order_ids(conn: &Connection, couriers: Vec<Courier>) -> RepositoryResult<Vec<Courier>> {
    couriers
        .into_iter()
        .map(|mut courier| {
            courier.orders = load_order_ids(conn, courier.courier_id)?;
            Ok(courier)
        })
        .collect()
}
