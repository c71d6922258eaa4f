// ==========================================
// 配送派单系统 - 派单执行记录仓储
// ==========================================
// 红线: 记录只追加，不更新不删除
// 说明: 写入发生在派单提交事务内（insert_in_tx）
// ==========================================

use crate::domain::assignment::AssignmentLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_codec::{date_column, format_date, format_timestamp, timestamp_column};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Transaction};
use std::sync::{Arc, Mutex};

pub struct AssignmentLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在调用方事务内写入一条记录
    pub fn insert_in_tx(tx: &Transaction<'_>, log: &AssignmentLog) -> RepositoryResult<()> {
        tx.execute(
            r#"INSERT INTO assignment_log (
                    pass_id, assignment_date, assigned_count, courier_count, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![
                &log.pass_id,
                format_date(log.assignment_date),
                log.assigned_count as i64,
                log.courier_count as i64,
                format_timestamp(log.created_at),
            ],
        )?;
        Ok(())
    }

    /// 按派单日期查询（按创建时间升序）
    pub fn list_by_date(&self, assignment_date: NaiveDate) -> RepositoryResult<Vec<AssignmentLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT pass_id, assignment_date, assigned_count, courier_count, created_at
            FROM assignment_log
            WHERE assignment_date = ?1
            ORDER BY created_at, pass_id
            "#,
        )?;
        let logs = stmt
            .query_map(params![format_date(assignment_date)], |row| {
                Ok(AssignmentLog {
                    pass_id: row.get(0)?,
                    assignment_date: date_column(row, 1)?,
                    assigned_count: row.get::<_, i64>(2)? as usize,
                    courier_count: row.get::<_, i64>(3)? as usize,
                    created_at: timestamp_column(row, 4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }
}
