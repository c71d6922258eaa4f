// ==========================================
// 配送派单系统 - 引擎层错误类型
// ==========================================
// 说明: 时间段解析失败对整次派单是致命的，必须向上传播
// ==========================================

use crate::domain::error::DomainError;
use thiserror::Error;

/// 派单引擎错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssignmentError {
    #[error("订单配送时间段无效 (order_id={order_id}): {source}")]
    InvalidDeliveryHours { order_id: i64, source: DomainError },

    #[error("配送员工作时间段无效 (courier_id={courier_id}): {source}")]
    InvalidWorkingHours { courier_id: i64, source: DomainError },
}
