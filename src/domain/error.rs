// ==========================================
// 配送派单系统 - 领域层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 领域层错误均为输入校验错误，对整次派单是致命的
// ==========================================

use thiserror::Error;

/// 领域层输入校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("无效的时间区间: '{raw}' ({reason})")]
    InvalidTimeInterval { raw: String, reason: String },

    #[error("无效的日期: '{0}'，期望格式 YYYY-MM-DD")]
    InvalidDate(String),

    #[error("无效的时间戳: '{0}'")]
    InvalidTimestamp(String),

    #[error("未知的配送员类型: {0}")]
    UnknownCourierType(String),

    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

/// Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
