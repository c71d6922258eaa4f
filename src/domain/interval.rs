// ==========================================
// 配送派单系统 - 时间区间与日期解析
// ==========================================
// 格式: 区间 "HH:MM-HH:MM"，日期 "YYYY-MM-DD"
// 红线: 区间解析失败必须向上传播，不允许静默跳过
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// 日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 区间端点格式
pub const HOUR_FORMAT: &str = "%H:%M";

/// 时间戳存储格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// TimeInterval - 锚定到派单日期的时间区间 [start, end)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeInterval {
    /// 将 "HH:MM-HH:MM" 解析为锚定到 `date` 的区间
    ///
    /// # 错误
    /// - 分段数量不是 2
    /// - 端点不是合法的 HH:MM
    /// - 结束时间不晚于开始时间（不支持跨午夜）
    pub fn parse(raw: &str, date: NaiveDate) -> DomainResult<Self> {
        let (start, end) = parse_hours(raw)?;
        Ok(Self {
            start: date.and_time(start),
            end: date.and_time(end),
        })
    }

    /// 批量解析，任一失败则整体失败
    pub fn parse_all<S: AsRef<str>>(raws: &[S], date: NaiveDate) -> DomainResult<Vec<Self>> {
        raws.iter().map(|raw| Self::parse(raw.as_ref(), date)).collect()
    }
}

/// 解析 "HH:MM-HH:MM" 为 (开始, 结束) 两个时刻
pub fn parse_hours(raw: &str) -> DomainResult<(NaiveTime, NaiveTime)> {
    let invalid = |reason: &str| DomainError::InvalidTimeInterval {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = raw.trim().split('-').collect();
    if parts.len() != 2 {
        return Err(invalid("期望格式 HH:MM-HH:MM"));
    }

    let start = NaiveTime::parse_from_str(parts[0].trim(), HOUR_FORMAT)
        .map_err(|_| invalid("开始时间不是合法的 HH:MM"))?;
    let end = NaiveTime::parse_from_str(parts[1].trim(), HOUR_FORMAT)
        .map_err(|_| invalid("结束时间不是合法的 HH:MM"))?;

    if end <= start {
        return Err(invalid("结束时间必须晚于开始时间"));
    }

    Ok((start, end))
}

// ==========================================
// 日期/时间戳解析
// ==========================================

/// 严格解析 YYYY-MM-DD
pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(raw.to_string()))
}

/// 解析派单日期：缺失或无法解析时回退到 `fallback`
pub fn resolve_assignment_date(raw: Option<&str>, fallback: NaiveDate) -> NaiveDate {
    match raw.map(parse_date) {
        Some(Ok(date)) => date,
        Some(Err(e)) => {
            tracing::warn!(error = %e, fallback = %fallback, "派单日期无法解析，回退到默认日期");
            fallback
        }
        None => fallback,
    }
}

/// 解析完成时间
///
/// 支持: RFC3339（转换为 UTC）、`YYYY-MM-DDTHH:MM:SS[.f]`、`YYYY-MM-DD HH:MM:SS`
pub fn parse_timestamp(raw: &str) -> DomainResult<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", TIMESTAMP_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| DomainError::InvalidTimestamp(raw.to_string()))
}
