// ==========================================
// 配送派单系统 - 领域类型定义
// ==========================================
// 依据: 派单规则 - 配送员类型决定容量策略行
// ==========================================

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 配送员类型 (Courier Type)
// ==========================================
// 创建后不可变更
// 顺序: Foot < Bike < Auto（即派单时的类型处理优先级）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourierType {
    Foot, // 步行
    Bike, // 骑行
    Auto, // 汽车
}

impl CourierType {
    /// 派单时的类型处理顺序
    pub const PRIORITY_ORDER: [CourierType; 3] =
        [CourierType::Foot, CourierType::Bike, CourierType::Auto];

    /// 数据库/接口使用的字符串编码
    pub fn as_str(&self) -> &'static str {
        match self {
            CourierType::Foot => "FOOT",
            CourierType::Bike => "BIKE",
            CourierType::Auto => "AUTO",
        }
    }
}

impl fmt::Display for CourierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CourierType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FOOT" => Ok(CourierType::Foot),
            "BIKE" => Ok(CourierType::Bike),
            "AUTO" => Ok(CourierType::Auto),
            other => Err(DomainError::UnknownCourierType(other.to_string())),
        }
    }
}
