// ==========================================
// 配送派单系统 - 派单配置读取 Trait
// ==========================================
// 职责: 定义派单/统计所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::capacity::CapacityPolicyTable;
use crate::domain::types::CourierType;
use std::error::Error;

// ==========================================
// DispatchConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait DispatchConfigReader: Send + Sync {
    /// 获取容量策略表
    ///
    /// # 默认值
    /// - FOOT 2/10/1/25/10, BIKE 4/20/2/12/8, AUTO 7/40/4/8/4
    fn get_capacity_policy_table(&self) -> Result<CapacityPolicyTable, Box<dyn Error>>;

    /// 获取评分系数
    ///
    /// # 默认值
    /// - FOOT 3, BIKE 2, AUTO 1
    fn get_rating_coefficient(&self, courier_type: CourierType) -> Result<f64, Box<dyn Error>>;

    /// 获取收入系数
    ///
    /// # 默认值
    /// - FOOT 2, BIKE 3, AUTO 4
    fn get_earnings_coefficient(&self, courier_type: CourierType) -> Result<f64, Box<dyn Error>>;
}
