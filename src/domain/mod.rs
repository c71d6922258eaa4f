// ==========================================
// 配送派单系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、输入校验
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod capacity;
pub mod courier;
pub mod error;
pub mod interval;
pub mod order;
pub mod types;

// 重导出核心类型
pub use assignment::{
    AssignedOrder, AssignmentCommit, AssignmentLog, AssignmentResult, CourierAssignment,
    CourierMetaInfo, OrderGroup, GROUP_ORDER_ID,
};
pub use capacity::{CapacityPolicy, CapacityPolicyTable};
pub use courier::{Courier, NewCourier};
pub use error::{DomainError, DomainResult};
pub use interval::TimeInterval;
pub use order::{CompleteInfo, NewOrder, Order};
pub use types::CourierType;
