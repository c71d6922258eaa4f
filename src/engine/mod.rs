// ==========================================
// 配送派单系统 - 引擎层
// ==========================================
// 职责: 实现派单业务规则,不拼 SQL
// 红线: Engine 不拼 SQL, 所有拒绝必须输出 reason
// ==========================================

pub mod capacity_policy;
pub mod courier_rating;
pub mod error;
pub mod interval_overlap;
pub mod planner;
pub mod pricing;

// 重导出核心引擎
pub use capacity_policy::{AssignmentAttempt, CapacityDecision, CapacityEvaluator, CapacityRejection};
pub use courier_rating::{CourierRatingEngine, RatingCoefficients};
pub use error::AssignmentError;
pub use interval_overlap::{find_overlap, OverlapCase};
pub use planner::{AssignmentPass, AssignmentPlanner};
pub use pricing::{final_cost, NEW_REGION_COEFFICIENT, SERVED_REGION_COEFFICIENT};
