// ==========================================
// 配送派单系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod assignment_log_repo;
pub mod courier_repo;
pub mod error;
pub mod import_repo;
pub mod order_repo;
pub mod row_codec;

// 重导出核心仓储
pub use assignment_log_repo::AssignmentLogRepository;
pub use courier_repo::CourierRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use import_repo::ImportRepository;
pub use order_repo::OrderRepository;
