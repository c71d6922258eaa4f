// ==========================================
// 配送派单系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接与API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AssignmentApi, CourierApi, ImportApi, OrderApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{
    AssignmentLogRepository, CourierRepository, ImportRepository, OrderRepository,
};

/// 应用状态
///
/// 所有仓储共享同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 派单API
    pub assignment_api: Arc<AssignmentApi<ConfigManager>>,

    /// 配送员API
    pub courier_api: Arc<CourierApi<ConfigManager>>,

    /// 订单API
    pub order_api: Arc<OrderApi>,

    /// 批量导入API
    pub import_api: Arc<ImportApi>,

    /// 派单执行记录仓储
    pub assignment_log_repo: Arc<AssignmentLogRepository>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let courier_repo = Arc::new(CourierRepository::new(conn.clone()));
        let order_repo = Arc::new(OrderRepository::new(conn.clone()));
        let assignment_log_repo = Arc::new(AssignmentLogRepository::new(conn.clone()));
        let import_repo = Arc::new(ImportRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let assignment_api = Arc::new(AssignmentApi::new(
            courier_repo.clone(),
            order_repo.clone(),
            config_manager.clone(),
        ));
        let courier_api = Arc::new(CourierApi::new(
            courier_repo,
            order_repo.clone(),
            config_manager.clone(),
        ));
        let order_api = Arc::new(OrderApi::new(order_repo));
        let import_api = Arc::new(ImportApi::new(import_repo));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            assignment_api,
            courier_api,
            order_api,
            import_api,
            assignment_log_repo,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 COURIER_DISPATCH_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("COURIER_DISPATCH_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./courier_dispatch.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("courier-dispatch");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("courier_dispatch.db");
        }
    }

    path.to_string_lossy().to_string()
}
