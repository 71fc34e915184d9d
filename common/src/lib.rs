// 公共模块
// 提供数据库、日志、错误处理、枚举等通用功能

pub mod config;
pub mod database;
pub mod error;
pub mod logger;
pub mod enums;
pub mod constants;
pub mod utils;

// 重新导出常用类型和函数
pub use error::{AppError, AppResult};
pub use config::{AppConfig, DbConfig};
pub use logger::{init_logger, init_logger_with_level};

// 数据库相关
pub use database::{init_db, get_db, test_connection as test_db_connection};

/// 初始化公共模块
///
/// 这个函数可以用来初始化日志系统
pub fn init() {
    logger::init_logger();
    log::info!("公共模块初始化完成");
}
