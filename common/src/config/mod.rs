// 配置模块
pub mod app_config;
pub mod db_conf;

pub use app_config::{AppConfig, DatabaseConfig, LogConfig, ProfitSharingConfig, WithdrawalConfig};
pub use db_conf::DbConfig;
