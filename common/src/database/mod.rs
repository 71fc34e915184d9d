// 数据库连接模块
//
// 此模块重新导出配置模块中的数据库功能

pub use crate::config::db_conf::{get_db, init_db, test_connection, DbConfig};
