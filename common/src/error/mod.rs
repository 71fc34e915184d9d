// 错误处理模块
use thiserror::Error;

/// 统一业务错误
///
/// 校验类、状态类错误同步抛给调用方，由事务回滚保证不落账；
/// 定时任务内单条记录的失败由任务自行捕获记录，不向上传播。
#[derive(Error, Debug)]
pub enum AppError {
    #[error("余额不足: {0}")]
    InsufficientBalance(String),

    #[error("积分不足: {0}")]
    InsufficientPoints(String),

    #[error("钱包不可用: {0}")]
    WalletInactive(String),

    #[error("积分账户不可用: {0}")]
    AccountInactive(String),

    #[error("非法状态流转: {0}")]
    InvalidState(String),

    #[error("该期分润已计算: {0}")]
    AlreadyCalculated(String),

    #[error("记录不存在: {0}")]
    NotFound(String),

    #[error("参数校验失败: {0}")]
    ValidationError(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("业务错误: {0}")]
    BusinessError(String),

    #[error("内部服务器错误: {0}")]
    InternalServerError(String),
}

pub type AppResult<T> = Result<T, AppError>;

// 从 rbatis 错误转换 (rbatis::Error 包含了 rbdc::Error)
impl From<rbatis::Error> for AppError {
    fn from(err: rbatis::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}
