pub mod ledger_store;
pub mod wallet_service;
pub mod withdrawal_service;
pub mod points_service;
pub mod crowdfunding_service;
pub mod profit_sharing_service;

use common::{AppError, AppResult};
use rbatis::executor::RBatisTxExecutorGuard;
use rbatis::RBatis;

/// 开启一个带自动回滚保护的事务
///
/// 守卫在未显式 commit 时于 drop 处回滚，保证错误路径不残留半截账
pub(crate) async fn begin_tx(rb: &RBatis) -> AppResult<RBatisTxExecutorGuard> {
    let tx = rb
        .acquire_begin()
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .defer_async(|mut tx| async move {
            if !tx.done() {
                let _ = tx.rollback().await;
                log::warn!("事务未提交，已自动回滚");
            }
        });
    Ok(tx)
}
