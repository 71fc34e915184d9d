use std::sync::Arc;

use common::config::WithdrawalConfig;
use common::constants::related_types;
use common::enums::{WalletChangeType, WithdrawalMethod, WithdrawalStatus};
use common::utils::order_no_util;
use common::{AppError, AppResult};
use orm::entities::AppWithdrawalRecord;
use rbatis::executor::RBatisTxExecutorGuard;
use rbatis::rbdc::datetime::DateTime;
use rbatis::RBatis;
use rust_decimal::{Decimal, RoundingStrategy};

use super::begin_tx;
use super::ledger_store::LedgerStore;
use super::wallet_service::{ChangeReq, WalletService};

/// 提现收款账户信息
#[derive(Debug, Clone)]
pub struct WithdrawalAccount {
    pub account_no: String,
    pub account_name: String,
    /// 银行卡提现时的开户行
    pub bank_name: Option<String>,
}

/// 提现工作流
///
/// 申请 -> 冻结 -> 后台审核 -> 打款完成 | 驳回解冻。
/// 终态记录不可再次审核，重复处理直接报非法状态
pub struct WithdrawalService {
    rb: Arc<RBatis>,
    config: WithdrawalConfig,
}

impl WithdrawalService {
    pub fn new(rb: Arc<RBatis>, config: WithdrawalConfig) -> Self {
        Self { rb, config }
    }

    /// 发起提现申请
    ///
    /// 申请金额整体冻结；手续费在审核通过后从申请金额中扣除
    pub async fn request_withdrawal(
        &self,
        user_id: i64,
        amount: Decimal,
        method: WithdrawalMethod,
        account: WithdrawalAccount,
    ) -> AppResult<AppWithdrawalRecord> {
        if amount < self.config.min_amount {
            return Err(AppError::ValidationError(format!(
                "提现金额不得低于 {}",
                self.config.min_amount
            )));
        }
        let (fee, actual_amount) = split_fee(amount, self.config.fee_rate);
        if actual_amount <= Decimal::ZERO {
            return Err(AppError::ValidationError("扣除手续费后到账金额为零".to_string()));
        }

        let mut tx = begin_tx(&self.rb).await?;

        // 锁定钱包行，后续冻结在同一把行锁下完成可用余额校验
        let wallet = LedgerStore::get_or_create_wallet(&mut tx, user_id).await?;

        let withdrawal_no = self.generate_unique_no(&mut tx).await?;
        let now = DateTime::now();
        let record = AppWithdrawalRecord {
            id: None,
            withdrawal_no: withdrawal_no.clone(),
            user_id,
            wallet_id: wallet.id.unwrap_or_default(),
            amount,
            fee,
            actual_amount,
            method: method.get_code(),
            account_no: Some(account.account_no),
            account_name: Some(account.account_name),
            bank_name: account.bank_name,
            status: WithdrawalStatus::Pending.get_code(),
            reviewer_id: None,
            reject_reason: None,
            apply_time: Some(now.clone()),
            review_time: None,
            complete_time: None,
            create_time: Some(now.clone()),
            update_time: Some(now),
        };
        AppWithdrawalRecord::insert(&mut tx, &record).await?;

        // 回读取回主键
        let record = AppWithdrawalRecord::select_by_withdrawal_no(&mut tx, &withdrawal_no)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(format!("提现单创建后读取失败: {}", withdrawal_no))
            })?;

        // 冻结申请金额，可用不足时整个申请回滚
        WalletService::apply_change(
            &mut tx,
            ChangeReq::new(user_id, WalletChangeType::Freeze)
                .frozen(amount)
                .related(record.id.unwrap_or_default(), related_types::WITHDRAWAL)
                .description(format!("提现申请冻结 单号{}", withdrawal_no)),
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!(
            "提现申请已受理: user_id={} no={} 金额={} 手续费={}",
            user_id,
            withdrawal_no,
            amount,
            fee
        );
        Ok(record)
    }

    /// 审核提现申请
    ///
    /// 通过：扣减余额、释放冻结、累计提现、落一条提现流水；
    /// 驳回：仅释放冻结，余额不动，驳回原因必填。
    /// 两个分支都是终态，非待审核记录一律拒绝处理
    pub async fn process_withdrawal(
        &self,
        withdrawal_id: i64,
        approved: bool,
        reviewer_id: i64,
        reject_reason: Option<&str>,
    ) -> AppResult<AppWithdrawalRecord> {
        let mut tx = begin_tx(&self.rb).await?;

        let mut record = AppWithdrawalRecord::select_by_id_for_update(&mut tx, withdrawal_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("提现单不存在: id={}", withdrawal_id)))?;

        let status = WithdrawalStatus::from_code(record.status)
            .ok_or_else(|| AppError::InvalidState(format!("未知提现状态: {}", record.status)))?;
        if !status.can_review() {
            return Err(AppError::InvalidState(format!(
                "提现单 {} 当前状态为 {}，不可审核",
                record.withdrawal_no,
                status.description()
            )));
        }

        let now = DateTime::now();
        if approved {
            WalletService::apply_change(
                &mut tx,
                ChangeReq::new(record.user_id, WalletChangeType::Withdrawal)
                    .balance(-record.amount)
                    .frozen(-record.amount)
                    .total_withdrawal(record.amount)
                    .related(record.id.unwrap_or_default(), related_types::WITHDRAWAL)
                    .description(format!("提现 单号{}", record.withdrawal_no))
                    .operator_id(reviewer_id),
            )
            .await?;

            record.status = WithdrawalStatus::Completed.get_code();
            record.review_time = Some(now.clone());
            record.complete_time = Some(now.clone());
        } else {
            let reason = reject_reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| AppError::ValidationError("驳回原因不能为空".to_string()))?;

            WalletService::apply_change(
                &mut tx,
                ChangeReq::new(record.user_id, WalletChangeType::Unfreeze)
                    .frozen(-record.amount)
                    .related(record.id.unwrap_or_default(), related_types::WITHDRAWAL)
                    .description(format!("提现驳回解冻 单号{}", record.withdrawal_no))
                    .operator_id(reviewer_id),
            )
            .await?;

            record.status = WithdrawalStatus::Rejected.get_code();
            record.reject_reason = Some(reason.to_string());
            record.review_time = Some(now.clone());
        }
        record.reviewer_id = Some(reviewer_id);
        record.update_time = Some(now);

        let where_map = rbs::value! { "id": withdrawal_id };
        AppWithdrawalRecord::update_by_map(&mut tx, &record, where_map).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!(
            "提现单 {} 审核完成: {}",
            record.withdrawal_no,
            if approved { "通过" } else { "驳回" }
        );
        Ok(record)
    }

    /// 生成唯一提现单号，碰撞时有限次重试
    async fn generate_unique_no(&self, tx: &mut RBatisTxExecutorGuard) -> AppResult<String> {
        for _ in 0..self.config.max_no_attempts {
            let no = order_no_util::generate_withdrawal_no();
            if AppWithdrawalRecord::select_by_withdrawal_no(tx, &no)
                .await?
                .is_none()
            {
                return Ok(no);
            }
        }
        Err(AppError::InternalServerError(
            "提现单号生成失败，重试次数耗尽".to_string(),
        ))
    }
}

/// 拆分手续费与到账金额
///
/// 手续费四舍五入到分
fn split_fee(amount: Decimal, fee_rate: Decimal) -> (Decimal, Decimal) {
    let fee = (amount * fee_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    (fee, amount - fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fee() {
        let (fee, actual) = split_fee(Decimal::from(1000), Decimal::new(6, 3));
        assert_eq!(fee, Decimal::from(6));
        assert_eq!(actual, Decimal::from(994));
    }

    #[test]
    fn test_split_fee_rounding() {
        // 123.45 * 0.006 = 0.7407 -> 0.74
        let (fee, actual) = split_fee(Decimal::new(12345, 2), Decimal::new(6, 3));
        assert_eq!(fee, Decimal::new(74, 2));
        assert_eq!(actual, Decimal::new(12271, 2));
    }

    #[test]
    fn test_split_fee_zero_rate() {
        let (fee, actual) = split_fee(Decimal::from(200), Decimal::ZERO);
        assert_eq!(fee, Decimal::ZERO);
        assert_eq!(actual, Decimal::from(200));
    }
}
