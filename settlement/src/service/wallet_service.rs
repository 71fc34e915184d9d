use std::sync::Arc;

use common::constants::related_types;
use common::enums::{WalletChangeType, WalletStatus};
use common::utils::snowflake;
use common::{AppError, AppResult};
use orm::entities::{AppUserWallet, AppWalletTransaction};
use rbatis::executor::RBatisTxExecutorGuard;
use rbatis::rbdc::datetime::DateTime;
use rbatis::RBatis;
use rust_decimal::Decimal;

use super::begin_tx;
use super::ledger_store::LedgerStore;

/// 账变请求
///
/// balance / frozen 为两个口径上的带符号增量，
/// 累计字段按需随账变同事务更新
#[derive(Debug, Clone)]
pub struct ChangeReq {
    pub user_id: i64,
    pub change_type: WalletChangeType,

    // 可选字段（默认None）
    pub balance: Option<Decimal>,
    pub frozen: Option<Decimal>,
    pub total_recharge: Option<Decimal>,
    pub total_consume: Option<Decimal>,
    pub total_withdrawal: Option<Decimal>,
    pub related_id: Option<i64>,
    pub related_type: Option<String>,
    pub description: Option<String>,
    pub operator_id: Option<i64>,
    /// 钱包非正常状态时是否仍然放行（仅退款使用）
    pub allow_inactive: bool,
}

impl ChangeReq {
    pub fn new(user_id: i64, change_type: WalletChangeType) -> Self {
        Self {
            user_id,
            change_type,
            balance: None,
            frozen: None,
            total_recharge: None,
            total_consume: None,
            total_withdrawal: None,
            related_id: None,
            related_type: None,
            description: None,
            operator_id: None,
            allow_inactive: false,
        }
    }

    /// 余额增量
    pub fn balance(mut self, delta: Decimal) -> Self {
        self.balance = Some(delta);
        self
    }

    /// 冻结金额增量
    pub fn frozen(mut self, delta: Decimal) -> Self {
        self.frozen = Some(delta);
        self
    }

    pub fn total_recharge(mut self, delta: Decimal) -> Self {
        self.total_recharge = Some(delta);
        self
    }

    pub fn total_consume(mut self, delta: Decimal) -> Self {
        self.total_consume = Some(delta);
        self
    }

    pub fn total_withdrawal(mut self, delta: Decimal) -> Self {
        self.total_withdrawal = Some(delta);
        self
    }

    pub fn related(mut self, related_id: i64, related_type: impl Into<String>) -> Self {
        self.related_id = Some(related_id);
        self.related_type = Some(related_type.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn operator_id(mut self, operator_id: i64) -> Self {
        self.operator_id = Some(operator_id);
        self
    }

    /// 放开钱包状态检查
    ///
    /// 退款是还钱而非扣钱，源业务不校验钱包状态，此口子让这一事实
    /// 在调用点可见
    pub fn allow_inactive(mut self) -> Self {
        self.allow_inactive = true;
        self
    }
}

pub struct WalletService {
    rb: Arc<RBatis>,
}

impl WalletService {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }

    /// 余额变动（在事务中执行）
    ///
    /// 所有钱包写入的单一入口：锁行 -> 校验 -> 更新 -> 落一条流水。
    /// 两个并发账务对同一钱包串行执行，余额检查不会基于过期数据
    pub async fn apply_change(
        tx: &mut RBatisTxExecutorGuard,
        req: ChangeReq,
    ) -> AppResult<AppUserWallet> {
        let delta_balance = req.balance.unwrap_or(Decimal::ZERO);
        let delta_frozen = req.frozen.unwrap_or(Decimal::ZERO);
        if delta_balance == Decimal::ZERO && delta_frozen == Decimal::ZERO {
            return Err(AppError::ValidationError("账变金额不能为零".to_string()));
        }

        let mut wallet = LedgerStore::get_or_create_wallet(tx, req.user_id).await?;

        if !req.allow_inactive {
            let status = WalletStatus::from_code(wallet.status).ok_or_else(|| {
                AppError::InvalidState(format!("未知钱包状态: {}", wallet.status))
            })?;
            if !status.is_active() {
                return Err(AppError::WalletInactive(format!(
                    "user_id={} 状态={}",
                    req.user_id,
                    status.description()
                )));
            }
        }

        let balance_before = wallet.balance;
        let frozen_before = wallet.frozen_amount;

        let (new_balance, new_frozen) =
            checked_apply(balance_before, frozen_before, delta_balance, delta_frozen)?;
        wallet.balance = new_balance;
        wallet.frozen_amount = new_frozen;

        if let Some(delta) = req.total_recharge {
            wallet.total_recharge += delta;
        }
        if let Some(delta) = req.total_consume {
            wallet.total_consume += delta;
        }
        if let Some(delta) = req.total_withdrawal {
            wallet.total_withdrawal += delta;
        }
        wallet.update_time = Some(DateTime::now());

        let where_map = rbs::value! { "user_id": req.user_id };
        AppUserWallet::update_by_map(tx, &wallet, where_map).await?;

        let entry = AppWalletTransaction {
            id: None,
            serial_no: Some(snowflake::generate_id_string()),
            wallet_id: wallet.id.unwrap_or_default(),
            user_id: req.user_id,
            change_type: req.change_type.get_code(),
            change_type_name: Some(req.change_type.description()),
            amount: entry_amount(delta_balance, delta_frozen),
            balance_before,
            balance_after: wallet.balance,
            frozen_before,
            frozen_after: wallet.frozen_amount,
            related_id: req.related_id,
            related_type: req.related_type,
            description: req.description,
            operator_id: req.operator_id,
            create_time: Some(DateTime::now()),
        };
        LedgerStore::append_transaction(tx, &entry).await?;

        Ok(wallet)
    }

    /// 消费扣款
    pub async fn consume(
        &self,
        user_id: i64,
        amount: Decimal,
        related_id: i64,
        related_type: &str,
        description: &str,
    ) -> AppResult<AppUserWallet> {
        require_positive(amount)?;

        let mut tx = begin_tx(&self.rb).await?;
        let wallet = Self::consume_tx(&mut tx, user_id, amount, related_id, related_type, description).await?;
        tx.commit().await.map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(wallet)
    }

    /// 消费扣款（组合进调用方事务）
    pub async fn consume_tx(
        tx: &mut RBatisTxExecutorGuard,
        user_id: i64,
        amount: Decimal,
        related_id: i64,
        related_type: &str,
        description: &str,
    ) -> AppResult<AppUserWallet> {
        require_positive(amount)?;

        Self::apply_change(
            tx,
            ChangeReq::new(user_id, WalletChangeType::Consume)
                .balance(-amount)
                .total_consume(amount)
                .related(related_id, related_type)
                .description(description),
        )
        .await
    }

    /// 退款入账
    ///
    /// 无余额上限、无状态校验（与源业务保持一致）
    pub async fn refund(
        &self,
        user_id: i64,
        amount: Decimal,
        related_id: i64,
        related_type: &str,
        description: &str,
    ) -> AppResult<AppUserWallet> {
        require_positive(amount)?;

        let mut tx = begin_tx(&self.rb).await?;
        let wallet = Self::refund_tx(&mut tx, user_id, amount, related_id, related_type, description).await?;
        tx.commit().await.map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(wallet)
    }

    /// 退款入账（组合进调用方事务）
    pub async fn refund_tx(
        tx: &mut RBatisTxExecutorGuard,
        user_id: i64,
        amount: Decimal,
        related_id: i64,
        related_type: &str,
        description: &str,
    ) -> AppResult<AppUserWallet> {
        require_positive(amount)?;

        Self::apply_change(
            tx,
            ChangeReq::new(user_id, WalletChangeType::Refund)
                .balance(amount)
                .related(related_id, related_type)
                .description(description)
                .allow_inactive(),
        )
        .await
    }

    /// 申请冻结（提现等业务占用可用余额）
    pub async fn request_freeze(&self, user_id: i64, amount: Decimal) -> AppResult<AppUserWallet> {
        require_positive(amount)?;

        let mut tx = begin_tx(&self.rb).await?;
        let wallet = Self::apply_change(
            &mut tx,
            ChangeReq::new(user_id, WalletChangeType::Freeze)
                .frozen(amount)
                .description("余额冻结"),
        )
        .await?;
        tx.commit().await.map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(wallet)
    }

    /// 释放冻结
    pub async fn release_freeze(&self, user_id: i64, amount: Decimal) -> AppResult<AppUserWallet> {
        require_positive(amount)?;

        let mut tx = begin_tx(&self.rb).await?;
        let wallet = Self::apply_change(
            &mut tx,
            ChangeReq::new(user_id, WalletChangeType::Unfreeze)
                .frozen(-amount)
                .description("冻结释放"),
        )
        .await?;
        tx.commit().await.map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(wallet)
    }

    /// 后台人工调账，金额可正可负
    pub async fn adjust_balance(
        &self,
        user_id: i64,
        amount: Decimal,
        reason: &str,
        operator_id: i64,
    ) -> AppResult<AppUserWallet> {
        if amount == Decimal::ZERO {
            return Err(AppError::ValidationError("调账金额不能为零".to_string()));
        }

        let mut tx = begin_tx(&self.rb).await?;
        let wallet =
            Self::adjust_balance_tx(&mut tx, user_id, amount, reason, operator_id, None).await?;
        tx.commit().await.map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(wallet)
    }

    /// 调账（组合进调用方事务），related_id 用于关联触发调账的业务记录
    pub async fn adjust_balance_tx(
        tx: &mut RBatisTxExecutorGuard,
        user_id: i64,
        amount: Decimal,
        reason: &str,
        operator_id: i64,
        related_id: Option<i64>,
    ) -> AppResult<AppUserWallet> {
        if amount == Decimal::ZERO {
            return Err(AppError::ValidationError("调账金额不能为零".to_string()));
        }

        let mut req = ChangeReq::new(user_id, WalletChangeType::Adjustment)
            .balance(amount)
            .description(reason)
            .operator_id(operator_id);
        if amount > Decimal::ZERO {
            req = req.total_recharge(amount);
        }
        if let Some(rid) = related_id {
            req = req.related(rid, related_types::PROFIT_SHARING);
        }

        Self::apply_change(tx, req).await
    }

    /// 查询钱包（只读，不存在时返回 NotFound）
    pub async fn get_wallet(&self, user_id: i64) -> AppResult<AppUserWallet> {
        AppUserWallet::select_by_user_id(self.rb.as_ref(), user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("钱包不存在: user_id={}", user_id)))
    }
}

/// 校验并应用两个口径的增量
///
/// 后像必须同时满足 balance >= 0、frozen >= 0、balance - frozen >= 0
fn checked_apply(
    balance: Decimal,
    frozen: Decimal,
    delta_balance: Decimal,
    delta_frozen: Decimal,
) -> AppResult<(Decimal, Decimal)> {
    let new_balance = balance + delta_balance;
    let new_frozen = frozen + delta_frozen;

    if new_frozen < Decimal::ZERO {
        return Err(AppError::InvalidState(format!(
            "冻结金额不足: 冻结 {} 变动 {}",
            frozen, delta_frozen
        )));
    }
    if new_balance < Decimal::ZERO || new_balance - new_frozen < Decimal::ZERO {
        return Err(AppError::InsufficientBalance(format!(
            "可用余额不足: 余额 {} 冻结 {} 变动 {}/{}",
            balance, frozen, delta_balance, delta_frozen
        )));
    }

    Ok((new_balance, new_frozen))
}

/// 流水金额：记录账变对可用余额的影响
///
/// 余额口径有变动时取余额增量，纯冻结腾挪时取冻结增量的相反数
/// （冻结使可用减少，解冻使可用增加）
fn entry_amount(delta_balance: Decimal, delta_frozen: Decimal) -> Decimal {
    if delta_balance != Decimal::ZERO {
        delta_balance
    } else {
        -delta_frozen
    }
}

fn require_positive(amount: Decimal) -> AppResult<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::ValidationError(format!(
            "金额必须为正数: {}",
            amount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_consume_deltas() {
        // 余额 1000 冻结 0，消费 300 -> 余额 700
        let (balance, frozen) = checked_apply(d(1000), d(0), d(-300), d(0)).unwrap();
        assert_eq!(balance, d(700));
        assert_eq!(frozen, d(0));
        assert_eq!(entry_amount(d(-300), d(0)), d(-300));
    }

    #[test]
    fn test_consume_insufficient_available() {
        // 冻结占用后可用不足，禁止基于总余额放行
        let err = checked_apply(d(1000), d(800), d(-300), d(0)).unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance(_)));
    }

    #[test]
    fn test_freeze_and_withdrawal_flow() {
        // 余额 1000 申请提现 200：冻结 200，可用 800
        let (balance, frozen) = checked_apply(d(1000), d(0), d(0), d(200)).unwrap();
        assert_eq!((balance, frozen), (d(1000), d(200)));
        assert_eq!(entry_amount(d(0), d(200)), d(-200));

        // 审核通过：扣余额并释放冻结 -> 余额 800 冻结 0
        let (balance, frozen) = checked_apply(d(1000), d(200), d(-200), d(-200)).unwrap();
        assert_eq!((balance, frozen), (d(800), d(0)));
        assert_eq!(entry_amount(d(-200), d(-200)), d(-200));

        // 驳回：仅释放冻结 -> 余额 1000 冻结 0，流水 +200
        let (balance, frozen) = checked_apply(d(1000), d(200), d(0), d(-200)).unwrap();
        assert_eq!((balance, frozen), (d(1000), d(0)));
        assert_eq!(entry_amount(d(0), d(-200)), d(200));
    }

    #[test]
    fn test_freeze_exceeding_available() {
        let err = checked_apply(d(1000), d(900), d(0), d(200)).unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance(_)));
    }

    #[test]
    fn test_release_exceeding_frozen() {
        let err = checked_apply(d(1000), d(100), d(0), d(-200)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn test_negative_adjustment_guard() {
        let err = checked_apply(d(100), d(0), d(-200), d(0)).unwrap_err();
        assert!(matches!(err, AppError::InsufficientBalance(_)));

        let (balance, _) = checked_apply(d(100), d(0), d(-100), d(0)).unwrap();
        assert_eq!(balance, d(0));
    }

    #[test]
    fn test_change_req_builder() {
        let req = ChangeReq::new(7, WalletChangeType::Consume)
            .balance(d(-30))
            .total_consume(d(30))
            .related(99, "order")
            .description("租车订单支付");
        assert_eq!(req.user_id, 7);
        assert_eq!(req.balance, Some(d(-30)));
        assert_eq!(req.frozen, None);
        assert_eq!(req.related_type.as_deref(), Some("order"));
        assert!(!req.allow_inactive);
        assert!(req.operator_id.is_none());
    }
}
