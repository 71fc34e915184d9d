use common::enums::{WalletChangeType, WalletStatus};
use common::{AppError, AppResult};
use orm::entities::{AppUserWallet, AppWalletTransaction};
use rbatis::executor::RBatisTxExecutorGuard;
use rbatis::rbdc::datetime::DateTime;
use rbatis::RBatis;
use rust_decimal::Decimal;

/// 账本存储
///
/// 钱包行的加锁读取与流水的追加写入。钱包余额的任何写入都必须经过
/// WalletService 并在同一事务内通过这里落一条流水
pub struct LedgerStore;

impl LedgerStore {
    /// 锁定读取钱包，不存在则惰性创建
    ///
    /// select ... for update 保证同一钱包的并发账务串行化；
    /// 返回的行在当前事务内始终持有行锁
    pub async fn get_or_create_wallet(
        tx: &mut RBatisTxExecutorGuard,
        user_id: i64,
    ) -> AppResult<AppUserWallet> {
        if let Some(wallet) = AppUserWallet::select_by_user_id_for_update(tx, user_id).await? {
            return Ok(wallet);
        }

        let now = DateTime::now();
        let wallet = AppUserWallet {
            id: None,
            user_id,
            balance: Decimal::ZERO,
            frozen_amount: Decimal::ZERO,
            total_recharge: Decimal::ZERO,
            total_consume: Decimal::ZERO,
            total_withdrawal: Decimal::ZERO,
            status: WalletStatus::Active.get_code(),
            create_time: Some(now.clone()),
            update_time: Some(now),
        };
        AppUserWallet::insert(tx, &wallet).await?;

        // 回读取回数据库生成的主键，并让当前事务持有行锁
        AppUserWallet::select_by_user_id_for_update(tx, user_id)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(format!("钱包创建后读取失败: user_id={}", user_id))
            })
    }

    /// 追加一条账变流水
    pub async fn append_transaction(
        tx: &mut RBatisTxExecutorGuard,
        entry: &AppWalletTransaction,
    ) -> AppResult<()> {
        AppWalletTransaction::insert(tx, entry).await?;
        Ok(())
    }

    /// 按余额口径回放流水
    ///
    /// 冻结/解冻不改变余额本身，回放时跳过
    pub fn replay_balance(entries: &[AppWalletTransaction]) -> Decimal {
        entries
            .iter()
            .filter(|e| Self::entry_affects_balance(e))
            .map(|e| e.amount)
            .sum()
    }

    /// 校验流水链
    ///
    /// 余额口径下 balance_after(n) = balance_after(n-1) + amount，首条从零起算
    pub fn verify_chain(entries: &[AppWalletTransaction]) -> bool {
        let mut prev = Decimal::ZERO;
        for entry in entries.iter().filter(|e| Self::entry_affects_balance(e)) {
            if entry.balance_after != prev + entry.amount {
                return false;
            }
            prev = entry.balance_after;
        }
        true
    }

    /// 对账：校验某用户钱包与其全部流水
    pub async fn verify_wallet_ledger(rb: &RBatis, user_id: i64) -> AppResult<bool> {
        let wallet = AppUserWallet::select_by_user_id(rb, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("钱包不存在: user_id={}", user_id)))?;
        let entries = AppWalletTransaction::select_by_user_id(rb, user_id).await?;

        Ok(Self::verify_chain(&entries) && Self::replay_balance(&entries) == wallet.balance)
    }

    fn entry_affects_balance(entry: &AppWalletTransaction) -> bool {
        WalletChangeType::from_code(entry.change_type)
            .map(|t| t.affects_balance())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        change_type: WalletChangeType,
        amount: i64,
        balance_after: i64,
        frozen_after: i64,
    ) -> AppWalletTransaction {
        AppWalletTransaction {
            id: None,
            serial_no: None,
            wallet_id: 1,
            user_id: 1,
            change_type: change_type.get_code(),
            change_type_name: Some(change_type.description()),
            amount: Decimal::from(amount),
            balance_before: Decimal::from(balance_after - amount),
            balance_after: Decimal::from(balance_after),
            frozen_before: Decimal::ZERO,
            frozen_after: Decimal::from(frozen_after),
            related_id: None,
            related_type: None,
            description: None,
            operator_id: None,
            create_time: None,
        }
    }

    #[test]
    fn test_replay_reconstructs_balance() {
        // 入账 1000 -> 消费 300 -> 退款 100
        let entries = vec![
            entry(WalletChangeType::Adjustment, 1000, 1000, 0),
            entry(WalletChangeType::Consume, -300, 700, 0),
            entry(WalletChangeType::Refund, 100, 800, 0),
        ];
        assert_eq!(LedgerStore::replay_balance(&entries), Decimal::from(800));
        assert!(LedgerStore::verify_chain(&entries));
    }

    #[test]
    fn test_freeze_entries_skipped_in_replay() {
        let mut entries = vec![entry(WalletChangeType::Adjustment, 1000, 1000, 0)];
        // 冻结/解冻记录可用余额影响，但不参与余额回放
        let mut freeze = entry(WalletChangeType::Freeze, -200, 1000, 200);
        freeze.balance_before = Decimal::from(1000);
        entries.push(freeze);
        let mut unfreeze = entry(WalletChangeType::Unfreeze, 200, 1000, 0);
        unfreeze.balance_before = Decimal::from(1000);
        entries.push(unfreeze);

        assert_eq!(LedgerStore::replay_balance(&entries), Decimal::from(1000));
        assert!(LedgerStore::verify_chain(&entries));
    }

    #[test]
    fn test_broken_chain_detected() {
        let entries = vec![
            entry(WalletChangeType::Adjustment, 1000, 1000, 0),
            // balance_after 与上一条不衔接
            entry(WalletChangeType::Consume, -300, 600, 0),
        ];
        assert!(!LedgerStore::verify_chain(&entries));
    }
}
