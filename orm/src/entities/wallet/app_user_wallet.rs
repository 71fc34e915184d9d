use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 用户钱包表
///
/// 每个用户一行，首次入账时惰性创建，只增不删。
/// 不变式: 0 <= frozen_amount <= balance，可用余额 = balance - frozen_amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUserWallet {
    pub id: Option<i64>,
    pub user_id: i64,
    /// 账户余额（含冻结部分）
    pub balance: Decimal,
    /// 冻结金额（提现审核中等占用）
    pub frozen_amount: Decimal,
    /// 累计入账
    pub total_recharge: Decimal,
    /// 累计消费
    pub total_consume: Decimal,
    /// 累计提现
    pub total_withdrawal: Decimal,
    /// 状态 见 WalletStatus
    pub status: i32,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppUserWallet {}, "app_user_wallet");
impl_select!(AppUserWallet{select_by_user_id(user_id: i64) -> Option => "`where user_id = #{user_id} limit 1`"});
impl_select!(AppUserWallet{select_by_user_id_for_update(user_id: i64) -> Option => "`where user_id = #{user_id} limit 1 for update`"});

impl AppUserWallet {
    pub const TABLE_NAME: &'static str = "app_user_wallet";

    /// 可用余额
    pub fn available(&self) -> Decimal {
        self.balance - self.frozen_amount
    }
}
