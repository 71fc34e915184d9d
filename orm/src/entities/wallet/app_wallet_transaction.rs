use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 钱包账变流水表
///
/// 只追加不修改。amount 记录对可用余额的影响（冻结为负、解冻为正），
/// 余额口径的流水满足 balance_after(n) = balance_after(n-1) + amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppWalletTransaction {
    pub id: Option<i64>,
    pub serial_no: Option<String>,
    pub wallet_id: i64,
    pub user_id: i64,
    /// 账变类型 见 WalletChangeType
    pub change_type: i32,
    pub change_type_name: Option<String>,
    pub amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub frozen_before: Decimal,
    pub frozen_after: Decimal,
    /// 引起本次账变的业务对象
    pub related_id: Option<i64>,
    pub related_type: Option<String>,
    pub description: Option<String>,
    /// 后台操作触发时记录操作者
    pub operator_id: Option<i64>,
    pub create_time: Option<DateTime>,
}

crud!(AppWalletTransaction {}, "app_wallet_transaction");
impl_select!(AppWalletTransaction{select_by_wallet_id(wallet_id: i64) -> Vec => "`where wallet_id = #{wallet_id} order by id asc`"});
impl_select!(AppWalletTransaction{select_by_user_id(user_id: i64) -> Vec => "`where user_id = #{user_id} order by id asc`"});

impl AppWalletTransaction {
    pub const TABLE_NAME: &'static str = "app_wallet_transaction";
}
