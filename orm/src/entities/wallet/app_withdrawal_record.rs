use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 提现申请记录表
///
/// 申请即冻结 amount；终态（完成/驳回/失败）只进入一次，之后不可变更
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppWithdrawalRecord {
    pub id: Option<i64>,
    /// 提现单号，全局唯一
    pub withdrawal_no: String,
    pub user_id: i64,
    pub wallet_id: i64,
    /// 申请金额
    pub amount: Decimal,
    /// 手续费
    pub fee: Decimal,
    /// 实际到账金额 = amount - fee
    pub actual_amount: Decimal,
    /// 提现方式 见 WithdrawalMethod
    pub method: i32,
    /// 收款账号
    pub account_no: Option<String>,
    /// 收款人姓名
    pub account_name: Option<String>,
    /// 开户行（银行卡提现时）
    pub bank_name: Option<String>,
    /// 状态 见 WithdrawalStatus
    pub status: i32,
    pub reviewer_id: Option<i64>,
    pub reject_reason: Option<String>,
    pub apply_time: Option<DateTime>,
    pub review_time: Option<DateTime>,
    pub complete_time: Option<DateTime>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppWithdrawalRecord {}, "app_withdrawal_record");
impl_select!(AppWithdrawalRecord{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppWithdrawalRecord{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});
impl_select!(AppWithdrawalRecord{select_by_withdrawal_no(withdrawal_no: &str) -> Option => "`where withdrawal_no = #{withdrawal_no} limit 1`"});

impl AppWithdrawalRecord {
    pub const TABLE_NAME: &'static str = "app_withdrawal_record";
}
