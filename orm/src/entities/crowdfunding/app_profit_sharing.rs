use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 分润记录表
///
/// 每 (项目, 周期, 份额) 一行，幂等键为 项目+周期；创建后金额不再重算，
/// 发放只流转 status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppProfitSharing {
    pub id: Option<i64>,
    pub project_id: i64,
    /// 结算周期 YYYY-MM
    pub period: String,
    pub share_id: i64,
    pub user_id: i64,
    pub share_count: i64,
    /// 当期总收入
    pub total_income: Decimal,
    /// 当期总成本
    pub total_cost: Decimal,
    /// 当期净收益
    pub net_income: Decimal,
    /// 每份分润
    pub per_share_amount: Decimal,
    /// 本份额应得分润
    pub profit_sharing_amount: Decimal,
    /// 状态 见 ProfitSharingStatus
    pub status: i32,
    pub paid_time: Option<DateTime>,
    pub remark: Option<String>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppProfitSharing {}, "app_profit_sharing");
impl_select!(AppProfitSharing{select_by_project_and_period(project_id: i64, period: &str) -> Vec => "`where project_id = #{project_id} and period = #{period}`"});
impl_select!(AppProfitSharing{select_by_period_and_status(period: &str, status: i32) -> Vec => "`where period = #{period} and status = #{status}`"});
impl_select!(AppProfitSharing{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});

impl AppProfitSharing {
    pub const TABLE_NAME: &'static str = "app_profit_sharing";
}
