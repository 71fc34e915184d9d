use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 用户众筹份额表
///
/// 由原子认购事务创建；生命周期延续到分润与项目失败退款
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCrowdfundingShare {
    pub id: Option<i64>,
    pub share_no: Option<String>,
    pub project_id: i64,
    pub user_id: i64,
    /// 认购份数
    pub share_count: i64,
    /// 认购时单价
    pub unit_price: Decimal,
    /// 认购总额 = unit_price * share_count
    pub total_amount: Decimal,
    /// 状态 见 ShareStatus
    pub status: i32,
    pub purchase_time: Option<DateTime>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppCrowdfundingShare {}, "app_crowdfunding_share");
impl_select!(AppCrowdfundingShare{select_by_project_and_status(project_id: i64, status: i32) -> Vec => "`where project_id = #{project_id} and status = #{status}`"});
impl_select!(AppCrowdfundingShare{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});
impl_select!(AppCrowdfundingShare{select_by_share_no(share_no: &str) -> Option => "`where share_no = #{share_no} limit 1`"});

impl AppCrowdfundingShare {
    pub const TABLE_NAME: &'static str = "app_crowdfunding_share";
}
