use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 房车众筹项目表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCrowdfundingProject {
    pub id: Option<i64>,
    pub name: String,
    /// 众筹标的车辆
    pub vehicle_id: Option<i64>,
    /// 单份认购价
    pub share_price: Decimal,
    /// 总份额
    pub total_shares: i64,
    /// 已售份额
    pub sold_shares: i64,
    /// 已筹金额
    pub raised_amount: Decimal,
    /// 开售时间
    pub start_time: Option<DateTime>,
    /// 截止时间
    pub end_time: Option<DateTime>,
    /// 状态 见 ProjectStatus
    pub status: i32,
    pub remark: Option<String>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppCrowdfundingProject {}, "app_crowdfunding_project");
impl_select!(AppCrowdfundingProject{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppCrowdfundingProject{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});
impl_select!(AppCrowdfundingProject{select_by_status(status: i32) -> Vec => "`where status = #{status}`"});

impl AppCrowdfundingProject {
    pub const TABLE_NAME: &'static str = "app_crowdfunding_project";

    /// 剩余可认购份额
    pub fn remaining_shares(&self) -> i64 {
        self.total_shares - self.sold_shares
    }
}
