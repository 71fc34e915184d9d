use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 项目月度收支表
///
/// 运营侧录入（录入界面不在本核心内），分润计算按 (project_id, period) 读取
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppProjectPeriodIncome {
    pub id: Option<i64>,
    pub project_id: i64,
    /// 结算周期 YYYY-MM
    pub period: String,
    /// 当期总收入
    pub total_income: Decimal,
    /// 保险费
    pub insurance_fee: Decimal,
    /// 维保费
    pub maintenance_fee: Decimal,
    /// 清洁费
    pub cleaning_fee: Decimal,
    pub remark: Option<String>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppProjectPeriodIncome {}, "app_project_period_income");
impl_select!(AppProjectPeriodIncome{select_by_project_and_period(project_id: i64, period: &str) -> Option => "`where project_id = #{project_id} and period = #{period} limit 1`"});

impl AppProjectPeriodIncome {
    pub const TABLE_NAME: &'static str = "app_project_period_income";
}
