use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// 积分账变流水表，只追加不修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPointsTransaction {
    pub id: Option<i64>,
    pub serial_no: Option<String>,
    pub account_id: i64,
    pub user_id: i64,
    /// 账变类型 见 PointsChangeType
    pub change_type: i32,
    pub change_type_name: Option<String>,
    /// 带符号积分数
    pub amount: i64,
    pub balance_after: i64,
    /// 来源 见 PointsSource，仅获得类账变填写
    pub source: Option<i32>,
    pub related_id: Option<i64>,
    pub remark: Option<String>,
    pub create_time: Option<DateTime>,
}

crud!(AppPointsTransaction {}, "app_points_transaction");
impl_select!(AppPointsTransaction{select_by_user_id(user_id: i64) -> Vec => "`where user_id = #{user_id} order by id asc`"});

impl AppPointsTransaction {
    pub const TABLE_NAME: &'static str = "app_points_transaction";
}
