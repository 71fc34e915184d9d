use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// 车主积分账户表
///
/// 每个用户一行，首次积分入账时惰性创建；
/// 过期/清零后再次入账会复活账户并重置有效期
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppOwnerPoints {
    pub id: Option<i64>,
    pub user_id: i64,
    pub balance: i64,
    /// 累计获得
    pub total_earned: i64,
    /// 累计使用
    pub total_used: i64,
    /// 积分有效期
    pub expiry_date: Option<DateTime>,
    /// 状态 见 PointsStatus
    pub status: i32,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppOwnerPoints {}, "app_owner_points");
impl_select!(AppOwnerPoints{select_by_user_id(user_id: i64) -> Option => "`where user_id = #{user_id} limit 1`"});
impl_select!(AppOwnerPoints{select_by_user_id_for_update(user_id: i64) -> Option => "`where user_id = #{user_id} limit 1 for update`"});
impl_select!(AppOwnerPoints{select_expired(status: i32, now: DateTime) -> Vec => "`where status = #{status} and expiry_date < #{now} and balance > 0`"});
impl_select!(AppOwnerPoints{select_active_with_balance(status: i32) -> Vec => "`where status = #{status} and balance > 0`"});

impl AppOwnerPoints {
    pub const TABLE_NAME: &'static str = "app_owner_points";
}
