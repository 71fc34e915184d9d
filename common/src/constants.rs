/// 应用常量定义

/// 提现单号前缀
pub const WITHDRAWAL_NO_PREFIX: &str = "W";

/// 账变关联类型
pub mod related_types {
    /// 订单（租车/营地预订）
    pub const ORDER: &str = "order";
    /// 提现申请
    pub const WITHDRAWAL: &str = "withdrawal";
    /// 众筹份额
    pub const CROWDFUNDING_SHARE: &str = "crowdfunding_share";
    /// 分润记录
    pub const PROFIT_SHARING: &str = "profit_sharing";
}
