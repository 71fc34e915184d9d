use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 钱包状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum WalletStatus {
    /// 正常 (1)
    #[strum(to_string = "正常")]
    Active = 1,
    /// 冻结 (2) - 后台风控冻结，禁止一切出入账
    #[strum(to_string = "冻结")]
    Frozen = 2,
    /// 注销 (3)
    #[strum(to_string = "注销")]
    Closed = 3,
}

impl WalletStatus {
    pub fn get_code(self) -> i32 {
        self as i32
    }

    pub fn from_code(value: i32) -> Option<Self> {
        Self::iter().find(|e| e.get_code() == value)
    }

    pub fn description(&self) -> String {
        self.as_ref().to_string()
    }

    /// 是否允许出入账
    pub fn is_active(self) -> bool {
        matches!(self, WalletStatus::Active)
    }
}

/// 钱包账变类型枚举
///
/// code 的符号与该账变对可用余额的影响方向一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum WalletChangeType {
    /// 消费 (-101) - 扣减余额
    #[strum(to_string = "消费")]
    Consume = -101,
    /// 退款 (101) - 返还余额
    #[strum(to_string = "退款")]
    Refund = 101,
    /// 冻结 (-102) - 可用余额转入冻结
    #[strum(to_string = "冻结")]
    Freeze = -102,
    /// 解冻 (102) - 冻结金额返还可用
    #[strum(to_string = "解冻")]
    Unfreeze = 102,
    /// 提现 (-201) - 审核通过后扣减余额并释放冻结
    #[strum(to_string = "提现")]
    Withdrawal = -201,
    /// 调账 (1) - 后台人工调整，金额可正可负
    #[strum(to_string = "调账")]
    Adjustment = 1,
}

impl WalletChangeType {
    pub fn get_code(self) -> i32 {
        self as i32
    }

    pub fn from_code(value: i32) -> Option<Self> {
        Self::iter().find(|e| e.get_code() == value)
    }

    pub fn description(&self) -> String {
        self.as_ref().to_string()
    }

    /// 该账变是否改变余额本身
    ///
    /// 冻结/解冻只在余额与冻结金额两个口径间腾挪，余额不变；
    /// 按余额口径回放流水时应跳过这两类记录
    pub fn affects_balance(self) -> bool {
        match self {
            WalletChangeType::Consume
            | WalletChangeType::Refund
            | WalletChangeType::Withdrawal
            | WalletChangeType::Adjustment => true,
            WalletChangeType::Freeze | WalletChangeType::Unfreeze => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for t in WalletChangeType::iter() {
            assert_eq!(WalletChangeType::from_code(t.get_code()), Some(t));
        }
        for s in WalletStatus::iter() {
            assert_eq!(WalletStatus::from_code(s.get_code()), Some(s));
        }
        assert_eq!(WalletChangeType::from_code(9999), None);
    }

    #[test]
    fn test_affects_balance() {
        assert!(WalletChangeType::Consume.affects_balance());
        assert!(WalletChangeType::Refund.affects_balance());
        assert!(WalletChangeType::Withdrawal.affects_balance());
        assert!(WalletChangeType::Adjustment.affects_balance());
        assert!(!WalletChangeType::Freeze.affects_balance());
        assert!(!WalletChangeType::Unfreeze.affects_balance());
    }

    #[test]
    fn test_status() {
        assert!(WalletStatus::Active.is_active());
        assert!(!WalletStatus::Frozen.is_active());
        assert!(!WalletStatus::Closed.is_active());
        assert_eq!(WalletStatus::Frozen.description(), "冻结");
    }
}
