use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 提现申请状态枚举
///
/// 审核流为 待审核 -> 已完成 | 已驳回；
/// Processing 为渠道打款预留状态，当前流程不会流入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum WithdrawalStatus {
    /// 待审核 (0)
    #[strum(to_string = "待审核")]
    Pending = 0,
    /// 处理中 (1) - 预留
    #[strum(to_string = "处理中")]
    Processing = 1,
    /// 已完成 (2)
    #[strum(to_string = "已完成")]
    Completed = 2,
    /// 已驳回 (3)
    #[strum(to_string = "已驳回")]
    Rejected = 3,
    /// 失败 (4) - 打款渠道失败预留
    #[strum(to_string = "失败")]
    Failed = 4,
}

impl WithdrawalStatus {
    pub fn get_code(self) -> i32 {
        self as i32
    }

    pub fn from_code(value: i32) -> Option<Self> {
        Self::iter().find(|e| e.get_code() == value)
    }

    pub fn description(&self) -> String {
        self.as_ref().to_string()
    }

    /// 是否终态（终态记录不可再审核、不可变更）
    pub fn is_terminal(self) -> bool {
        match self {
            WithdrawalStatus::Completed
            | WithdrawalStatus::Rejected
            | WithdrawalStatus::Failed => true,
            WithdrawalStatus::Pending | WithdrawalStatus::Processing => false,
        }
    }

    /// 是否允许进入审核
    pub fn can_review(self) -> bool {
        matches!(self, WithdrawalStatus::Pending)
    }
}

/// 提现方式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum WithdrawalMethod {
    /// 微信 (1)
    #[strum(to_string = "微信")]
    Wechat = 1,
    /// 支付宝 (2)
    #[strum(to_string = "支付宝")]
    Alipay = 2,
    /// 银行卡 (3)
    #[strum(to_string = "银行卡")]
    BankCard = 3,
}

impl WithdrawalMethod {
    pub fn get_code(self) -> i32 {
        self as i32
    }

    pub fn from_code(value: i32) -> Option<Self> {
        Self::iter().find(|e| e.get_code() == value)
    }

    pub fn description(&self) -> String {
        self.as_ref().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for s in WithdrawalStatus::iter() {
            assert_eq!(WithdrawalStatus::from_code(s.get_code()), Some(s));
        }
        for m in WithdrawalMethod::iter() {
            assert_eq!(WithdrawalMethod::from_code(m.get_code()), Some(m));
        }
    }

    #[test]
    fn test_review_guard() {
        // 仅待审核记录可审核，终态记录重复审核必须被拒绝
        assert!(WithdrawalStatus::Pending.can_review());
        assert!(!WithdrawalStatus::Completed.can_review());
        assert!(!WithdrawalStatus::Rejected.can_review());
        assert!(!WithdrawalStatus::Failed.can_review());
        assert!(!WithdrawalStatus::Processing.can_review());

        assert!(WithdrawalStatus::Completed.is_terminal());
        assert!(WithdrawalStatus::Rejected.is_terminal());
        assert!(WithdrawalStatus::Failed.is_terminal());
        assert!(!WithdrawalStatus::Pending.is_terminal());
    }
}
