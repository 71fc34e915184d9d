use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 众筹项目状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum ProjectStatus {
    /// 待开售 (0)
    #[strum(to_string = "待开售")]
    Pending = 0,
    /// 认购中 (1)
    #[strum(to_string = "认购中")]
    Funding = 1,
    /// 众筹成功 (2)
    #[strum(to_string = "众筹成功")]
    Success = 2,
    /// 众筹失败 (3)
    #[strum(to_string = "众筹失败")]
    Failed = 3,
}

impl ProjectStatus {
    pub fn get_code(self) -> i32 {
        self as i32
    }

    pub fn from_code(value: i32) -> Option<Self> {
        Self::iter().find(|e| e.get_code() == value)
    }

    pub fn description(&self) -> String {
        self.as_ref().to_string()
    }

    /// 是否开放认购
    pub fn can_purchase(self) -> bool {
        matches!(self, ProjectStatus::Funding)
    }
}

/// 众筹份额状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum ShareStatus {
    /// 持有中 (1)
    #[strum(to_string = "持有中")]
    Active = 1,
    /// 已转让 (2)
    #[strum(to_string = "已转让")]
    Transferred = 2,
    /// 已赎回 (3)
    #[strum(to_string = "已赎回")]
    Redeemed = 3,
}

impl ShareStatus {
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

/// 分润记录状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum ProfitSharingStatus {
    /// 待发放 (0)
    #[strum(to_string = "待发放")]
    Pending = 0,
    /// 已发放 (1)
    #[strum(to_string = "已发放")]
    Paid = 1,
    /// 发放失败 (2)
    #[strum(to_string = "发放失败")]
    Failed = 2,
}

impl ProfitSharingStatus {
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
        for s in ProjectStatus::iter() {
            assert_eq!(ProjectStatus::from_code(s.get_code()), Some(s));
        }
        for s in ShareStatus::iter() {
            assert_eq!(ShareStatus::from_code(s.get_code()), Some(s));
        }
        for s in ProfitSharingStatus::iter() {
            assert_eq!(ProfitSharingStatus::from_code(s.get_code()), Some(s));
        }
    }

    #[test]
    fn test_purchase_guard() {
        assert!(ProjectStatus::Funding.can_purchase());
        assert!(!ProjectStatus::Pending.can_purchase());
        assert!(!ProjectStatus::Success.can_purchase());
        assert!(!ProjectStatus::Failed.can_purchase());
    }
}
