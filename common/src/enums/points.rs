use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 积分账户状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum PointsStatus {
    /// 正常 (1)
    #[strum(to_string = "正常")]
    Active = 1,
    /// 已过期 (2)
    #[strum(to_string = "已过期")]
    Expired = 2,
    /// 已清零 (3)
    #[strum(to_string = "已清零")]
    Cleared = 3,
}

impl PointsStatus {
    pub fn get_code(self) -> i32 {
        self as i32
    }

    pub fn from_code(value: i32) -> Option<Self> {
        Self::iter().find(|e| e.get_code() == value)
    }

    pub fn description(&self) -> String {
        self.as_ref().to_string()
    }

    pub fn is_active(self) -> bool {
        matches!(self, PointsStatus::Active)
    }
}

/// 积分账变类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum PointsChangeType {
    /// 获得 (1)
    #[strum(to_string = "获得")]
    Earn = 1,
    /// 使用 (-1)
    #[strum(to_string = "使用")]
    Use = -1,
    /// 过期 (-2)
    #[strum(to_string = "过期")]
    Expire = -2,
    /// 清零 (-3)
    #[strum(to_string = "清零")]
    Clear = -3,
}

impl PointsChangeType {
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

/// 积分来源枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum PointsSource {
    /// 众筹购买 (1)
    #[strum(to_string = "众筹购买")]
    Purchase = 1,
    /// 追加认购 (2)
    #[strum(to_string = "追加认购")]
    Additional = 2,
    /// 推荐奖励 (3)
    #[strum(to_string = "推荐奖励")]
    Referral = 3,
    /// 活动奖励 (4)
    #[strum(to_string = "活动奖励")]
    Activity = 4,
    /// 治理奖励 (5)
    #[strum(to_string = "治理奖励")]
    Governance = 5,
}

impl PointsSource {
    pub fn get_code(self) -> i32 {
        self as i32
    }

    pub fn from_code(value: i32) -> Option<Self> {
        Self::iter().find(|e| e.get_code() == value)
    }

    pub fn description(&self) -> String {
        self.as_ref().to_string()
    }

    /// 金额折算积分的默认除数
    ///
    /// 活动/治理类来源支持调用方传入自定义比例覆盖
    pub fn default_divisor(self) -> u32 {
        match self {
            PointsSource::Purchase | PointsSource::Additional => 10,
            PointsSource::Referral => 100,
            PointsSource::Activity | PointsSource::Governance => 10,
        }
    }

    /// 开户/复活时赋予的积分有效天数
    pub fn validity_days(self) -> i64 {
        match self {
            PointsSource::Additional => 90,
            PointsSource::Purchase
            | PointsSource::Referral
            | PointsSource::Activity
            | PointsSource::Governance => 365,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for s in PointsSource::iter() {
            assert_eq!(PointsSource::from_code(s.get_code()), Some(s));
        }
        for t in PointsChangeType::iter() {
            assert_eq!(PointsChangeType::from_code(t.get_code()), Some(t));
        }
    }

    #[test]
    fn test_divisor() {
        assert_eq!(PointsSource::Purchase.default_divisor(), 10);
        assert_eq!(PointsSource::Additional.default_divisor(), 10);
        assert_eq!(PointsSource::Referral.default_divisor(), 100);
        assert_eq!(PointsSource::Activity.default_divisor(), 10);
    }

    #[test]
    fn test_validity_days() {
        assert_eq!(PointsSource::Additional.validity_days(), 90);
        assert_eq!(PointsSource::Purchase.validity_days(), 365);
        assert_eq!(PointsSource::Governance.validity_days(), 365);
    }
}
