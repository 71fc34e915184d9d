use chrono::{Datelike, Duration, Local, NaiveDate};

/// 结算周期工具
///
/// 周期统一为 "YYYY-MM" 形式的自然月

/// 校验周期格式
pub fn is_valid_period(period: &str) -> bool {
    if period.len() != 7 {
        return false;
    }
    NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d").is_ok()
}

/// 当前周期
pub fn current_period() -> String {
    Local::now().date_naive().format("%Y-%m").to_string()
}

/// 上一个周期（月度结算任务处理的对象）
pub fn previous_period() -> String {
    previous_period_of(Local::now().date_naive())
}

/// 指定日期的上一个周期
pub fn previous_period_of(date: NaiveDate) -> String {
    let first = date.with_day(1).unwrap_or(date);
    (first - Duration::days(1)).format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_period() {
        assert!(is_valid_period("2026-07"));
        assert!(is_valid_period("2025-12"));
        assert!(!is_valid_period("2026-13"));
        assert!(!is_valid_period("2026-00"));
        assert!(!is_valid_period("2026-7"));
        assert!(!is_valid_period("202607"));
        assert!(!is_valid_period("abcd-ef"));
        assert!(!is_valid_period(""));
    }

    #[test]
    fn test_previous_period_of() {
        let d = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(previous_period_of(d), "2026-07");

        // 跨年
        let d = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(previous_period_of(d), "2025-12");
    }

    #[test]
    fn test_current_period_shape() {
        let p = current_period();
        assert!(is_valid_period(&p));
    }
}
