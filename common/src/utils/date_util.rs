use rbatis::rbdc::datetime::DateTime;

/// rbdc DateTime 的日期运算辅助
///
/// 实体层统一使用 rbdc 的 DateTime 落库，涉及天级偏移和先后比较时
/// 通过 unix 时间戳换算，避免在两套时间类型之间来回转换

const SECS_PER_DAY: i64 = 86_400;

/// 当前时间偏移指定天数
pub fn days_from_now(days: i64) -> DateTime {
    DateTime::from_timestamp(DateTime::now().unix_timestamp() + days * SECS_PER_DAY)
}

/// 时间是否已过去
pub fn is_past(dt: &DateTime) -> bool {
    dt.unix_timestamp() < DateTime::now().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_from_now() {
        let now = DateTime::now();
        let later = days_from_now(90);
        let diff = later.unix_timestamp() - now.unix_timestamp();
        // 两次取 now 可能跨秒
        assert!((diff - 90 * SECS_PER_DAY).abs() <= 2);
    }

    #[test]
    fn test_is_past() {
        assert!(is_past(&days_from_now(-1)));
        assert!(!is_past(&days_from_now(1)));
    }
}
