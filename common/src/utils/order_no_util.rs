use crate::constants::WITHDRAWAL_NO_PREFIX;
use chrono::Local;
use rand::Rng;

/// 生成提现单号
///
/// 格式: W + 14位时间 + 6位随机数，如 W20260801123059042731。
/// 随机后缀存在碰撞可能，调用方需查库确认并有限次重试
pub fn generate_withdrawal_no() -> String {
    let ts = Local::now().format("%Y%m%d%H%M%S");
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{}{}{:06}", WITHDRAWAL_NO_PREFIX, ts, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdrawal_no_shape() {
        let no = generate_withdrawal_no();
        assert_eq!(no.len(), 21);
        assert!(no.starts_with(WITHDRAWAL_NO_PREFIX));
        assert!(no[1..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_withdrawal_no_varies() {
        // 同一秒内靠随机后缀区分
        let a = generate_withdrawal_no();
        let b = generate_withdrawal_no();
        let c = generate_withdrawal_no();
        assert!(a != b || b != c);
    }
}
