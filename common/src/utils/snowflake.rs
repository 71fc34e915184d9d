use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// 雪花算法流水号生成器
///
/// 41 位时间戳 + 10 位节点 + 12 位序列；节点号取自环境变量 NODE_ID
pub struct SnowflakeGenerator {
    node_id: i64,
    /// (上次时间戳, 序列号)
    state: Mutex<(i64, i64)>,
}

/// 平台纪元 2021-01-01 00:00:00 UTC
const EPOCH: i64 = 1609459200000;
const NODE_ID_BITS: i64 = 10;
const SEQUENCE_BITS: i64 = 12;

const MAX_NODE_ID: i64 = (1 << NODE_ID_BITS) - 1;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

impl SnowflakeGenerator {
    pub fn new(node_id: i64) -> Self {
        assert!(
            (0..=MAX_NODE_ID).contains(&node_id),
            "node_id 超出范围 0-{}",
            MAX_NODE_ID
        );
        Self {
            node_id,
            state: Mutex::new((-1, 0)),
        }
    }

    /// 生成下一个 ID
    pub fn next_id(&self) -> i64 {
        let mut state = self.state.lock().unwrap();
        let (ref mut last_timestamp, ref mut sequence) = *state;

        let mut timestamp = Self::current_millis();
        if timestamp < *last_timestamp {
            // 时钟回拨时在原时间线上继续，避免发出重复 ID
            timestamp = *last_timestamp;
        }

        if timestamp == *last_timestamp {
            *sequence = (*sequence + 1) & SEQUENCE_MASK;
            if *sequence == 0 {
                while timestamp <= *last_timestamp {
                    timestamp = Self::current_millis();
                }
            }
        } else {
            *sequence = 0;
        }

        *last_timestamp = timestamp;

        ((timestamp - EPOCH) << (NODE_ID_BITS + SEQUENCE_BITS))
            | (self.node_id << SEQUENCE_BITS)
            | *sequence
    }

    fn current_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

// 全局生成器
static SNOWFLAKE: Lazy<SnowflakeGenerator> = Lazy::new(|| {
    let node_id = std::env::var("NODE_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    SnowflakeGenerator::new(node_id)
});

/// 生成流水号 ID
pub fn generate_id() -> i64 {
    SNOWFLAKE.next_id()
}

/// 生成流水号字符串
pub fn generate_id_string() -> String {
    SNOWFLAKE.next_id().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_and_increasing() {
        let gen = SnowflakeGenerator::new(3);
        let mut seen = HashSet::new();
        let mut last = 0;
        for _ in 0..10_000 {
            let id = gen.next_id();
            assert!(id > 0);
            assert!(id >= last, "ID 必须单调不减");
            assert!(seen.insert(id), "ID 不允许重复");
            last = id;
        }
    }

    #[test]
    fn test_global_generator() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(!generate_id_string().is_empty());
    }
}
