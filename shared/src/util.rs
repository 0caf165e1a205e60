/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at shop scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_ids_are_positive() {
        for _ in 0..32 {
            assert!(snowflake_id() > 0);
        }
    }

    #[test]
    fn test_snowflake_id_is_time_ordered_across_millis() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(b > a);
    }
}
