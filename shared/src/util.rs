use serde::{Deserialize, Deserializer, de};
use std::sync::atomic::{AtomicI64, Ordering};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Last id handed out by this process
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random start, then a sequence within the millisecond
///
/// Ids are strictly increasing within a process, so two calls never
/// collide even inside the same millisecond.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    let candidate = (ts << 12) | rand_bits;

    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = if candidate > last { candidate } else { last + 1 };
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

/// Deserialize an id sent either as a JSON number or as a numeric string
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_snowflake_fits_js_safe_integer() {
        const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id <= MAX_SAFE_INTEGER);
    }

    #[test]
    fn test_snowflake_is_time_ordered() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(b > a);
    }

    #[test]
    fn test_snowflake_unique_within_same_millisecond() {
        let ids: Vec<i64> = (0..20_000).map(|_| snowflake_id()).collect();
        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_snowflake_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..5_000).map(|_| snowflake_id()).collect::<Vec<_>>()))
            .collect();
        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(deserialize_with = "deserialize_id")]
        id: i64,
    }

    #[test]
    fn test_id_from_number_or_string() {
        let n: Body = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(n.id, 42);
        let s: Body = serde_json::from_str(r#"{"id": " 43 "}"#).unwrap();
        assert_eq!(s.id, 43);
        assert!(serde_json::from_str::<Body>(r#"{"id": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Body>(r#"{"id": true}"#).is_err());
    }
}
