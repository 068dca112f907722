use std::cell::Cell;

pub const DEFAULT_TIMESTAMP: i64 = 1234567890;

thread_local! {
    static TIMESTAMP: Cell<i64> = const { Cell::new(DEFAULT_TIMESTAMP) };
}

/// Stand-in for `chrono::Utc` that reports the timestamp set for the
/// current thread.
pub struct Utc;

impl Utc {
    pub fn now() -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp(TIMESTAMP.get(), 0)
            .unwrap_or_default()
    }
}

pub fn set_timestamp(timestamp: i64) {
    TIMESTAMP.set(timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock() {
        assert_eq!(Utc::now().timestamp(), DEFAULT_TIMESTAMP);
        set_timestamp(1700000000);
        assert_eq!(Utc::now().timestamp(), 1700000000);
        assert_eq!(Utc::now().timestamp(), 1700000000);
    }
}
