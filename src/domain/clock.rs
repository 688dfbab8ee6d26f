use chrono::{DateTime, Utc};

/// Source of "now" for record timestamps and freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock(std::sync::Mutex<DateTime<Utc>>);

#[cfg(test)]
impl ManualClock {
    pub fn at_millis(millis: i64) -> Self {
        Self(std::sync::Mutex::new(
            DateTime::from_timestamp_millis(millis).unwrap(),
        ))
    }

    pub fn set_millis(&self, millis: i64) {
        *self.0.lock().unwrap() = DateTime::from_timestamp_millis(millis).unwrap();
    }

    pub fn advance_millis(&self, millis: i64) {
        let mut now = self.0.lock().unwrap();
        *now += chrono::Duration::milliseconds(millis);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
