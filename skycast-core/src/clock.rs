use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{Local, Timelike};

use crate::view::{RenderTarget, with_target};

/// Refresh period of the clock slot.
pub const CLOCK_PERIOD: Duration = Duration::from_secs(60);

/// 24-hour `"H : M"`, without zero padding.
pub fn format_clock(hour: u32, minute: u32) -> String {
    format!("{hour} : {minute}")
}

pub fn now() -> String {
    let now = Local::now();
    format_clock(now.hour(), now.minute())
}

/// Write the local time to the clock slot now and then once per `period`.
/// Runs until the task is aborted.
pub async fn run_clock<T: RenderTarget>(target: Arc<Mutex<T>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        let time = now();
        with_target(&target, |t| t.set_clock(&time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::MemoryTarget;

    #[test]
    fn clock_is_not_zero_padded() {
        assert_eq!(format_clock(9, 5), "9 : 5");
        assert_eq!(format_clock(0, 0), "0 : 0");
        assert_eq!(format_clock(23, 59), "23 : 59");
    }

    #[tokio::test]
    async fn clock_slot_is_set_on_start() {
        let target = Arc::new(Mutex::new(MemoryTarget::default()));
        let task = tokio::spawn(run_clock(target.clone(), Duration::from_millis(10)));

        tokio::time::sleep(Duration::from_millis(50)).await;
        task.abort();

        let clock = target.lock().unwrap().clock.clone();
        assert!(clock.contains(" : "), "clock was {clock:?}");
    }
}
