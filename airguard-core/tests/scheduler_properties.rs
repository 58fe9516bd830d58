//! Property tests for wall-clock alignment and the baseline record format

use std::time::Duration;

use airguard_core::{
    next_aligned_fire_time, ScheduleTimer,
    store::{BaselineStore, CalibrationBaseline, MemoryBaselineStore},
};
use proptest::prelude::*;

/// Up to one day, in milliseconds
fn interval() -> impl Strategy<Value = Duration> {
    (1u64..=86_400_000).prop_map(Duration::from_millis)
}

/// Anything from the epoch to the year ~2500
fn timestamp() -> impl Strategy<Value = u64> {
    0u64..16_725_225_600_000
}

proptest! {
    #[test]
    fn fire_time_is_aligned_and_not_in_the_past(interval in interval(), now in timestamp()) {
        let fire = next_aligned_fire_time(interval, now);
        let step = interval.as_millis() as u64;

        prop_assert_eq!(fire % step, 0);
        prop_assert!(fire >= now);
        // Smallest such value: one step earlier is already in the past
        prop_assert!(fire < now + step);
    }

    #[test]
    fn advanced_timer_is_strictly_in_the_future(interval in interval(), created in timestamp(), lag in 0u64..10_000_000) {
        let mut timer = ScheduleTimer::new("prop", interval, created);
        let now = timer.next_fire_at() + lag;

        prop_assert!(timer.poll(now));
        prop_assert!(timer.next_fire_at() > now);
        prop_assert!(!timer.is_due(now));
    }

    #[test]
    fn one_second_ticks_fire_floor_t_over_i_plus_minus_one(
        interval_s in 1u64..=600,
        start in timestamp(),
        run_s in 0u64..7_200,
    ) {
        let interval = Duration::from_secs(interval_s);
        let mut timer = ScheduleTimer::new("publish", interval, start);
        let fired = (0..run_s).filter(|s| timer.poll(start + s * 1_000)).count() as u64;

        let expected = run_s / interval_s;
        prop_assert!(fired + 1 >= expected && fired <= expected + 1,
            "fired {} times, expected {} +/- 1", fired, expected);
    }

    #[test]
    fn baseline_record_round_trips(eco2 in any::<u16>(), tvoc in any::<u16>()) {
        let baseline = CalibrationBaseline::new(eco2, tvoc);
        let mut store = MemoryBaselineStore::new();

        store.save(&baseline).unwrap();
        prop_assert_eq!(store.load(), Some(baseline));
        prop_assert_eq!(store.record().unwrap().parse::<CalibrationBaseline>(), Ok(baseline));
    }

    #[test]
    fn arbitrary_record_text_never_panics(record in ".{0,24}") {
        let store = MemoryBaselineStore::with_record(record.clone());
        if let Some(baseline) = store.load() {
            // Anything accepted must write back as the canonical form of the same values
            let canonical = baseline.to_string();
            prop_assert_eq!(canonical.parse::<CalibrationBaseline>(), Ok(baseline));
        }
    }
}
