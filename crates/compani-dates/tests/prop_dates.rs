//! Property-based tests for dates, durations and intervals using proptest.
//!
//! These check invariants that hold for any generated instant or duration, not
//! just the vectors in `diff_vectors.rs` and `interval_tests.rs`.

use compani_dates::{CompaniDate, CompaniDuration, CompaniInterval};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A UTC instant between 2000 and 2040, at millisecond precision.
fn arb_instant() -> impl Strategy<Value = String> {
    (
        2000u32..=2040,
        1u32..=12,
        1u32..=28,
        0u32..=23,
        0u32..=59,
        0u32..=59,
        0u32..=999,
    )
        .prop_map(|(y, mo, d, h, mi, s, ms)| {
            format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}.{ms:03}Z")
        })
}

fn arb_unit() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("years"),
        Just("months"),
        Just("weeks"),
        Just("days"),
        Just("hours"),
        Just("minutes"),
        Just("seconds"),
        Just("milliseconds"),
    ]
}

/// A single-component ISO step of at least one hour, as `(amount, prefix,
/// designator)` so multiples of it can be written out directly.
fn arb_step() -> impl Strategy<Value = (u32, &'static str, char)> {
    prop_oneof![
        (1u32..=3).prop_map(|n| (n, "P", 'M')),
        (1u32..=10).prop_map(|n| (n, "P", 'D')),
        (1u32..=2).prop_map(|n| (n, "P", 'W')),
        (1u32..=48).prop_map(|n| (n, "PT", 'H')),
        (60u32..=180).prop_map(|n| (n, "PT", 'M')),
    ]
}

/// An ISO duration with independently signed components.
fn arb_duration() -> impl Strategy<Value = String> {
    (
        -5i64..=5,
        -30i64..=30,
        -100i64..=100,
        -3600i64..=3600,
        0i64..=999,
    )
        .prop_map(|(months, days, hours, seconds, millis)| {
            let seconds = if millis == 0 {
                format!("{seconds}")
            } else {
                let sign = if seconds < 0 { "-" } else { "" };
                format!("{sign}{}.{millis:03}", seconds.abs())
            };
            format!("P{months}M{days}DT{hours}H{seconds}S")
        })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: UTC ISO strings survive a parse/render cycle
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn iso_instant_round_trips(iso in arb_instant()) {
        let date = CompaniDate::new(iso.as_str()).unwrap();
        prop_assert_eq!(date.to_iso(), iso);
        let again = CompaniDate::new(date.to_local_iso()).unwrap();
        prop_assert_eq!(again, date);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Rendered durations parse back to an equivalent duration
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn duration_round_trips(iso in arb_duration()) {
        let duration = CompaniDuration::new(iso.as_str()).unwrap();
        let rendered = duration.to_iso();
        let parsed = CompaniDuration::new(rendered.as_str()).unwrap();
        prop_assert_eq!(parsed.total_milliseconds(), duration.total_milliseconds());
        prop_assert_eq!(parsed.to_iso(), rendered);
    }
}

// ---------------------------------------------------------------------------
// Property 3: diff is antisymmetric
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn diff_is_antisymmetric(a in arb_instant(), b in arb_instant(), unit in arb_unit()) {
        let a = CompaniDate::new(a.as_str()).unwrap();
        let b = CompaniDate::new(b.as_str()).unwrap();
        let forward = a.diff(b, unit).unwrap();
        let backward = b.diff(a, unit).unwrap();
        prop_assert_eq!(forward.negate().unwrap().to_iso(), backward.to_iso());
    }
}

// ---------------------------------------------------------------------------
// Property 4: diff never overshoots, and a calendar diff adds back exactly
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn diff_adds_back_to_receiver(a in arb_instant(), b in arb_instant(), unit in arb_unit()) {
        let a = CompaniDate::new(a.as_str()).unwrap();
        let b = CompaniDate::new(b.as_str()).unwrap();
        let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
        let elapsed = later.diff(earlier, unit).unwrap();
        prop_assert!(elapsed.total_milliseconds() >= 0);
        prop_assert_eq!(earlier.add(&elapsed.to_iso()).unwrap(), later);
    }
}

// ---------------------------------------------------------------------------
// Property 5: range_by yields k + 1 sorted starts, ending on `end` only when aligned
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn range_by_counts_fragments(
        start in arb_instant(),
        (amount, prefix, designator) in arb_step(),
        k in 1usize..=20,
        extra_minutes in 0i64..=59,
    ) {
        let step = format!("{prefix}{amount}{designator}");
        let span = format!("{prefix}{}{designator}", amount as usize * k);
        let start = CompaniDate::new(start.as_str()).unwrap();
        let mut end = start.add(&span).unwrap();
        // Stays inside the next fragment: every step is at least one hour.
        if extra_minutes > 0 {
            end = end.add(&format!("PT{extra_minutes}M")).unwrap();
        }

        let interval = CompaniInterval::from_dates(start, end).unwrap();
        let dates = interval.range_by(step.as_str(), false).unwrap();

        prop_assert_eq!(dates.len(), k + 1);
        prop_assert_eq!(dates[0], start);
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(*dates.last().unwrap() == end, extra_minutes == 0);

        let excluded = interval.range_by(step.as_str(), true).unwrap();
        prop_assert_eq!(excluded.len(), k);
    }
}

// ---------------------------------------------------------------------------
// Property 6: length comparisons agree with as_seconds near 2^53
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn longer_than_matches_total(
        a in 9_007_199_254_000_000i64..=9_007_199_254_740_991,
        delta in 1i64..=1000,
    ) {
        let short = CompaniDuration::new(format!("PT{a}S")).unwrap();
        let long = CompaniDuration::new(format!("PT{}S", a + delta)).unwrap();
        prop_assert!(long.is_longer_than(short).unwrap());
        prop_assert!(short.is_shorter_than(long).unwrap());
        prop_assert!(!long.is_equivalent_to(short).unwrap());
        prop_assert!(long.as_seconds() >= short.as_seconds());
    }
}
