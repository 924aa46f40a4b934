use super::*;

const QUOTA: u32 = 10;
const WINDOW: Duration = Duration::from_secs(15 * 60);

fn limiter() -> RateLimiter {
    RateLimiter::new(QUOTA, WINDOW)
}

#[test]
fn allows_up_to_quota_then_denies() {
    let rl = limiter();
    let now = Instant::now();

    for i in 0..QUOTA {
        assert_eq!(rl.admit_at("10.0.0.1", now), Decision::Allow, "request {i} should be allowed");
    }
    assert!(matches!(rl.admit_at("10.0.0.1", now), Decision::Deny { .. }));
}

#[test]
fn denied_requests_stay_denied_within_the_window() {
    let rl = limiter();
    let start = Instant::now();

    for _ in 0..QUOTA {
        rl.admit_at("10.0.0.1", start);
    }
    let mid_window = start + WINDOW / 2;
    assert!(matches!(rl.admit_at("10.0.0.1", mid_window), Decision::Deny { .. }));
    assert!(matches!(rl.admit_at("10.0.0.1", mid_window), Decision::Deny { .. }));
}

#[test]
fn window_expiry_resets_the_counter() {
    let rl = limiter();
    let start = Instant::now();

    for _ in 0..QUOTA {
        rl.admit_at("10.0.0.1", start);
    }
    assert!(matches!(rl.admit_at("10.0.0.1", start), Decision::Deny { .. }));

    let after_window = start + WINDOW + Duration::from_millis(1);
    assert_eq!(rl.admit_at("10.0.0.1", after_window), Decision::Allow);
}

#[test]
fn distinct_keys_do_not_interfere() {
    let rl = limiter();
    let now = Instant::now();

    for _ in 0..QUOTA {
        rl.admit_at("10.0.0.1", now);
    }
    assert!(matches!(rl.admit_at("10.0.0.1", now), Decision::Deny { .. }));
    assert_eq!(rl.admit_at("10.0.0.2", now), Decision::Allow);
}

#[test]
fn deny_reports_remaining_window_time() {
    let rl = limiter();
    let start = Instant::now();

    for _ in 0..QUOTA {
        rl.admit_at("10.0.0.1", start);
    }
    let elapsed = Duration::from_secs(60);
    let Decision::Deny { retry_after } = rl.admit_at("10.0.0.1", start + elapsed) else {
        panic!("expected deny");
    };
    assert_eq!(retry_after, WINDOW - elapsed);
}

/// Fixed-window policy: a full quota late in one window plus a full quota
/// at the start of the next lets 2x the quota through around the boundary.
/// Accepted characteristic of the chosen algorithm.
#[test]
fn boundary_burst_of_twice_quota_is_possible() {
    let rl = limiter();
    let start = Instant::now();
    let late = start + WINDOW - Duration::from_secs(1);

    // First window opened at `late`.
    for _ in 0..QUOTA {
        assert_eq!(rl.admit_at("10.0.0.1", late), Decision::Allow);
    }

    // Two seconds later the window has rolled over; a fresh quota is available.
    let next = late + WINDOW + Duration::from_secs(1);
    for _ in 0..QUOTA {
        assert_eq!(rl.admit_at("10.0.0.1", next), Decision::Allow);
    }
}

#[test]
fn sweep_evicts_expired_windows() {
    let rl = limiter();
    let start = Instant::now();

    for key in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
        rl.admit_at(key, start);
    }
    assert_eq!(rl.tracked_keys(), 3);

    // A later admit triggers the sweep; only the fresh key survives.
    let later = start + WINDOW + Duration::from_secs(1);
    rl.admit_at("10.0.0.9", later);
    assert_eq!(rl.tracked_keys(), 1);
}
