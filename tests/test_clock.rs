use survival_arena::clock::Clock;

fn make_clock() -> Clock {
    Clock::new(1000.0, 0.1)
}

// ── frame_delta ───────────────────────────────────────────────────────────────

#[test]
fn first_frame_has_zero_delta() {
    let mut c = make_clock();
    assert_eq!(c.frame_delta(1500.0), 0.0);
}

#[test]
fn delta_between_frames() {
    let mut c = make_clock();
    c.frame_delta(1000.0);
    let dt = c.frame_delta(1016.0);
    assert!((dt - 0.016).abs() < 1e-6);
}

#[test]
fn delta_is_clamped_to_max() {
    let mut c = make_clock();
    c.frame_delta(1000.0);
    assert_eq!(c.frame_delta(4000.0), 0.1);
}

#[test]
fn backwards_timestamp_gives_zero_delta() {
    let mut c = make_clock();
    c.frame_delta(2000.0);
    assert_eq!(c.frame_delta(1900.0), 0.0);
}

// ── pause / resume ────────────────────────────────────────────────────────────

#[test]
fn pause_twice_keeps_first_start() {
    let mut c = make_clock();
    assert!(c.pause(2000.0));
    assert!(!c.pause(3000.0));
    assert!(c.is_paused());
    assert_eq!(c.paused_ms(4000.0), 2000.0);
}

#[test]
fn resume_without_pause_returns_false() {
    let mut c = make_clock();
    assert!(!c.resume(2000.0));
    assert_eq!(c.paused_ms(2000.0), 0.0);
}

#[test]
fn elapsed_excludes_paused_span() {
    let mut c = make_clock();
    c.pause(2000.0);
    c.resume(7000.0);
    // 10 s wall clock minus 5 s paused
    assert_eq!(c.elapsed_secs(11_000.0), 5.0);
}

#[test]
fn elapsed_freezes_while_paused() {
    let mut c = make_clock();
    c.pause(3000.0);
    assert_eq!(c.elapsed_secs(3000.0), 2.0);
    assert_eq!(c.elapsed_secs(60_000.0), 2.0);
}

#[test]
fn repeated_pauses_accumulate() {
    let mut c = make_clock();
    c.pause(2000.0);
    c.resume(3000.0);
    c.pause(5000.0);
    c.resume(7000.0);
    assert_eq!(c.paused_ms(10_000.0), 3000.0);
}

#[test]
fn resume_resets_frame_stamp() {
    let mut c = make_clock();
    c.frame_delta(1000.0);
    c.pause(1050.0);
    c.resume(9000.0);
    let dt = c.frame_delta(9020.0);
    assert!((dt - 0.02).abs() < 1e-6);
}

#[test]
fn elapsed_before_start_is_zero() {
    let c = make_clock();
    assert_eq!(c.elapsed_secs(500.0), 0.0);
}
