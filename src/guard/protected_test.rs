use super::*;
use crate::guard::test_helpers::{RecordingNavigator, ScriptedProbe, ms};

fn guard(probe: Arc<ScriptedProbe>, nav: &Arc<RecordingNavigator>) -> ProtectedGuard {
    ProtectedGuard::new(probe, nav.clone())
}

// =============================================================
// Minimum loading delay
// =============================================================

#[tokio::test(start_paused = true)]
async fn fast_verdict_waits_out_minimum_delay() {
    let nav = RecordingNavigator::new();
    let started = Instant::now();
    let mut handle = guard(ScriptedProbe::verdict(true, ms(500)), &nav).mount();

    tokio::time::sleep(ms(1990)).await;
    assert_eq!(handle.state(), ProtectedState::Verifying);
    assert!(handle.state().view("content").is_loading());

    assert_eq!(handle.settled().await, ProtectedState::Authorized);
    let elapsed = started.elapsed();
    assert!(elapsed >= ms(2000), "authorized too early: {elapsed:?}");
    assert!(elapsed < ms(2010), "authorized too late: {elapsed:?}");
    assert!(nav.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_verdict_is_not_delayed_further() {
    let nav = RecordingNavigator::new();
    let started = Instant::now();
    let mut handle = guard(ScriptedProbe::verdict(true, ms(3000)), &nav).mount();

    assert_eq!(handle.settled().await, ProtectedState::Authorized);
    let elapsed = started.elapsed();
    assert!(elapsed >= ms(3000));
    assert!(elapsed < ms(3010), "extra delay applied: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn custom_minimum_delay_is_honoured() {
    let nav = RecordingNavigator::new();
    let started = Instant::now();
    let mut handle = guard(ScriptedProbe::verdict(true, ms(10)), &nav)
        .with_min_verify_delay(Duration::ZERO)
        .mount();

    assert_eq!(handle.settled().await, ProtectedState::Authorized);
    assert!(started.elapsed() < ms(20));
}

// =============================================================
// Redirects
// =============================================================

#[tokio::test(start_paused = true)]
async fn negative_verdict_redirects_immediately() {
    let nav = RecordingNavigator::new();
    let started = Instant::now();
    let mut handle = guard(ScriptedProbe::verdict(false, ms(300)), &nav).mount();

    let state = handle.settled().await;
    assert_eq!(state, ProtectedState::Redirecting { to: "/login".into() });
    assert!(started.elapsed() < ms(310), "redirect waited for minimum delay");
    assert_eq!(nav.calls(), vec![("/login".to_owned(), NavigateOptions::replace())]);
    assert_eq!(state.view("content"), View::Empty);
}

#[tokio::test(start_paused = true)]
async fn probe_error_fails_closed() {
    let nav = RecordingNavigator::new();
    let mut handle = guard(ScriptedProbe::failing(ms(50)), &nav).mount();

    assert_eq!(handle.settled().await, ProtectedState::Redirecting { to: "/login".into() });
    assert_eq!(nav.calls(), vec![("/login".to_owned(), NavigateOptions::replace())]);
}

// =============================================================
// Unmount
// =============================================================

#[tokio::test(start_paused = true)]
async fn unmount_during_delay_cancels_transition() {
    let nav = RecordingNavigator::new();
    let handle = guard(ScriptedProbe::verdict(true, ms(500)), &nav).mount();
    let observer = handle.subscribe();

    tokio::time::sleep(ms(1000)).await;
    handle.unmount().await;
    tokio::time::sleep(ms(5000)).await;

    assert_eq!(*observer.borrow(), ProtectedState::Verifying);
    assert!(nav.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unmount_during_probe_abandons_requests() {
    let nav = RecordingNavigator::new();
    let probe = ScriptedProbe::verdict(false, ms(1000));
    let handle = guard(probe.clone(), &nav).mount();

    tokio::time::sleep(ms(100)).await;
    assert_eq!(probe.started(), 1);
    handle.unmount().await;
    tokio::time::sleep(ms(5000)).await;

    assert_eq!(probe.completed(), 0);
    assert!(nav.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_cancels_pending_transition() {
    let nav = RecordingNavigator::new();
    let handle = guard(ScriptedProbe::verdict(true, ms(500)), &nav).mount();
    let observer = handle.subscribe();

    tokio::time::sleep(ms(700)).await;
    drop(handle);
    tokio::time::sleep(ms(5000)).await;

    assert_eq!(*observer.borrow(), ProtectedState::Verifying);
}

// =============================================================
// View
// =============================================================

#[test]
fn verifying_view_is_full_viewport_animation() {
    let view = ProtectedState::Verifying.view(());
    let View::Loading(indicator) = view else {
        panic!("expected loading view");
    };
    assert_eq!(indicator.animation, Some(LOADING_ANIMATION_URL));
    assert_eq!(indicator.caption, VERIFYING_CAPTION);
    assert!(indicator.full_viewport);
}

#[test]
fn authorized_view_passes_content_through() {
    assert_eq!(ProtectedState::Authorized.view("home"), View::Content("home"));
}
