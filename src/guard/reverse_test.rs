use super::*;
use crate::guard::test_helpers::{RecordingNavigator, ScriptedProbe, ms};
use tokio::time::Instant;

fn guard(probe: Arc<ScriptedProbe>, nav: &Arc<RecordingNavigator>) -> ReverseGuard {
    ReverseGuard::new(probe, nav.clone())
}

#[tokio::test(start_paused = true)]
async fn authenticated_visitor_is_sent_home() {
    let nav = RecordingNavigator::new();
    let mut handle = guard(ScriptedProbe::verdict(true, ms(200)), &nav).mount();

    let state = handle.settled().await;
    assert_eq!(state, ReverseState::Done { redirected_to: Some("/home".into()) });
    assert_eq!(state.view("login form"), View::Empty);
    assert_eq!(nav.calls(), vec![("/home".to_owned(), NavigateOptions::replace())]);
}

#[tokio::test(start_paused = true)]
async fn anonymous_visitor_sees_children() {
    let nav = RecordingNavigator::new();
    let mut handle = guard(ScriptedProbe::verdict(false, ms(200)), &nav).mount();

    let state = handle.settled().await;
    assert_eq!(state, ReverseState::Done { redirected_to: None });
    assert_eq!(state.view("login form"), View::Content("login form"));
    assert!(nav.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn probe_error_falls_through_to_children() {
    let nav = RecordingNavigator::new();
    let mut handle = guard(ScriptedProbe::failing(ms(200)), &nav).mount();

    let state = handle.settled().await;
    assert_eq!(state.view("login form"), View::Content("login form"));
    assert!(nav.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn no_minimum_delay() {
    let nav = RecordingNavigator::new();
    let started = Instant::now();
    let mut handle = guard(ScriptedProbe::verdict(false, ms(100)), &nav).mount();

    handle.settled().await;
    assert!(started.elapsed() < ms(110));
}

#[tokio::test(start_paused = true)]
async fn checking_view_is_plain_caption() {
    let nav = RecordingNavigator::new();
    let handle = guard(ScriptedProbe::verdict(false, ms(100)), &nav).mount();

    let View::Loading(indicator) = handle.state().view(()) else {
        panic!("expected loading view");
    };
    assert_eq!(indicator.caption, CHECKING_CAPTION);
    assert_eq!(indicator.animation, None);
}

#[tokio::test(start_paused = true)]
async fn unmount_mid_check_skips_redirect() {
    let nav = RecordingNavigator::new();
    let probe = ScriptedProbe::verdict(true, ms(1000));
    let handle = guard(probe.clone(), &nav).mount();
    let observer = handle.subscribe();

    tokio::time::sleep(ms(100)).await;
    handle.unmount().await;
    tokio::time::sleep(ms(2000)).await;

    assert_eq!(probe.completed(), 0);
    assert_eq!(*observer.borrow(), ReverseState::Checking);
    assert!(nav.calls().is_empty());
}
