use std::sync::Arc;
use std::time::Duration;

use common_session::{
    encode_unsigned, CredentialStore, GateConfig, ManualClock, MemoryCredentialStore, Role,
    SessionGate, SessionState, StorageSignal,
};
use serde_json::json;
use tokio::time::timeout;

const NOW: i64 = 1_760_000_000;

fn sibling_gates(
    store: &MemoryCredentialStore,
    signal: &StorageSignal,
    clock: &ManualClock,
) -> (SessionGate, SessionGate) {
    let build = || {
        SessionGate::builder(Arc::new(store.clone()))
            .with_signal(signal.clone())
            .with_clock(clock.clone())
            .build()
    };
    (build(), build())
}

#[tokio::test(start_paused = true)]
async fn timer_drops_credential_once_it_expires() {
    let clock = ManualClock::new(NOW);
    let store = MemoryCredentialStore::default()
        .with_credential(encode_unsigned(&json!({ "role": "teacher", "exp": NOW + 30 })));
    let gate = SessionGate::builder(Arc::new(store.clone()))
        .with_clock(clock.clone())
        .with_config(GateConfig::new().with_revalidate_every(Duration::from_secs(60)))
        .build();
    assert_eq!(gate.role(), Some(Role::Teacher));

    let mut rx = gate.subscribe();
    let handle = gate.spawn_revalidation();
    assert!(handle.is_running());
    clock.advance(45);

    let early = timeout(Duration::from_secs(59), rx.changed()).await;
    assert!(early.is_err(), "no revalidation before the first tick");
    assert_eq!(gate.role(), Some(Role::Teacher));

    timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("tick within the period")
        .expect("gate alive");
    assert_eq!(*rx.borrow(), SessionState::Anonymous);
    assert_eq!(store.load().expect("load"), None);

    handle.shutdown().await;
}

#[tokio::test]
async fn logout_in_one_context_reaches_the_other() {
    let clock = ManualClock::new(NOW);
    let signal = StorageSignal::new();
    let store = MemoryCredentialStore::default()
        .with_credential(encode_unsigned(&json!({ "role": "manager", "exp": NOW + 3600 })));
    let (first, second) = sibling_gates(&store, &signal, &clock);
    assert_eq!(second.role(), Some(Role::Manager));

    let mut rx = second.subscribe();
    let _handle = second.spawn_revalidation();

    first.clear_session().expect("logout");

    timeout(Duration::from_secs(1), rx.changed())
        .await
        .expect("storage event delivered")
        .expect("gate alive");
    assert_eq!(second.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn login_in_one_context_reaches_the_other() {
    let clock = ManualClock::new(NOW);
    let signal = StorageSignal::new();
    let store = MemoryCredentialStore::default();
    let (first, second) = sibling_gates(&store, &signal, &clock);
    assert_eq!(second.state(), SessionState::Anonymous);

    let mut rx = second.subscribe();
    let _handle = second.spawn_revalidation();

    first
        .establish_session(&encode_unsigned(&json!({ "role": "academic_coordinator" })))
        .expect("establish");

    timeout(Duration::from_secs(1), rx.changed())
        .await
        .expect("storage event delivered")
        .expect("gate alive");
    assert_eq!(second.role(), Some(Role::AcademicCoordinator));
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_timer_and_listener_together() {
    let clock = ManualClock::new(NOW);
    let signal = StorageSignal::new();
    let store = MemoryCredentialStore::default()
        .with_credential(encode_unsigned(&json!({ "role": "card_admin", "exp": NOW + 10 })));
    let (first, second) = sibling_gates(&store, &signal, &clock);

    let mut rx = second.subscribe();
    let handle = second.spawn_revalidation();
    handle.shutdown().await;

    clock.advance(3600);
    let after_timer = timeout(Duration::from_secs(600), rx.changed()).await;
    assert!(after_timer.is_err(), "timer must not fire after shutdown");

    first.clear_session().expect("logout");
    let after_signal = timeout(Duration::from_secs(1), rx.changed()).await;
    assert!(after_signal.is_err(), "listener must not fire after shutdown");
    assert_eq!(second.role(), Some(Role::CardAdmin));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_cancels_the_task() {
    let clock = ManualClock::new(NOW);
    let store = MemoryCredentialStore::default()
        .with_credential(encode_unsigned(&json!({ "role": "state_admin", "exp": NOW + 10 })));
    let gate = SessionGate::builder(Arc::new(store.clone()))
        .with_clock(clock.clone())
        .build();
    let mut rx = gate.subscribe();

    drop(gate.spawn_revalidation());
    clock.advance(60);

    let outcome = timeout(Duration::from_secs(300), rx.changed()).await;
    assert!(outcome.is_err());
    assert_eq!(gate.role(), Some(Role::StateAdmin));
}
