use std::sync::Arc;

use common_security::{menu_for, RouteDecision, RoutePolicy};
use common_session::{encode_unsigned, ManualClock, MemoryCredentialStore, Role, SessionGate};
use serde_json::json;

const NOW: i64 = 1_760_000_000;

fn gate_with(claims: serde_json::Value) -> SessionGate {
    let store = MemoryCredentialStore::default().with_credential(encode_unsigned(&claims));
    SessionGate::builder(Arc::new(store))
        .with_clock(ManualClock::new(NOW))
        .build()
}

#[test]
fn teacher_session_reaches_teacher_screens_only() {
    let gate = gate_with(json!({ "role": "teacher", "exp": NOW + 3600 }));
    let policy = RoutePolicy::default();
    let role = gate.role();
    assert_eq!(role, Some(Role::Teacher));

    assert_eq!(
        policy.decide(role.as_ref(), "/admin"),
        RouteDecision::Redirect { to: "/".into() }
    );
    assert!(matches!(
        policy.decide(role.as_ref(), "/teacher"),
        RouteDecision::Render { role: Role::Teacher, .. }
    ));
    for entry in menu_for(&Role::Teacher) {
        assert!(matches!(
            policy.decide(role.as_ref(), entry.path),
            RouteDecision::Render { .. }
        ));
    }
}

#[test]
fn logout_revokes_every_screen() {
    let gate = gate_with(json!({ "role": "center_admin" }));
    let policy = RoutePolicy::default();
    assert!(matches!(
        policy.decide(gate.role().as_ref(), "/students"),
        RouteDecision::Render { .. }
    ));

    gate.clear_session().expect("logout");
    assert_eq!(
        policy.decide(gate.role().as_ref(), "/students"),
        RouteDecision::Redirect { to: "/".into() }
    );
    assert_eq!(policy.decide(gate.role().as_ref(), "/"), RouteDecision::Landing);
}

#[test]
fn mis_cased_role_lands_on_the_login_screen() {
    let gate = gate_with(json!({ "role": "Admin" }));
    let policy = RoutePolicy::default();
    assert!(gate.state().is_authenticated());
    assert_eq!(
        policy.decide(gate.role().as_ref(), "/admin"),
        RouteDecision::Redirect { to: "/".into() }
    );
    assert_eq!(policy.decide(gate.role().as_ref(), "/"), RouteDecision::Landing);
}
