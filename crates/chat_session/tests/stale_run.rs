mod support;

use chat_session::{PersistenceMode, SessionController, SessionState, Settled, Ticket};
use chat_store::Role;
use support::{store_with_key, HostStub, UiStub, TEST_KEY};

#[test]
fn completion_settling_after_clear_is_ignored() {
    let mut controller =
        SessionController::start(UiStub::default(), store_with_key(TEST_KEY), PersistenceMode::InMemory);
    let mut host = HostStub::default();

    let stale = controller
        .on_submit("first question", &mut host)
        .expect("submission accepted");
    controller.on_clear();
    assert_eq!(controller.state(), SessionState::Idle);
    assert_eq!(controller.generation(), stale.generation + 1);

    assert_eq!(
        controller.on_completion_settled(stale, Ok("late answer".to_string())),
        Settled::Stale
    );
    assert!(controller.log().is_empty());

    let active = controller
        .on_submit("second question", &mut host)
        .expect("submission accepted after clear");
    assert_ne!(active, stale);

    let snapshot = controller.log().to_vec();
    assert_eq!(
        controller.on_completion_settled(stale, Ok("late answer".to_string())),
        Settled::Stale
    );
    assert_eq!(controller.log(), snapshot.as_slice());
    assert_eq!(controller.state(), SessionState::AwaitingResponse { ticket: active });

    assert_eq!(
        controller.on_completion_settled(active, Ok("fresh answer".to_string())),
        Settled::Applied
    );
    let roles: Vec<Role> = controller.log().iter().map(|message| message.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(controller.log()[1].content, "fresh answer");
}

#[test]
fn ticket_from_the_same_generation_with_another_request_id_is_stale() {
    let mut controller =
        SessionController::start(UiStub::default(), store_with_key(TEST_KEY), PersistenceMode::InMemory);
    let mut host = HostStub::default();

    let active = controller.on_submit("question", &mut host).expect("accepted");
    let forged = Ticket {
        request_id: active.request_id + 1,
        generation: active.generation,
    };

    assert_eq!(
        controller.on_completion_settled(forged, Ok("nope".to_string())),
        Settled::Stale
    );
    assert!(controller.is_waiting());
    assert_eq!(controller.log().len(), 1);
}

#[test]
fn settling_twice_applies_once() {
    let mut controller =
        SessionController::start(UiStub::default(), store_with_key(TEST_KEY), PersistenceMode::InMemory);
    let mut host = HostStub::default();

    let ticket = controller.on_submit("question", &mut host).expect("accepted");
    assert_eq!(
        controller.on_completion_settled(ticket, Ok("answer".to_string())),
        Settled::Applied
    );
    assert_eq!(
        controller.on_completion_settled(ticket, Ok("answer again".to_string())),
        Settled::Stale
    );
    assert_eq!(controller.log().len(), 2);
}
