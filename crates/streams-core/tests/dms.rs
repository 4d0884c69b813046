mod common;

use common::{streams, trio};

#[test]
fn dm_name_is_sorted_handles() {
    let streams = streams();
    let (alice, bob, carol) = trio(&streams);
    let dm = streams.dm_create(&carol.token, &[bob.auth_user_id, alice.auth_user_id]).unwrap();

    let details = streams.dm_details(&alice.token, dm).unwrap();
    assert_eq!(details.name, "alicesmith, bobjones, carolwhite");
    assert_eq!(details.members.len(), 3);
    assert_eq!(streams.dm_list(&bob.token).unwrap()[0].name, details.name);
}

#[test]
fn dm_with_no_invitees_contains_creator() {
    let streams = streams();
    let (alice, _, _) = trio(&streams);
    let dm = streams.dm_create(&alice.token, &[]).unwrap();
    let details = streams.dm_details(&alice.token, dm).unwrap();
    assert_eq!(details.name, "alicesmith");
    assert_eq!(details.members[0].u_id, alice.auth_user_id);
}

#[test]
fn dm_create_rejects_bad_members() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    assert!(streams.dm_create(&alice.token, &[42]).unwrap_err().is_input());
    assert!(
        streams
            .dm_create(&alice.token, &[bob.auth_user_id, bob.auth_user_id])
            .unwrap_err()
            .is_input()
    );
    assert!(streams.dm_create(&alice.token, &[alice.auth_user_id]).unwrap_err().is_input());
}

#[test]
fn only_creator_removes() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let dm = streams.dm_create(&bob.token, &[alice.auth_user_id]).unwrap();
    let id = streams.message_senddm(&alice.token, dm, "hello").unwrap();

    assert!(streams.dm_remove(&alice.token, dm).unwrap_err().is_access());
    assert!(streams.dm_remove(&bob.token, 9).unwrap_err().is_input());
    streams.dm_remove(&bob.token, dm).unwrap();

    assert!(streams.dm_details(&alice.token, dm).unwrap_err().is_input());
    assert!(streams.message_edit(&alice.token, id, "still here?").unwrap_err().is_input());
    assert!(streams.dm_list(&alice.token).unwrap().is_empty());
}

#[test]
fn creator_who_left_cannot_remove() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let dm = streams.dm_create(&bob.token, &[alice.auth_user_id]).unwrap();
    streams.dm_leave(&bob.token, dm).unwrap();
    assert!(streams.dm_remove(&bob.token, dm).unwrap_err().is_access());
}

#[test]
fn leave_keeps_dm_for_others() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let dm = streams.dm_create(&alice.token, &[bob.auth_user_id]).unwrap();
    streams.message_senddm(&alice.token, dm, "before leaving").unwrap();

    streams.dm_leave(&alice.token, dm).unwrap();
    assert!(streams.dm_leave(&alice.token, dm).unwrap_err().is_access());
    assert!(streams.dm_messages(&alice.token, dm, 0).unwrap_err().is_access());

    let details = streams.dm_details(&bob.token, dm).unwrap();
    assert_eq!(details.name, "alicesmith, bobjones");
    assert_eq!(details.members.len(), 1);
    assert_eq!(streams.dm_messages(&bob.token, dm, 0).unwrap().messages.len(), 1);
}

#[test]
fn senddm_requires_membership() {
    let streams = streams();
    let (alice, bob, carol) = trio(&streams);
    let dm = streams.dm_create(&alice.token, &[bob.auth_user_id]).unwrap();
    assert!(streams.message_senddm(&carol.token, dm, "let me in").unwrap_err().is_access());
    assert!(streams.message_senddm(&carol.token, 77, "anyone?").unwrap_err().is_input());
}
