mod common;

use common::{register, streams, trio};

#[test]
fn users_all_lists_active_profiles() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let users = streams.users_all(&bob.token).unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[0].handle_str, "alicesmith");
    assert_eq!(users[0].email, "alice.smith@example.com");
    assert!(users[0].profile_img_url.ends_with("/static/default.jpg"));

    assert!(streams.user_profile(&alice.token, 99).unwrap_err().is_input());
}

#[test]
fn setname_rules() {
    let streams = streams();
    let alice = register(&streams, "Alice", "Smith");
    assert!(streams.user_setname(&alice.token, "Alice", "Smith").unwrap_err().is_input());
    assert!(streams.user_setname(&alice.token, "", "Smith").unwrap_err().is_input());
    streams.user_setname(&alice.token, "Alicia", "Smith").unwrap();

    let profile = streams.user_profile(&alice.token, alice.auth_user_id).unwrap();
    assert_eq!(profile.name_first, "Alicia");
    // Handles are not regenerated on rename.
    assert_eq!(profile.handle_str, "alicesmith");
}

#[test]
fn setemail_rules() {
    let streams = streams();
    let (alice, _, _) = trio(&streams);
    assert!(streams.user_setemail(&alice.token, "bob.jones@example.com").unwrap_err().is_input());
    assert!(streams.user_setemail(&alice.token, "alice.smith@example.com").unwrap_err().is_input());
    assert!(streams.user_setemail(&alice.token, "nope").unwrap_err().is_input());

    streams.user_setemail(&alice.token, "alice@example.org").unwrap();
    streams.login("alice@example.org", "password123").unwrap();
    assert!(streams.login("alice.smith@example.com", "password123").is_err());
}

#[test]
fn sethandle_rules() {
    let streams = streams();
    let (alice, _, _) = trio(&streams);
    assert!(streams.user_sethandle(&alice.token, "ab").unwrap_err().is_input());
    assert!(streams.user_sethandle(&alice.token, "has space").unwrap_err().is_input());
    assert!(streams.user_sethandle(&alice.token, "bobjones").unwrap_err().is_input());
    assert!(streams.user_sethandle(&alice.token, "alicesmith").unwrap_err().is_input());

    streams.user_sethandle(&alice.token, "queenalice").unwrap();
    let profile = streams.user_profile(&alice.token, alice.auth_user_id).unwrap();
    assert_eq!(profile.handle_str, "queenalice");
}

#[test]
fn admin_remove_rewrites_messages_and_revokes_access() {
    let streams = streams();
    let (alice, bob, carol) = trio(&streams);
    let channel = streams.channels_create(&bob.token, "general", true).unwrap();
    streams.channel_join(&carol.token, channel).unwrap();
    let dm = streams.dm_create(&carol.token, &[bob.auth_user_id]).unwrap();
    streams.message_send(&bob.token, channel, "bob was here").unwrap();
    streams.message_senddm(&bob.token, dm, "secret").unwrap();

    assert!(streams.admin_user_remove(&carol.token, bob.auth_user_id).unwrap_err().is_access());
    streams.admin_user_remove(&alice.token, bob.auth_user_id).unwrap();

    assert!(streams.validate_token(&bob.token).unwrap_err().is_access());
    assert!(streams.login("bob.jones@example.com", "password123").unwrap_err().is_input());

    let page = streams.channel_messages(&carol.token, channel, 0).unwrap();
    assert_eq!(page.messages[0].message, "Removed user");
    assert_eq!(streams.dm_messages(&carol.token, dm, 0).unwrap().messages[0].message, "Removed user");

    let details = streams.channel_details(&carol.token, channel).unwrap();
    assert!(details.owner_members.is_empty());
    assert_eq!(details.all_members.len(), 1);
    assert_eq!(streams.users_all(&alice.token).unwrap().len(), 2);

    let profile = streams.user_profile(&carol.token, bob.auth_user_id).unwrap();
    assert_eq!((profile.name_first.as_str(), profile.name_last.as_str()), ("Removed", "user"));

    assert!(streams.admin_user_remove(&alice.token, bob.auth_user_id).unwrap_err().is_input());

    // The freed email and handle can be reused.
    let again = register(&streams, "Bob", "Jones");
    assert_eq!(
        streams.user_profile(&again.token, again.auth_user_id).unwrap().handle_str,
        "bobjones"
    );
}

#[test]
fn only_global_owner_cannot_be_removed_or_demoted() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    assert!(streams.admin_user_remove(&alice.token, alice.auth_user_id).unwrap_err().is_input());
    assert!(
        streams
            .admin_userpermission_change(&alice.token, alice.auth_user_id, 2)
            .unwrap_err()
            .is_input()
    );

    streams.admin_userpermission_change(&alice.token, bob.auth_user_id, 1).unwrap();
    streams.admin_userpermission_change(&bob.token, alice.auth_user_id, 2).unwrap();
    assert!(streams.admin_user_remove(&alice.token, bob.auth_user_id).unwrap_err().is_access());
}

#[test]
fn permission_change_validation() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    assert!(streams.admin_userpermission_change(&alice.token, 99, 1).unwrap_err().is_input());
    assert!(streams.admin_userpermission_change(&alice.token, bob.auth_user_id, 3).unwrap_err().is_input());
    assert!(streams.admin_userpermission_change(&alice.token, bob.auth_user_id, 2).unwrap_err().is_input());
    assert!(streams.admin_userpermission_change(&bob.token, bob.auth_user_id, 1).unwrap_err().is_access());
}
