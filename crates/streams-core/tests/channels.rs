mod common;

use common::{streams, trio};

#[test]
fn creator_is_owner_and_member() {
    let streams = streams();
    let (alice, _, _) = trio(&streams);
    let channel = streams.channels_create(&alice.token, "general", true).unwrap();

    let details = streams.channel_details(&alice.token, channel).unwrap();
    assert_eq!(details.name, "general");
    assert!(details.is_public);
    assert_eq!(details.owner_members.len(), 1);
    assert_eq!(details.all_members[0].u_id, alice.auth_user_id);
}

#[test]
fn channel_name_bounds() {
    let streams = streams();
    let (alice, _, _) = trio(&streams);
    assert!(streams.channels_create(&alice.token, "", true).unwrap_err().is_input());
    assert!(
        streams
            .channels_create(&alice.token, &"n".repeat(21), true)
            .unwrap_err()
            .is_input()
    );
    assert!(streams.channels_create("bad-token", "general", true).unwrap_err().is_access());
}

#[test]
fn list_and_listall() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    streams.channels_create(&alice.token, "public", true).unwrap();
    streams.channels_create(&alice.token, "private", false).unwrap();
    streams.channels_create(&bob.token, "bobs", true).unwrap();

    let mine: Vec<_> = streams
        .channels_list(&alice.token)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(mine, vec!["public", "private"]);
    assert_eq!(streams.channels_listall(&bob.token).unwrap().len(), 3);
}

#[test]
fn leaving_empties_channel_but_keeps_it() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let channel = streams.channels_create(&alice.token, "general", true).unwrap();

    streams.channel_leave(&alice.token, channel).unwrap();
    assert!(streams.channel_details(&alice.token, channel).unwrap_err().is_access());

    streams.channel_join(&bob.token, channel).unwrap();
    let details = streams.channel_details(&bob.token, channel).unwrap();
    assert!(details.owner_members.is_empty());
    assert!(details.all_members.iter().all(|u| u.u_id != alice.auth_user_id));
    assert_eq!(details.all_members.len(), 1);
}

#[test]
fn join_rules() {
    let streams = streams();
    let (alice, bob, carol) = trio(&streams);
    let private = streams.channels_create(&bob.token, "secret", false).unwrap();

    assert!(streams.channel_join(&carol.token, private).unwrap_err().is_access());
    assert!(streams.channel_join(&bob.token, private).unwrap_err().is_input());
    assert!(streams.channel_join(&carol.token, 99).unwrap_err().is_input());

    // Global owners may join private channels.
    streams.channel_join(&alice.token, private).unwrap();
}

#[test]
fn invite_rules() {
    let streams = streams();
    let (alice, bob, carol) = trio(&streams);
    let channel = streams.channels_create(&alice.token, "general", false).unwrap();

    assert!(streams.channel_invite(&bob.token, channel, carol.auth_user_id).unwrap_err().is_access());
    assert!(streams.channel_invite(&alice.token, channel, 99).unwrap_err().is_input());
    assert!(streams.channel_invite(&alice.token, 99, bob.auth_user_id).unwrap_err().is_input());

    streams.channel_invite(&alice.token, channel, bob.auth_user_id).unwrap();
    assert!(streams.channel_invite(&alice.token, channel, bob.auth_user_id).unwrap_err().is_input());

    // Any member may invite.
    streams.channel_invite(&bob.token, channel, carol.auth_user_id).unwrap();
    assert_eq!(streams.channel_details(&carol.token, channel).unwrap().all_members.len(), 3);
}

#[test]
fn owner_management() {
    let streams = streams();
    let (alice, bob, carol) = trio(&streams);
    let channel = streams.channels_create(&bob.token, "general", true).unwrap();
    streams.channel_join(&carol.token, channel).unwrap();

    assert!(streams.channel_addowner(&carol.token, channel, carol.auth_user_id).unwrap_err().is_access());
    // Global owner who is not a member has no channel owner rights.
    assert!(streams.channel_addowner(&alice.token, channel, carol.auth_user_id).unwrap_err().is_access());
    assert!(streams.channel_addowner(&bob.token, channel, alice.auth_user_id).unwrap_err().is_input());
    assert!(streams.channel_addowner(&bob.token, channel, bob.auth_user_id).unwrap_err().is_input());

    streams.channel_addowner(&bob.token, channel, carol.auth_user_id).unwrap();
    assert_eq!(streams.channel_details(&bob.token, channel).unwrap().owner_members.len(), 2);

    streams.channel_removeowner(&carol.token, channel, bob.auth_user_id).unwrap();
    assert!(streams.channel_removeowner(&carol.token, channel, bob.auth_user_id).unwrap_err().is_input());
    assert!(streams.channel_removeowner(&carol.token, channel, carol.auth_user_id).unwrap_err().is_input());

    // A global owner who joins gets owner rights without being listed.
    streams.channel_join(&alice.token, channel).unwrap();
    streams.channel_addowner(&alice.token, channel, bob.auth_user_id).unwrap();
    streams.channel_removeowner(&alice.token, channel, carol.auth_user_id).unwrap();
    let owners: Vec<_> = streams
        .channel_details(&alice.token, channel)
        .unwrap()
        .owner_members
        .into_iter()
        .map(|u| u.u_id)
        .collect();
    assert_eq!(owners, vec![bob.auth_user_id]);
}

#[test]
fn non_member_cannot_read_messages() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let channel = streams.channels_create(&alice.token, "general", true).unwrap();
    assert!(streams.channel_messages(&bob.token, channel, 0).unwrap_err().is_access());
    assert!(streams.channel_messages(&bob.token, 42, 0).unwrap_err().is_input());
}
