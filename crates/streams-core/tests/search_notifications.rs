mod common;

use common::{streams, trio};
use streams_types::models::NO_CONTAINER;

#[test]
fn search_covers_only_visible_containers() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let mine = streams.channels_create(&alice.token, "mine", true).unwrap();
    let theirs = streams.channels_create(&bob.token, "theirs", true).unwrap();
    let dm = streams.dm_create(&alice.token, &[bob.auth_user_id]).unwrap();

    let first = streams.message_send(&alice.token, mine, "the Rust book").unwrap();
    streams.message_send(&bob.token, theirs, "the Rust book again").unwrap();
    let second = streams.message_senddm(&bob.token, dm, "more Rust").unwrap();
    streams.message_send(&alice.token, mine, "lowercase rust").unwrap();

    let hits: Vec<_> = streams
        .search(&alice.token, "Rust")
        .unwrap()
        .into_iter()
        .map(|m| m.message_id)
        .collect();
    assert_eq!(hits, vec![second, first]);
}

#[test]
fn search_query_bounds() {
    let streams = streams();
    let (alice, _, _) = trio(&streams);
    assert!(streams.search(&alice.token, "").unwrap_err().is_input());
    assert!(streams.search(&alice.token, &"q".repeat(1001)).unwrap_err().is_input());
    assert!(streams.search("nope", "q").unwrap_err().is_access());
}

#[test]
fn tag_notifications() {
    let streams = streams();
    let (alice, bob, carol) = trio(&streams);
    let channel = streams.channels_create(&alice.token, "general", true).unwrap();
    streams.channel_join(&bob.token, channel).unwrap();

    streams
        .message_send(&alice.token, channel, "@bobjones @bobjones and @carolwhite look at this")
        .unwrap();

    let notifications = streams.notifications_get(&bob.token).unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].channel_id, channel as i64);
    assert_eq!(notifications[0].dm_id, NO_CONTAINER);
    assert_eq!(
        notifications[0].notification_message,
        "alicesmith tagged you in general: @bobjones @bobjones "
    );
    // Carol is not a member, so she is not notified.
    assert!(streams.notifications_get(&carol.token).unwrap().is_empty());
}

#[test]
fn added_and_reacted_notifications() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let channel = streams.channels_create(&alice.token, "general", false).unwrap();
    streams.channel_invite(&alice.token, channel, bob.auth_user_id).unwrap();
    let dm = streams.dm_create(&alice.token, &[bob.auth_user_id]).unwrap();

    let id = streams.message_senddm(&bob.token, dm, "hi alice").unwrap();
    streams.message_react(&alice.token, id, 1).unwrap();

    let texts: Vec<_> = streams
        .notifications_get(&bob.token)
        .unwrap()
        .into_iter()
        .map(|n| n.notification_message)
        .collect();
    assert_eq!(
        texts,
        vec![
            "alicesmith reacted to your message in alicesmith, bobjones",
            "alicesmith added you to alicesmith, bobjones",
            "alicesmith added you to general",
        ]
    );
}

#[test]
fn notifications_are_capped_newest_first() {
    let streams = streams();
    let (alice, bob, _) = trio(&streams);
    let channel = streams.channels_create(&alice.token, "general", true).unwrap();
    streams.channel_join(&bob.token, channel).unwrap();

    for i in 0..25 {
        streams.message_send(&alice.token, channel, &format!("@bobjones {}", i)).unwrap();
    }
    let notifications = streams.notifications_get(&bob.token).unwrap();
    assert_eq!(notifications.len(), 20);
    assert!(notifications[0].notification_message.ends_with("@bobjones 24"));
    assert!(notifications[19].notification_message.ends_with("@bobjones 5"));
}
