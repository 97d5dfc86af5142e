use bevy::prelude::*;
use multi_scene::events::channel::EventChannel;

#[derive(Resource, Default)]
struct Delivered(Vec<String>);

#[test]
fn delivers_in_subscription_order() {
    let mut world = World::new();
    world.init_resource::<Delivered>();
    let mut channel: EventChannel<u32> = EventChannel::new("test");
    channel.subscribe("first", |ev: &u32, world: &mut World| {
        let v = *ev;
        world.resource_mut::<Delivered>().0.push(format!("first:{v}"));
    });
    channel.subscribe("second", |ev: &u32, world: &mut World| {
        let v = *ev;
        world.resource_mut::<Delivered>().0.push(format!("second:{v}"));
    });

    channel.publish(&7, &mut world);
    channel.publish(&8, &mut world);

    assert_eq!(
        world.resource::<Delivered>().0,
        vec!["first:7", "second:7", "first:8", "second:8"]
    );
}

#[test]
fn unsubscribe_stops_delivery() {
    let mut world = World::new();
    world.init_resource::<Delivered>();
    let mut channel: EventChannel<u32> = EventChannel::new("test");
    let first = channel.subscribe("first", |_: &u32, world: &mut World| {
        world.resource_mut::<Delivered>().0.push("first".into());
    });
    channel.subscribe("second", |_: &u32, world: &mut World| {
        world.resource_mut::<Delivered>().0.push("second".into());
    });

    assert!(channel.unsubscribe(first));
    // A second removal of the same id is a no-op.
    assert!(!channel.unsubscribe(first));

    channel.publish(&1, &mut world);
    assert_eq!(world.resource::<Delivered>().0, vec!["second"]);
    assert_eq!(channel.subscriber_count(), 1);
}

#[test]
fn publish_with_zero_subscribers_is_a_silent_noop() {
    let mut world = World::new();
    world.init_resource::<Delivered>();
    let mut channel: EventChannel<bool> = EventChannel::new("empty");

    // Must not panic and must not touch world state.
    channel.publish(&true, &mut world);

    assert!(world.resource::<Delivered>().0.is_empty());
    assert_eq!(channel.subscriber_count(), 0);
}

#[test]
fn events_published_before_subscription_are_lost() {
    let mut world = World::new();
    world.init_resource::<Delivered>();
    let mut channel: EventChannel<u32> = EventChannel::new("test");

    channel.publish(&1, &mut world);
    channel.subscribe("late", |ev: &u32, world: &mut World| {
        let v = *ev;
        world.resource_mut::<Delivered>().0.push(format!("late:{v}"));
    });
    channel.publish(&2, &mut world);

    // No buffering: only the post-subscription publish is seen.
    assert_eq!(world.resource::<Delivered>().0, vec!["late:2"]);
}
