#![cfg(test)]

use std::sync::Arc;

use super::common::{
    BACK_HOME, Diary, GET_UP, GO_TO_WORK, People, Resident, Rooster, diary, read, resident_events,
};
use crate::event::error::EventSystemError;
use crate::event::{Dispatcher, SharedDispatcher};

fn people_dispatcher(diary: &Diary) -> Dispatcher<dyn Resident, str> {
    let mut dispatcher: Dispatcher<dyn Resident, str> = Dispatcher::new();
    dispatcher.add_events(resident_events()).unwrap();
    dispatcher.add_listener(People::new("foo", 2, diary)).unwrap();
    // bar keeps the default priority
    dispatcher.add_listener(People::new("bar", 0, diary)).unwrap();
    dispatcher
}

#[test]
fn test_people_scenario() {
    let diary = diary();
    let mut dispatcher = people_dispatcher(&diary);

    dispatcher.trigger(GET_UP, "what a beautiful day").unwrap();
    dispatcher.trigger(GO_TO_WORK, "I like my work").unwrap();
    dispatcher.trigger(BACK_HOME, "kiss my little baby girl").unwrap();

    assert_eq!(
        read(&diary),
        vec![
            "foo get up and say: what a beautiful day",
            "bar get up and say: what a beautiful day",
            "foo go to work and say: I like my work",
            "bar go to work and say: I like my work",
            "foo back home and say: kiss my little baby girl",
            "bar back home and say: kiss my little baby girl",
        ]
    );
}

#[test]
fn test_people_duplicate_name() {
    let diary = diary();
    let mut dispatcher = people_dispatcher(&diary);
    let err = dispatcher.add_listener(People::new("foo", 9, &diary)).unwrap_err();
    assert!(matches!(err, EventSystemError::ListenerExists { .. }));
    assert!(dispatcher.add_events(resident_events()).is_err());
}

#[test]
fn test_mixed_listener_types() {
    let diary = diary();
    let mut dispatcher = people_dispatcher(&diary);
    dispatcher
        .add_listener(Arc::new(Rooster {
            diary: Arc::clone(&diary),
        }))
        .unwrap();

    assert_eq!(dispatcher.trigger(GET_UP, "morning").unwrap(), 3);
    assert_eq!(dispatcher.trigger(GO_TO_WORK, "off we go").unwrap(), 2);
    assert_eq!(
        read(&diary),
        vec![
            "rooster crows",
            "foo get up and say: morning",
            "bar get up and say: morning",
            "foo go to work and say: off we go",
            "bar go to work and say: off we go",
        ]
    );
}

#[test]
fn test_same_registrations_same_order_across_instances() {
    let register = || {
        let diary = diary();
        let mut dispatcher: Dispatcher<dyn Resident, str> = Dispatcher::new();
        dispatcher.add_events(resident_events()).unwrap();
        let roster = [("carol", 1), ("alice", 1), ("bob", 1), ("dave", 0)];
        let residents: Vec<Arc<dyn Resident>> = roster
            .into_iter()
            .map(|(name, priority)| People::new(name, priority, &diary) as Arc<dyn Resident>)
            .collect();
        dispatcher.add_listeners(residents).unwrap();
        dispatcher.trigger(GET_UP, "hi").unwrap();
        dispatcher.trigger(GET_UP, "again").unwrap();
        read(&diary)
    };

    let first = register();
    for _ in 0..5 {
        assert_eq!(register(), first);
    }
    assert_eq!(
        first,
        vec![
            "alice get up and say: hi",
            "bob get up and say: hi",
            "carol get up and say: hi",
            "dave get up and say: hi",
            "alice get up and say: again",
            "bob get up and say: again",
            "carol get up and say: again",
            "dave get up and say: again",
        ]
    );
}

#[test]
fn test_listener_leaving_mid_day() {
    let diary = diary();
    let mut dispatcher = people_dispatcher(&diary);

    dispatcher.trigger(GET_UP, "up").unwrap();
    let foo = dispatcher.del_listener("foo").unwrap();
    assert_eq!(foo.name(), "foo");
    dispatcher.trigger(GO_TO_WORK, "alone").unwrap();

    assert_eq!(
        read(&diary),
        vec![
            "foo get up and say: up",
            "bar get up and say: up",
            "bar go to work and say: alone",
        ]
    );
}

#[test]
fn test_shared_people_dispatcher() {
    let diary = diary();
    let shared = SharedDispatcher::from(people_dispatcher(&diary));

    let worker = shared.clone();
    std::thread::spawn(move || worker.trigger(GET_UP, "from a thread"))
        .join()
        .unwrap()
        .unwrap();

    assert_eq!(
        read(&diary),
        vec![
            "foo get up and say: from a thread",
            "bar get up and say: from a thread",
        ]
    );
}
