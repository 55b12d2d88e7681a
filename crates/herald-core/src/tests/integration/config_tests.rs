#![cfg(test)]

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::common::{Diary, GET_UP, People, Resident, diary, read, resident_events};
use crate::config::ConfigError;
use crate::error::{Error, Result};
use crate::event::Dispatcher;
use crate::event::sorter::TieBreak;

fn build_from(path: &Path, diary: &Diary) -> Result<Dispatcher<dyn Resident, str>> {
    let mut dispatcher = Dispatcher::from_config_path(path)?;
    dispatcher.add_events(resident_events())?;
    dispatcher.add_listener(People::new("zoe", 1, diary))?;
    dispatcher.add_listener(People::new("adam", 1, diary))?;
    Ok(dispatcher)
}

#[test]
fn test_registration_tie_break_from_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("herald.json");
    fs::write(&path, r#"{ "tie_break": "registration" }"#).unwrap();

    let diary = diary();
    let mut dispatcher = build_from(&path, &diary).unwrap();
    assert_eq!(dispatcher.config().tie_break, TieBreak::Registration);

    dispatcher.trigger(GET_UP, "ready").unwrap();
    assert_eq!(
        read(&diary),
        vec!["zoe get up and say: ready", "adam get up and say: ready"]
    );
}

#[cfg(feature = "toml-config")]
#[test]
fn test_toml_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("herald.toml");
    fs::write(&path, "tie_break = \"name_ascending\"\nlistener_capacity = 2\n").unwrap();

    let diary = diary();
    let mut dispatcher = build_from(&path, &diary).unwrap();
    assert_eq!(dispatcher.config().listener_capacity, 2);

    dispatcher.trigger(GET_UP, "ready").unwrap();
    assert_eq!(
        read(&diary),
        vec!["adam get up and say: ready", "zoe get up and say: ready"]
    );
}

#[test]
fn test_bad_config_surfaces_as_crate_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("herald.json");
    fs::write(&path, "{ not json").unwrap();

    let err = build_from(&path, &diary()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Deserialization { .. })));
    let message = err.to_string();
    assert!(message.starts_with("Configuration error: Failed to deserialize config from JSON"));
}
