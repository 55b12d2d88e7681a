#![cfg(test)]

pub mod config_tests;
pub mod event_tests;
