// The binary entry point is main.rs; this file exposes the lesson logic so
// integration tests can drive it through `kidlessons::app::App` without a
// terminal. Some accessors are only used by the views in the binary.
#![allow(dead_code)]

pub mod app;
pub mod config;
pub mod lesson;
pub mod schedule;
pub mod ui;
pub mod yut;
