//! Portal TCC client widgets: a streaming chat assistant and a CSV uploader.
//!
//! The controllers in [`chat`] and [`upload`] hold all behaviour and drive
//! small surface traits; [`views`] binds those traits to Dioxus signals.
pub mod chat;
pub mod config;
pub mod types;
pub mod ui;
pub mod upload;
pub mod views;
