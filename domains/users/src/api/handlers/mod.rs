//! HTTP handlers for the user domain

pub mod auth;
