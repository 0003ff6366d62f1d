//! # Domain Entities Module

pub mod users;
