pub mod auth;

pub mod guard;

pub mod interface;

pub mod retry;
