pub mod session_store;

pub mod targets_csv;
