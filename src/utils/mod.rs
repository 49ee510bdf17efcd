pub mod job;

pub mod logger;
