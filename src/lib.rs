/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 14/10/26
******************************************************************************/

pub mod config;

mod constants;

pub mod error;

pub mod application;

pub mod session;

pub mod storage;

pub mod transport;

pub mod utils;
