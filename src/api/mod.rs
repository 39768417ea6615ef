#![forbid(unsafe_code)]

pub mod friends_create;
pub mod friends_delete;
pub mod friends_get;
pub mod friends_list;
pub mod friends_patch;
pub mod friends_update;
