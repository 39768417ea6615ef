#![forbid(unsafe_code)]

pub mod about;
pub mod friend_detail;
pub mod friends_page;
pub mod home;
pub mod year;
