//! Data models module

pub mod submission;
pub mod user;

pub use submission::{Answers, CapaType, FilesInfo, Submission, UserInfo};
pub use user::FlowUser;
