pub mod err_response;
pub mod follower;
pub mod page;
pub mod user;

pub use err_response::ErrResponse;
pub use follower::Follower;
pub use page::{FollowersPage, Includes, PageMeta};
pub use user::User;
