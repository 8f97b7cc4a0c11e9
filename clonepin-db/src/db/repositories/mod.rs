pub mod comment_repository;
pub mod follow_repository;

pub use comment_repository::CommentRepository;
pub use follow_repository::FollowRepository;
