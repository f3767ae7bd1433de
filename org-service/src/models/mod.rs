pub mod answer;
pub mod group;
pub mod owner;
pub mod prompt;
pub mod role;
pub mod service;
pub mod snippet;
pub mod user;

pub use answer::Answer;
pub use group::Group;
pub use owner::OwnerKind;
pub use prompt::Prompt;
pub use role::Role;
pub use service::Service;
pub use snippet::Snippet;
pub use user::User;
