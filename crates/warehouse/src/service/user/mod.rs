mod command;
mod query;

pub use self::command::UserCommandService;
pub use self::query::{UserQueryService, UserQueryServiceDeps};
