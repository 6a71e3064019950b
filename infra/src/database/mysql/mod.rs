//! MySQL repository implementations

pub mod account_repository_impl;
pub mod message_repository_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use message_repository_impl::MySqlMessageRepository;
