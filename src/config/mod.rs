//! Configuration module

mod site;

pub use site::FeedConfig;
pub use site::FeedsConfig;
pub use site::MarkdownConfig;
pub use site::MessagesConfig;
pub use site::MountOrder;
pub use site::RevealConfig;
pub use site::SiteConfig;
pub use site::TransitionConfig;
