//! Feed module - cards, containers and the per-feed render pipeline

mod card;
mod container;
mod controller;
mod item;

pub use card::{Card, GameCard, PreviewSlot, ACTIVATION_ATTR};
pub use container::Container;
pub use controller::{FeedController, FeedOutcome, FeedReport};
pub use item::ItemRenderer;
