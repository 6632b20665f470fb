pub mod announcement;
pub mod item;

pub use announcement::{AnnouncementPayload, NEW_ARTICLE_EVENT};
pub use item::FeedItem;
