pub mod event;
pub mod feed;

pub use event::{BaseToken, Destination, Directive, EventCode, PlayEvent, RunnerAdvance};
pub use feed::{feed_digest, parse_feed, FeedStatus, GameFeed};
