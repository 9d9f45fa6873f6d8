//! Value objects - immutable types that represent domain concepts

mod ids;
mod polarity;

pub use ids::{CommentId, IdParseError, ThreadId, UserId};
pub use polarity::Polarity;
