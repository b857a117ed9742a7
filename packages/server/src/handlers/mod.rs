pub mod author;
pub mod category;
pub mod media;
pub mod post;
pub mod tag;
