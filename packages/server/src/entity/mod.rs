pub mod author;
pub mod category;
pub mod media;
pub mod post;
pub mod post_tag;
pub mod tag;
