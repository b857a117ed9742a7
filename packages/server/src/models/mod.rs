pub mod author;
pub mod category;
pub mod post;
