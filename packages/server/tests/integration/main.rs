mod auth;
mod category;
mod media;
mod post;
