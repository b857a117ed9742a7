pub mod auth;
pub mod publishing;

pub use auth::{AuthError, AuthService, NewAuthor};
pub use publishing::{
    MediaPayload, MediaUpload, NewPost, PostView, PublishError, PublishingService,
};
