//! Image upload handlers.
//!
//! ## Commands
//! - `UploadImagesHandler` - Validates and stores up to ten images
//! - `DeleteImageHandler` - Removes a stored image (admin)

mod delete_image;
mod upload_images;

pub use delete_image::{DeleteImageCommand, DeleteImageHandler};
pub use upload_images::{
    ImageFile, UploadFolder, UploadImagesCommand, UploadImagesHandler, MAX_FILES_PER_REQUEST,
};
