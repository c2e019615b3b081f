//! Domain entities - objects with identity owned by an aggregate

mod gallery_image;

pub use gallery_image::{GalleryImage, GalleryLimits, MAX_CAPTION_LENGTH};
