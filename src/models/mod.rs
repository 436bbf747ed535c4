//! Data models for the studio server

pub mod admin;
pub mod availability;
pub mod booking;
pub mod entity;
pub mod gallery;
pub mod package;
pub mod page;
pub mod photography_type;
pub mod portfolio;
pub mod settings;

// Re-export commonly used types
pub use availability::{AvailabilitySlot, BookedDay, SlotStatus};
pub use entity::{Entity, EntityPatch, Form, ImageEntity, ListFilter, Upload};
pub use gallery::GalleryImage;
pub use package::Package;
pub use photography_type::{Category, PhotographyType};
pub use portfolio::PortfolioPhoto;
pub use settings::SiteSettings;
