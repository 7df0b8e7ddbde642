//! Supporting files attached to accounting entries.

mod error;
mod service;
mod types;

pub use error::AttachmentError;
pub use service::{AttachmentRepository, AttachmentService};
pub use types::{Attachment, FileUpload, NewAttachment};
