//! Messages module: templates, logo, attachment and the per-recipient payload.

mod attachment;
mod composer;
mod errors;
mod logo;
mod payload;
mod template;

pub use attachment::{Attachment, PDF_CONTENT_TYPE};
pub use composer::compose;
pub use errors::{AttachmentError, LogoError};
pub use logo::{Logo, LOGO_CANDIDATES};
pub use payload::MessagePayload;
pub use template::{MessageTemplate, LOGO_PLACEHOLDER};
