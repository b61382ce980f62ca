//! Marketing handlers.
//!
//! ## Commands
//! - `SubmitLeadHandler` - Public enquiry form
//! - `UpdateLeadHandler` - Admin follow-up
//! - `NewsletterHandler` - Subscribe and unsubscribe
//!
//! ## Queries
//! - `ListLeadsHandler` - Admin lead inbox

mod list_leads;
mod newsletter;
mod submit_lead;
mod update_lead;

pub use list_leads::{ListLeadsHandler, ListLeadsQuery};
pub use newsletter::{NewsletterCommand, NewsletterHandler};
pub use submit_lead::{SubmitLeadCommand, SubmitLeadHandler};
pub use update_lead::{UpdateLeadCommand, UpdateLeadHandler};
