//! Applications to offers.

mod error;
mod service;
mod types;

pub use error::ApplicationError;
pub use service::{ApplicationRepository, ApplicationService};
pub use types::{Application, ApplicationStatus, NewApplication, OfferSummary};
