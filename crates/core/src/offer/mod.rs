//! Job offers: publication, visibility and ownership.

mod error;
mod service;
mod types;

pub use error::OfferError;
pub use service::{OfferRepository, OfferService, validate_content};
pub use types::{
    ContractType, CreateOfferInput, DisabilityCategory, ExperienceLevel, NewOffer, Offer,
    OfferStatus, RemotePolicy, UpdateOfferInput, join_set, split_set,
};
