use std::sync::Arc;

pub mod config;
pub mod confirmation;
pub mod error;
pub mod identity;
pub mod link;
pub mod reference;
pub mod routes;

pub use config::IpsiConfig;
pub use confirmation::{confirmation, Confirmation, CONFIRMATION_KEYS};
pub use error::{PaymentLinkError, PaymentLinkResult};
pub use identity::{Identified, UserRef};
pub use link::{PaymentLink, PaymentLinkBuilder, PaymentRequest};
pub use reference::{sanitize_brand, MerchantReference};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<IpsiConfig>,
}

impl AppState {
    pub fn new(config: IpsiConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn link_builder(&self) -> PaymentLinkBuilder {
        PaymentLinkBuilder::new(self.config.clone())
    }
}
