pub mod domain;
pub mod ports;

pub use domain::{Book, Review, UpsertOutcome, User};
pub use ports::{
    CatalogService, CredentialStore, CredentialVerifier, PortError, PortResult, ReviewStore,
    SessionBinder, TokenService,
};
