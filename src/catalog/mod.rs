pub mod endpoints;
pub mod service_publisher;

pub use endpoints::CatalogEndpoints;
pub use service_publisher::{PublishOutcome, RegistrationRequest, ServicePublisher};
