pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod server;

pub use error::*;
pub use handlers::*;
pub use models::*;
pub use router::*;
pub use server::*;
