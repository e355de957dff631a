//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routes, middleware layers)
//!     → request.rs (request ID generation)
//!     → greetings.rs  (GET /greetings/{name})
//!     → upload::handler (POST /multipartfileuploads)
//! ```

pub mod greetings;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
