// Authentication module
// Provides JWT-based authentication with user registration and login

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use handlers::{login_handler, register_handler};
pub use middleware::{require_auth, AuthenticatedUser};
pub use models::{LoginRequest, LoginResponse, RegisterRequest, User};
pub use service::AuthService;
pub use token::{Claims, TokenService};
