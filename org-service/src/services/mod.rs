pub mod auth;
pub mod authz;
pub mod database;
pub mod id_codec;
pub mod token;

pub use auth::AuthService;
pub use authz::{AuthContext, AuthzService, ResourceKind};
pub use database::{Database, NewOrganization};
pub use id_codec::{IdCodec, IdDecodeError};
pub use token::{SessionClaims, TokenService, TokenStatus};
