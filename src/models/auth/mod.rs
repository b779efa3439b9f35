pub mod requests;
pub mod responses;

pub use requests::{
    LoginRequest, LogoutRequest, RegisterRequest, TokenRefreshRequest, TokenVerifyRequest,
};
pub use responses::{
    AccessTokenResponse, AuthResponse, AuthUser, TokenPairResponse, UserInfoResponse,
};
