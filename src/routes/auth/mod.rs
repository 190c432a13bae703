mod handler;
mod model;

pub use handler::{login, logout, me, refresh, register, reset_password, send_otp, verify_otp};
pub use model::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    ResetPasswordRequest, SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse,
};
