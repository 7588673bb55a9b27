use crate::database::TxError;
use thiserror::Error;

pub const REGISTERED: &str = "회원가입이 완료되었습니다. 로그인 후 이용해 주세요.";
pub const SIGNED_UP: &str = "회원가입이 완료되어 로그인되었습니다.";
pub const LOGGED_IN: &str = "로그인되었습니다.";
pub const LOGGED_OUT: &str = "로그아웃되었습니다.";
pub const AUTH_STATE: &str = "현재 인증 상태를 반환합니다.";

/// Failures of the credential and session operations. `Display` is the
/// message shown to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("이미 가입된 이메일입니다.")]
    DuplicateUser,
    #[error("이메일 또는 키가 올바르지 않습니다.")]
    InvalidCredentials,
    #[error("저장소를 사용할 수 없습니다: {0}")]
    Storage(#[from] sled::Error),
}

impl From<TxError<AuthError>> for AuthError {
    fn from(err: TxError<AuthError>) -> Self {
        match err {
            TxError::Abort(err) => err,
            TxError::Storage(err) => AuthError::Storage(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success<T = ()> {
    pub message: &'static str,
    pub data: T,
}

impl Success {
    pub fn new(message: &'static str) -> Self {
        Success { message, data: () }
    }
}

impl<T> Success<T> {
    pub fn with_data(message: &'static str, data: T) -> Self {
        Success { message, data }
    }
}

pub type AuthResult<T = ()> = Result<Success<T>, AuthError>;
