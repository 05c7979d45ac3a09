use reqwest::StatusCode;

use crate::{create_error, Error};

impl Error {
    /// Map an unsuccessful HTTP status onto an error
    pub fn from_status(status: StatusCode) -> Error {
        match status {
            StatusCode::UNAUTHORIZED => create_error!(NotAuthenticated),
            StatusCode::FORBIDDEN => create_error!(NotPrivileged),
            StatusCode::NOT_FOUND => create_error!(UnknownIssue),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
                create_error!(FailedValidation {
                    error: status
                        .canonical_reason()
                        .unwrap_or("rejected by server")
                        .to_string(),
                })
            }
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                create_error!(RequestTimedOut)
            }
            _ => create_error!(RequestFailed {
                status: status.as_u16(),
            }),
        }
    }

    /// Map a transport level failure onto an error
    pub fn from_transport(error: &reqwest::Error) -> Error {
        if error.is_timeout() {
            create_error!(RequestTimedOut)
        } else if error.is_decode() {
            create_error!(InvalidResponse)
        } else if let Some(status) = error.status() {
            Error::from_status(status)
        } else {
            create_error!(NetworkError)
        }
    }
}
