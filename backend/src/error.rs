use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq)]
pub enum Error {
    #[display("An internal error occured. Please try again later")]
    InternalError,
    #[display("Missing or invalid credentials")]
    Unauthorized,
    #[display("Device is not associated with the authenticated user")]
    Forbidden,
    #[display("You do not have permission to perform this action")]
    NotAdmin,
    #[display("Device not found")]
    DeviceNotFound,
    #[display("Record not found")]
    RecordNotFound,
    #[display("User not found")]
    UserNotFound,
    #[display("Api key not found")]
    ApiKeyNotFound,
    #[display("Device is not of the expected type")]
    DeviceTypeMismatch,
    #[display("Unknown device type")]
    UnknownDeviceType,
    #[display("An account with this email already exists")]
    UserAlreadyExists,
}

impl error::ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotAdmin => StatusCode::FORBIDDEN,
            Self::DeviceNotFound => StatusCode::NOT_FOUND,
            Self::RecordNotFound => StatusCode::NOT_FOUND,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::ApiKeyNotFound => StatusCode::NOT_FOUND,
            Self::DeviceTypeMismatch => StatusCode::BAD_REQUEST,
            Self::UnknownDeviceType => StatusCode::BAD_REQUEST,
            Self::UserAlreadyExists => StatusCode::CONFLICT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::DeviceNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::NotAdmin.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::DeviceTypeMismatch.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
