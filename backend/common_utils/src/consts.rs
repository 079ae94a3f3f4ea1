/// Base64 engine used for identifier encoding and Basic auth headers.
pub const BASE64_ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;
