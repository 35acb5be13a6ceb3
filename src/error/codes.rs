/// Error code registry for populator
///
/// Error codes are organized by category:
/// - 1000-1999: Option errors (paths, configuration)
/// - 2000-2999: Unique key errors
/// - 3000-3999: Callback errors
pub struct ErrorCode;

impl ErrorCode {
    // Option errors (1000-1999)
    pub const OPTIONS_EMPTY_PATH: u16 = 1001;
    pub const OPTIONS_EMPTY_SEGMENT: u16 = 1002;
    pub const OPTIONS_INVALID_INDEX: u16 = 1003;

    // Unique key errors (2000-2999)
    pub const KEY_NOT_STRINGABLE: u16 = 2001;

    // Callback errors (3000-3999)
    pub const CALLBACK_USE_FAILED: u16 = 3001;
    pub const CALLBACK_EACH_FAILED: u16 = 3002;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::OPTIONS_EMPTY_PATH => "Path is empty",
        ErrorCode::OPTIONS_EMPTY_SEGMENT => "Path contains an empty segment",
        ErrorCode::OPTIONS_INVALID_INDEX => "Path contains a malformed array index",
        ErrorCode::KEY_NOT_STRINGABLE => "Path value is not string-able",
        ErrorCode::CALLBACK_USE_FAILED => "Aggregate callback failed",
        ErrorCode::CALLBACK_EACH_FAILED => "Per-item callback failed",
        _ => "Unknown error",
    }
}
