use std::io;

/// Placeholder used when the OS reports no error code.
pub const UNKNOWN_CODE: &str = "Unknown";

/// Split an I/O error into its OS code and message, like `errno`/`strerror`.
pub fn describe(err: &io::Error) -> (String, String) {
    let code = err
        .raw_os_error()
        .map_or_else(|| UNKNOWN_CODE.to_string(), |code| code.to_string());

    let rendered = err.to_string();
    let message = match rendered.split_once(" (os error") {
        Some((message, _)) => message.to_string(),
        None => rendered,
    };

    (code, message)
}
