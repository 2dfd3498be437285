//! Maps transfer failures onto `ErrorKind`.

use super::error::TransferError;
use super::policy::ErrorKind;

pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::RateLimited,
        500..=599 => ErrorKind::Server(code as u16),
        _ => ErrorKind::Permanent,
    }
}

/// Timeouts and connection-level failures are transient; everything else
/// (bad URL, TLS setup, aborted by our write callback) is not.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    let network = [
        e.is_couldnt_connect(),
        e.is_couldnt_resolve_host(),
        e.is_couldnt_resolve_proxy(),
        e.is_send_error(),
        e.is_recv_error(),
        e.is_read_error(),
        e.is_got_nothing(),
        e.is_partial_file(),
    ];
    if e.is_operation_timedout() {
        ErrorKind::Timeout
    } else if network.iter().any(|hit| *hit) {
        ErrorKind::Network
    } else {
        ErrorKind::Permanent
    }
}

pub fn classify(e: &TransferError) -> ErrorKind {
    match e {
        TransferError::Curl(ce) => classify_curl_error(ce),
        TransferError::Http(code) => classify_http_status(*code),
        TransferError::PartialTransfer { .. } => ErrorKind::Network,
        TransferError::Storage(_) => ErrorKind::Permanent,
    }
}
