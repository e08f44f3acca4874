// Error types shared by the API wrappers, the selection parser and the
// interactive flow. Every variant ends the run; the binary turns them into a
// message for the operator.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single call against the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS or any other failure before a response arrived.
    #[error("{endpoint}: request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The client-side timeout configured for the endpoint expired.
    #[error("{endpoint}: no response within {}s", .limit.as_secs())]
    Timeout {
        endpoint: &'static str,
        limit: Duration,
    },

    /// The server answered with a non-2xx status.
    #[error("{endpoint}: HTTP {status} - {body}")]
    Http {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    /// A 2xx response that does not carry what the contract promises.
    #[error("{endpoint}: unexpected response: {detail}")]
    Shape {
        endpoint: &'static str,
        detail: String,
    },
}

/// Operator typed something that is not a valid menu selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no numbers entered")]
    Empty,

    #[error("'{0}' is not a number; enter numbers separated by commas")]
    NotANumber(String),

    #[error("{index} is outside the listed range 1..={max}")]
    OutOfRange { index: i64, max: usize },

    #[error("entry {index} has no id and cannot be selected")]
    NoId { index: usize },
}

/// Reason the interactive run stopped before displaying orders.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid {what} selection: {source}")]
    Selection {
        what: &'static str,
        #[source]
        source: SelectionError,
    },

    /// A listing step came back with nothing to choose from.
    #[error("no {0} returned")]
    Empty(&'static str),

    #[error("failed to read operator input: {0}")]
    Input(#[source] std::io::Error),

    #[error("failed to write to console: {0}")]
    Output(#[from] std::io::Error),
}
