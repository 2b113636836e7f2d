//! Response status classification.

use crate::error::ApiError;
use crate::http::HttpResponse;

/// The success status a request expects: 200 for GET, 201 for POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expectation {
    Ok,
    Created,
}

impl Expectation {
    fn status(self) -> u16 {
        match self {
            Expectation::Ok => 200,
            Expectation::Created => 201,
        }
    }
}

/// Classifies a response into success, not-found or authentication failure.
///
/// Anything that is neither the expected status nor a 404 (401, 403, 500,
/// ...) collapses into an authentication failure. Callers depend on exactly
/// this three-way split; do not refine it.
pub(crate) fn classify(expectation: Expectation, response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        status if status == expectation.status() => Ok(()),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::authentication(format!(
            "invalid private token (status {status})"
        ))),
    }
}
