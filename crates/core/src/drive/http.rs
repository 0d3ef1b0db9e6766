//! Request plumbing shared by the vendor adapters.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::error::{DriveError, VendorFailure};

/// Maps a message into the error of the operation being performed.
pub(crate) type ErrorKind = fn(String) -> DriveError;

/// Sends an authorized request and rejects non-2xx responses.
pub(crate) async fn send(
    request: RequestBuilder,
    token: &str,
    kind: ErrorKind,
) -> Result<Response, DriveError> {
    let response = request
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| kind(e.to_string()))?;

    if response.status().is_success() {
        Ok(response)
    } else {
        Err(VendorFailure::read(response).await.into_error(kind))
    }
}

/// Like [`send`], but yields `None` on 404.
pub(crate) async fn send_optional(
    request: RequestBuilder,
    token: &str,
    kind: ErrorKind,
) -> Result<Option<Response>, DriveError> {
    let response = request
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| kind(e.to_string()))?;

    match response.status() {
        status if status.is_success() => Ok(Some(response)),
        StatusCode::NOT_FOUND => Ok(None),
        _ => Err(VendorFailure::read(response).await.into_error(kind)),
    }
}

/// Decodes a JSON body.
pub(crate) async fn json<T: DeserializeOwned>(
    response: Response,
    kind: ErrorKind,
) -> Result<T, DriveError> {
    response
        .json::<T>()
        .await
        .map_err(|e| kind(format!("unexpected response body: {e}")))
}

/// Reads a text body.
pub(crate) async fn text(response: Response, kind: ErrorKind) -> Result<String, DriveError> {
    response.text().await.map_err(|e| kind(e.to_string()))
}
