//! Blocking libcurl requests for backend REST calls.

use super::BackendError;
use std::time::Duration;

pub(crate) struct Request<'a> {
    pub url: &'a str,
    pub bearer: Option<&'a str>,
    /// `application/x-www-form-urlencoded` body; turns the request into a POST.
    pub form: Option<&'a str>,
    pub timeout: Duration,
}

pub(crate) struct Response {
    pub status: u32,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        serde_json::from_slice(&self.body).map_err(|source| BackendError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Sends `req`, buffering the whole body.
pub(crate) fn send(req: &Request<'_>) -> Result<Response, BackendError> {
    let mut body = Vec::new();
    let status = stream(req, |data| {
        body.extend_from_slice(data);
        Ok(())
    })?;
    Ok(Response { status, body })
}

/// Sends `req`, handing each body chunk to `sink`. Returns the final status.
/// An error from `sink` aborts the transfer and is returned as-is.
pub(crate) fn stream(
    req: &Request<'_>,
    mut sink: impl FnMut(&[u8]) -> Result<(), BackendError>,
) -> Result<u32, BackendError> {
    let url = req.url;
    let curl_err = |source: curl::Error| BackendError::Transfer {
        url: url.to_string(),
        source,
    };

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(curl_err)?;
    easy.follow_location(true).map_err(curl_err)?;
    easy.timeout(req.timeout).map_err(curl_err)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json").map_err(curl_err)?;
    if let Some(token) = req.bearer {
        list.append(&format!("Authorization: Bearer {}", token))
            .map_err(curl_err)?;
    }
    if let Some(form) = req.form {
        easy.post(true).map_err(curl_err)?;
        easy.post_fields_copy(form.as_bytes()).map_err(curl_err)?;
        list.append("Content-Type: application/x-www-form-urlencoded")
            .map_err(curl_err)?;
        list.append("Expect:").map_err(curl_err)?;
    }
    easy.http_headers(list).map_err(curl_err)?;

    let mut sink_err: Option<BackendError> = None;
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match sink(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    sink_err = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(curl_err)?;
        transfer.perform()
    };

    if let Some(e) = sink_err {
        return Err(e);
    }
    performed.map_err(curl_err)?;

    let code = easy.response_code().map_err(curl_err)?;
    tracing::debug!(url, status = code, post = req.form.is_some(), "backend request");
    Ok(code)
}
