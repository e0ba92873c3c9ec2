//! AWS Signature Version 4 for S3 requests.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::context::AwsCredentials;
use crate::error::{RunError, RunResult};
use crate::ports::HttpRequest;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

fn hmac(key: &[u8], data: &str) -> RunResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|err| RunError::InvalidCommand {
        message: format!("Cannot sign request: {err}"),
    })?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Query string in canonical form: pairs encoded and sorted.
fn canonical_query(request: &HttpRequest) -> String {
    let mut pairs: Vec<(String, String)> = request
        .url
        .query_pairs()
        .map(|(key, value)| {
            (
                urlencoding::encode(&key).into_owned(),
                urlencoding::encode(&value).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn host_header(request: &HttpRequest) -> String {
    let host = request.url.host_str().unwrap_or_default();
    match request.url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Sign `request` for S3 in `region` at time `now`.
///
/// Adds `x-amz-date`, `x-amz-content-sha256`, the session token when the
/// credentials carry one, and `Authorization`. The path must already be
/// percent-encoded the way S3 expects; it is signed exactly as sent.
pub fn sign(
    request: HttpRequest,
    credentials: &AwsCredentials,
    region: &str,
    now: DateTime<Utc>,
) -> RunResult<HttpRequest> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = now.format("%Y%m%d").to_string();
    let payload_hash = sha256_hex(request.body.as_deref().unwrap_or_default());

    let mut headers = vec![
        ("host".to_string(), host_header(&request)),
        ("x-amz-content-sha256".to_string(), payload_hash.clone()),
        ("x-amz-date".to_string(), amz_date.clone()),
    ];
    if let Some(token) = &credentials.session_token {
        headers.push(("x-amz-security-token".to_string(), token.clone()));
    }
    headers.sort();

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{}\n", value.trim()))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "{method}\n{path}\n{query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}",
        method = request.method,
        path = request.url.path(),
        query = canonical_query(&request),
    );

    let scope = format!("{date_stamp}/{region}/{SERVICE}/aws4_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let secret = format!("AWS4{}", credentials.secret_access_key);
    let k_date = hmac(secret.as_bytes(), &date_stamp)?;
    let k_region = hmac(&k_date, region)?;
    let k_service = hmac(&k_region, SERVICE)?;
    let k_signing = hmac(&k_service, "aws4_request")?;
    let signature = hex::encode(hmac(&k_signing, &string_to_sign)?);

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        credentials.access_key_id
    );

    // The transport sets Host itself.
    let mut signed = request;
    for (name, value) in headers.into_iter().filter(|(name, _)| name != "host") {
        signed = signed.with_header(name, value);
    }
    Ok(signed.with_header("Authorization", authorization))
}
