//! `/aws` family: S3 bucket listings and object previews.
//!
//! Requests go through the execution context like every other command and
//! are signed with the context's AWS credentials.

mod listing;
mod sigv4;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::context::{AwsCredentials, ExecutionContext};
use crate::error::{ParseError, ParseResult, RunError, RunResult};
use crate::html::escape_html;
use crate::ports::{HttpRequest, HttpResponse};
use crate::result::CommandResult;

use super::{Command, params};

/// Parse `/aws s3` or `/aws s3 object`.
pub fn parse(subcommands: &[&str], params: &str) -> ParseResult<Command> {
    match subcommands {
        ["s3"] => AwsS3Command::parse(params).map(Command::AwsS3),
        ["s3", "object"] => AwsS3ObjectCommand::parse(params).map(Command::AwsS3Object),
        _ => Err(ParseError::UnknownSubcommand {
            family: "aws",
            subcommands: subcommands.iter().map(ToString::to_string).collect(),
        }),
    }
}

fn check_bucket(bucket: &str) -> ParseResult<()> {
    let valid = (3..=63).contains(&bucket.len())
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        && !bucket.starts_with(['-', '.'])
        && !bucket.ends_with(['-', '.']);
    if valid {
        Ok(())
    } else {
        Err(ParseError::InvalidField {
            field: "bucket",
            value: bucket.to_string(),
            reason: "expected an S3 bucket name",
        })
    }
}

fn check_region(region: &str) -> ParseResult<()> {
    let valid = !region.is_empty()
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ParseError::InvalidField {
            field: "region",
            value: region.to_string(),
            reason: "expected an AWS region such as us-east-1",
        })
    }
}

/// A key must be non-empty and free of `.` and `..` segments, which URL
/// normalization would collapse into a different object.
fn check_key(key: &str) -> ParseResult<()> {
    let reason = if key.is_empty() {
        Some("expected a non-empty object key")
    } else if key.split('/').any(|segment| segment == "." || segment == "..") {
        Some("'.' and '..' path segments are not supported")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ParseError::InvalidField {
            field: "key",
            value: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn invalid(err: &ParseError) -> RunError {
    RunError::InvalidCommand {
        message: err.to_string(),
    }
}

/// Virtual-hosted-style endpoint for `bucket`, with the key's segments
/// percent-encoded.
fn object_url(bucket: &str, region: &str, key: &str) -> RunResult<Url> {
    check_bucket(bucket).map_err(|err| invalid(&err))?;
    check_region(region).map_err(|err| invalid(&err))?;

    let path = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    Url::parse(&format!("https://{bucket}.s3.{region}.amazonaws.com/{path}")).map_err(|err| {
        RunError::InvalidCommand {
            message: format!("Cannot build S3 URL: {err}"),
        }
    })
}

fn credentials(ctx: &ExecutionContext) -> RunResult<&AwsCredentials> {
    ctx.aws_credentials()
        .ok_or(RunError::MissingCredentials { provider: "AWS" })
}

fn refused(operation: String, response: &HttpResponse) -> RunError {
    let reason = listing::error_reason(&response.text())
        .unwrap_or_else(|| format!("status {}", response.status));
    RunError::Remote { operation, reason }
}

/// `/aws s3`: list the keys in a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsS3Command {
    pub bucket: String,
    pub region: String,
}

impl AwsS3Command {
    pub fn parse(params: &str) -> ParseResult<Self> {
        let cmd: Self = params::decode("aws s3", params)?;
        check_bucket(&cmd.bucket)?;
        check_region(&cmd.region)?;
        Ok(cmd)
    }

    /// One `ListObjectsV2` page, up to 1000 keys, rendered one per line.
    pub async fn run(&self, ctx: &ExecutionContext) -> RunResult<CommandResult> {
        let creds = credentials(ctx)?;
        let mut url = object_url(&self.bucket, &self.region, "")?;
        url.set_query(Some("list-type=2"));

        let request = sigv4::sign(HttpRequest::get(url), creds, &self.region, Utc::now())?;
        let response = ctx.send(request).await?;
        if !response.is_success() {
            return Err(refused("Cannot list objects".to_string(), &response));
        }

        let body = response.text();
        let keys = listing::object_keys(&body)?;
        debug!(
            bucket = %self.bucket,
            count = keys.len(),
            truncated = listing::is_truncated(&body)?,
            "Listed S3 objects"
        );

        let mut html = String::from("<pre>");
        for key in &keys {
            html.push_str(&escape_html(key));
            html.push_str("<br>");
        }
        html.push_str("</pre>");

        Ok(CommandResult::dangerous_from_trusted_html(html).with_plain_text(keys.join("\n")))
    }
}

/// `/aws s3 object`: show one object's body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsS3ObjectCommand {
    pub bucket: String,
    pub region: String,
    pub key: String,
}

impl AwsS3ObjectCommand {
    pub fn parse(params: &str) -> ParseResult<Self> {
        let cmd: Self = params::decode("aws s3 object", params)?;
        check_bucket(&cmd.bucket)?;
        check_region(&cmd.region)?;
        check_key(&cmd.key)?;
        Ok(cmd)
    }

    /// The body is shown as escaped text, lossily decoded as UTF-8.
    pub async fn run(&self, ctx: &ExecutionContext) -> RunResult<CommandResult> {
        let creds = credentials(ctx)?;
        check_key(&self.key).map_err(|err| invalid(&err))?;
        let url = object_url(&self.bucket, &self.region, &self.key)?;

        let request = sigv4::sign(HttpRequest::get(url), creds, &self.region, Utc::now())?;
        let response = ctx.send(request).await?;
        if !response.is_success() {
            return Err(refused(
                format!("Cannot get object '{}'", self.key),
                &response,
            ));
        }

        let body = response.text();
        debug!(bucket = %self.bucket, bytes = response.body.len(), "Fetched S3 object");

        let html = format!("<pre>{}</pre>", escape_html(&body));
        Ok(CommandResult::dangerous_from_trusted_html(html).with_plain_text(body))
    }
}
