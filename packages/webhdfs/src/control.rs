//! NameNode side of the handshake.
//!
//! Every operation starts with exactly one request to the NameNode. Its
//! answer is classified into a [`ControlOutcome`] that the caller
//! dispatches on.

use log::Level;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::executor::HttpExecutor;
use crate::operation::Operation;
use crate::redirect::{parse_location, RedirectTarget};
use crate::types::{Endpoint, HttpRequest, HttpResponse};

/// URL path prefix of every WebHDFS resource.
pub const WEBHDFS_CONTEXT_ROOT: &str = "/webhdfs/v1";

/// What the NameNode answered.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutcome {
    /// The bytes live on a DataNode; continue there.
    Redirected(RedirectTarget),
    /// No body and no `Location`. `OPEN` answers this way for empty files.
    EmptyBody { status: u16 },
    /// A JSON document.
    Metadata(serde_json::Value),
}

pub(crate) struct ControlPlane<'a> {
    pub executor: &'a dyn HttpExecutor,
    pub diagnostics: &'a dyn Diagnostics,
    pub namenode: &'a Endpoint,
    pub username: &'a str,
}

impl ControlPlane<'_> {
    /// Build the NameNode request for `op` on `path`.
    pub fn request(&self, op: &Operation, path: &str) -> HttpRequest {
        let mut query = op.query();
        query.push("user.name", self.username);

        HttpRequest::new(
            op.method(),
            self.namenode.clone(),
            format!("{}/{}", WEBHDFS_CONTEXT_ROOT, path.trim_matches('/')),
        )
        .with_query(query)
    }

    pub fn call(&self, op: &Operation, path: &str) -> Result<ControlOutcome> {
        let request = self.request(op, path);
        self.diagnostics.log(
            Level::Debug,
            &format!("{} {}{}", request.method, self.namenode, request.target()),
        );

        let response = self.executor.execute(&request)?;
        self.diagnostics.log(
            Level::Debug,
            &format!("HTTP Response: {}, {}", response.status, response.status_text),
        );

        classify(op, response.error_for_status()?, self.diagnostics)
    }
}

fn classify(
    op: &Operation,
    response: HttpResponse,
    diagnostics: &dyn Diagnostics,
) -> Result<ControlOutcome> {
    if let Some(location) = response.location() {
        diagnostics.log(Level::Debug, &format!("HTTP Location: {}", location));
        return Ok(ControlOutcome::Redirected(parse_location(location)?));
    }

    if response.is_redirect() {
        return Err(Error::MissingRedirect { op: op.name() });
    }

    if response.has_empty_body() {
        return Ok(ControlOutcome::EmptyBody {
            status: response.status,
        });
    }

    // CREATE and OPEN must hand off to a DataNode when there is content.
    if op.redirects() {
        return Err(Error::MissingRedirect { op: op.name() });
    }

    Ok(ControlOutcome::Metadata(response.json()?))
}
