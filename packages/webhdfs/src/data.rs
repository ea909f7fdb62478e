//! DataNode side of the handshake: replay the operation at the redirect
//! target.

use std::io::Write;

use log::Level;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::executor::HttpExecutor;
use crate::redirect::RedirectTarget;
use crate::types::{HttpRequest, HttpResponse, Method, RequestBody};

pub(crate) struct DataPlane<'a> {
    pub executor: &'a dyn HttpExecutor,
    pub diagnostics: &'a dyn Diagnostics,
    /// Configured port for redirects that omit one.
    pub fallback_port: Option<u16>,
}

impl DataPlane<'_> {
    /// Build the DataNode request for `target`, reusing its query verbatim.
    pub fn request(&self, method: Method, target: &RedirectTarget) -> Result<HttpRequest> {
        let port = match target.port {
            Some(port) => port,
            None => self
                .fallback_port
                .or_else(|| target.scheme_default_port())
                .ok_or_else(|| Error::MalformedRedirect {
                    location: format!("{}://{}/{}", target.scheme, target.host, target.path),
                    reason: "no port given and no fallback for this scheme".to_string(),
                })?,
        };
        let endpoint = target.endpoint(port);

        self.diagnostics.log(
            Level::Debug,
            &format!(
                "Redirect: host: {}, port: {}, path: {}?{}",
                endpoint.host, endpoint.port, target.path, target.query
            ),
        );

        Ok(HttpRequest::new(method, endpoint, target.path.clone()).with_query(target.query()))
    }

    /// PUT `body` to the DataNode, adding `replication` to the query.
    pub fn upload(
        &self,
        target: &RedirectTarget,
        replication: u16,
        body: RequestBody,
    ) -> Result<HttpResponse> {
        let mut request = self.request(Method::PUT, target)?.with_body(body);
        // Some NameNode versions leave it out of the redirect and the
        // DataNode then fails with a NullPointerException.
        request.query.push("replication", replication);

        let response = self.executor.execute(&request)?;
        self.log_response(&response);
        response.error_for_status()
    }

    /// GET the file and copy its bytes into `sink`. Returns the HTTP status.
    pub fn download(&self, target: &RedirectTarget, sink: &mut dyn Write) -> Result<u16> {
        let request = self.request(Method::GET, target)?;
        let response = self.executor.execute_into(&request, sink)?;
        self.log_response(&response);
        Ok(response.error_for_status()?.status)
    }

    /// GET the file into memory.
    pub fn fetch(&self, target: &RedirectTarget) -> Result<Vec<u8>> {
        let request = self.request(Method::GET, target)?;
        let response = self.executor.execute(&request)?;
        self.log_response(&response);
        Ok(response.error_for_status()?.body)
    }

    fn log_response(&self, response: &HttpResponse) {
        self.diagnostics.log(
            Level::Debug,
            &format!("HTTP Response: {}, {}", response.status, response.status_text),
        );
    }
}
