//! # chronos-client
//!
//! Minimal blocking client for the Chronos scheduler REST API.
//!
//! Only the four calls a declarative sync needs are covered:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`ChronosClient::fetch_jobs`] | `GET /v1/scheduler/jobs` |
//! | [`ChronosClient::submit`] (scheduled) | `POST /v1/scheduler/iso8601` |
//! | [`ChronosClient::submit`] (dependent) | `POST /v1/scheduler/dependency` |
//! | [`ChronosClient::delete`] | `DELETE /v1/scheduler/job/{name}` |
//!
//! ## Example
//!
//! ```no_run
//! use chronos_client::{ChronosClient, Credentials};
//!
//! let credentials = Credentials::parse("ops:secret")?;
//! let client = ChronosClient::new("http://chronos.local:4400/", Some(credentials))?;
//!
//! for job in client.fetch_jobs()? {
//!     println!("{}", job.name);
//! }
//! # Ok::<(), chronos_client::Error>(())
//! ```

#![warn(missing_docs)]

pub mod error;

pub use error::{Error, ErrorCategory, Result};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reconcile::{JobKind, JobRecord, JobSpec, Scheduler};
use url::Url;

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Parse `user:password`. Both halves are trimmed; anything other than
    /// exactly one `:` is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [user, password] if !user.is_empty() && !password.is_empty() => Ok(Self {
                user: (*user).to_string(),
                password: (*password).to_string(),
            }),
            _ => Err(Error::InvalidCredentials),
        }
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.user, self.password))
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Client for a single Chronos scheduler.
pub struct ChronosClient {
    agent: ureq::Agent,
    base: Url,
    credentials: Option<Credentials>,
}

impl ChronosClient {
    /// Create a client for the scheduler at `base`.
    ///
    /// Trailing slashes on `base` are ignored.
    pub fn new(base: &str, credentials: Option<Credentials>) -> Result<Self> {
        let trimmed = base.trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|_| Error::InvalidUri(base.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUri(base.to_string()));
        }
        Ok(Self {
            agent: ureq::Agent::new_with_defaults(),
            base: url,
            credentials,
        })
    }

    /// Base URI requests are built from.
    #[must_use]
    pub fn base(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Build an endpoint URL below `/v1/scheduler`.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUri(self.base.to_string()))?
            .pop_if_empty()
            .extend(["v1", "scheduler"])
            .extend(segments);
        Ok(url)
    }

    /// Fetch every job the scheduler knows about.
    pub fn fetch_jobs(&self) -> Result<Vec<JobRecord>> {
        let url = self.endpoint(&["jobs"])?;
        log::debug!("GET {url}");

        let mut request = self.agent.get(url.as_str());
        if let Some(credentials) = &self.credentials {
            request = request.header("Authorization", credentials.header_value());
        }
        let body = request.call()?.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create or update a job. The endpoint depends on the job class.
    pub fn submit(&self, job: &JobSpec) -> Result<()> {
        let method = match job.kind() {
            JobKind::Scheduled => "iso8601",
            JobKind::Dependent => "dependency",
        };
        let url = self.endpoint(&[method])?;
        log::info!("POST {} to {}", job.name, url.path());

        let mut request = self.agent.post(url.as_str());
        if let Some(credentials) = &self.credentials {
            request = request.header("Authorization", credentials.header_value());
        }
        request.send_json(job)?;
        Ok(())
    }

    /// Delete a job. Only an empty success response counts.
    pub fn delete(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&["job", name])?;
        log::info!("DELETE {name} at {}", url.path());

        let mut request = self.agent.delete(url.as_str());
        if let Some(credentials) = &self.credentials {
            request = request.header("Authorization", credentials.header_value());
        }
        let body = request.call()?.body_mut().read_to_string()?;
        if !body.trim().is_empty() {
            return Err(Error::UnexpectedBody {
                name: name.to_string(),
                body,
            });
        }
        Ok(())
    }
}

impl Scheduler for ChronosClient {
    fn fetch_jobs(&self) -> anyhow::Result<Vec<JobRecord>> {
        Ok(ChronosClient::fetch_jobs(self)?)
    }

    fn submit(&self, job: &JobSpec) -> anyhow::Result<()> {
        Ok(ChronosClient::submit(self, job)?)
    }

    fn delete(&self, name: &str) -> anyhow::Result<()> {
        Ok(ChronosClient::delete(self, name)?)
    }
}
