use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use config::InventorySettings;
use models::{ResourceInfo, ResourceReservations};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::{ClientError, InventoryApi};

#[derive(Serialize)]
struct LoginRequest<'a> {
    domain: &'a str,
}

#[derive(Serialize)]
struct AvailabilityRequest<'a> {
    resource_names: &'a [String],
    start_time: &'a str,
    end_time: &'a str,
    show_all_domains: bool,
}

#[derive(Deserialize)]
struct ResourceList<T> {
    #[serde(default = "Vec::new")]
    resources: Vec<T>,
}

/// An authenticated session against the inventory service.
pub struct InventoryClient {
    agent: ureq::Agent,
    base: Url,
    token: String,
}

impl fmt::Debug for InventoryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventoryClient")
            .field("base", &self.base.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl InventoryClient {
    /// Logs in and keeps the returned session token.
    ///
    /// # Errors
    /// Returns [`ClientError::Connection`] if the service is unreachable or
    /// rejects the credentials.
    pub fn connect(settings: &InventorySettings) -> Result<Self, ClientError> {
        let base_url = settings.base_url();
        let base = Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        let agent = ureq::AgentBuilder::new().build();

        let login_url = endpoint(&base, &["api", "login"])?;
        let credentials = format!("{}:{}", settings.username, settings.password);
        let basic_auth_header = format!("Basic {}", STANDARD.encode(credentials.as_bytes()));

        tracing::info!("Opening inventory session on {}", base);

        let connection_error = |reason: String| ClientError::Connection {
            server: base_url.clone(),
            reason,
        };

        let resp = agent
            .put(login_url.as_str())
            .set("Authorization", &basic_auth_header)
            .send_json(LoginRequest {
                domain: &settings.domain,
            })
            .map_err(|e| {
                connection_error(ClientError::from_ureq(login_url.as_str(), e).to_string())
            })?;

        let token: String = resp
            .into_json()
            .map_err(|e| connection_error(format!("unreadable login token: {e}")))?;

        if token.is_empty() {
            return Err(connection_error(
                "service returned an empty session token".into(),
            ));
        }

        Ok(Self { agent, base, token })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn read_list<T: DeserializeOwned>(resp: ureq::Response) -> Result<Vec<T>, ClientError> {
        resp.into_json::<ResourceList<T>>()
            .map(|list| list.resources)
            .map_err(|e| ClientError::ResponseParse(e.to_string()))
    }
}

impl InventoryApi for InventoryClient {
    fn find_resources(&self, family: &str, model: &str) -> Result<Vec<ResourceInfo>, ClientError> {
        let url = endpoint(&self.base, &["api", "resources"])?;
        tracing::debug!("Searching resources family={family:?} model={model:?}");

        let resp = self
            .agent
            .get(url.as_str())
            .set("Authorization", &self.auth_header())
            .query("family", family)
            .query("model", model)
            .call()
            .map_err(|e| ClientError::from_ureq(url.as_str(), e))?;

        Self::read_list(resp)
    }

    fn check_resource_exists(&self, name: &str) -> Result<bool, ClientError> {
        let url = endpoint(&self.base, &["api", "resources", name])?;

        match self
            .agent
            .get(url.as_str())
            .set("Authorization", &self.auth_header())
            .call()
        {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(ClientError::from_ureq(url.as_str(), e)),
        }
    }

    fn get_reservations_in_range(
        &self,
        resource_names: &[String],
        start: &str,
        end: &str,
        show_all_domains: bool,
    ) -> Result<Vec<ResourceReservations>, ClientError> {
        let url = endpoint(&self.base, &["api", "reservations", "availability"])?;
        tracing::debug!(
            "Querying reservations for {} resources between {start} and {end}",
            resource_names.len()
        );

        let resp = self
            .agent
            .post(url.as_str())
            .set("Authorization", &self.auth_header())
            .send_json(AvailabilityRequest {
                resource_names,
                start_time: start,
                end_time: end,
                show_all_domains,
            })
            .map_err(|e| ClientError::from_ureq(url.as_str(), e))?;

        Self::read_list(resp)
    }
}

/// Appends percent-encoded `segments` to the base URL's path.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
