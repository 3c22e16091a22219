use crate::core::template::{ParamDefaults, UrlTemplate};
use crate::core::{ConfigProvider, Mollusk, MolluskId, Resource};
use crate::utils::error::{MolluskError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// HTTP-backed [`Resource`] bound to one URL template.
#[derive(Debug, Clone)]
pub struct HttpResource {
    client: Client,
    template: UrlTemplate,
    defaults: ParamDefaults,
}

impl HttpResource {
    pub fn new(template: UrlTemplate, defaults: ParamDefaults, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            template,
            defaults,
        })
    }

    /// The `Mollusks` factory: `{id: "@id"}` bound to the configured template.
    pub fn mollusks<C: ConfigProvider>(config: &C) -> Result<Self> {
        let template = UrlTemplate::parse(config.url_template())?;
        Self::new(
            template,
            ParamDefaults::new().with("id", "@id"),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    fn url_for(&self, body: Option<&Mollusk>, id: Option<&MolluskId>) -> Result<Url> {
        let mut values = self.defaults.resolve(body);
        if let Some(id) = id {
            values.insert("id".to_string(), id.to_string());
        }
        self.template.expand(&values)
    }

    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(MolluskError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }
}

#[async_trait]
impl Resource for HttpResource {
    async fn query(&self) -> Result<Vec<Mollusk>> {
        let url = self.url_for(None, None)?;
        tracing::debug!("GET {}", url);

        let response = Self::check_status(self.client.get(url).send().await?)?;
        let mollusks: Vec<Mollusk> = response.json().await?;

        tracing::debug!("Received {} mollusks", mollusks.len());
        Ok(mollusks)
    }

    async fn get(&self, id: &MolluskId) -> Result<Mollusk> {
        let url = self.url_for(None, Some(id))?;
        tracing::debug!("GET {}", url);

        let response = Self::check_status(self.client.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    async fn save(&self, mollusk: &Mollusk) -> Result<Mollusk> {
        let url = self.url_for(Some(mollusk), None)?;
        tracing::debug!("POST {}", url);

        let response = Self::check_status(self.client.post(url).json(mollusk).send().await?)?;
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let status = response.status();
        let body = response.bytes().await?;

        // Prefer the server's own view of the record when it sends one.
        if !body.is_empty() {
            if let Ok(saved) = serde_json::from_slice::<Mollusk>(&body) {
                return Ok(saved);
            }
        }

        let mut saved = mollusk.clone();
        if let Some(id) = location.as_deref().and_then(id_from_location) {
            saved.id = Some(MolluskId::Text(id));
        }
        if status == StatusCode::CREATED && saved.id.is_none() {
            tracing::warn!("Server created a mollusk without telling us where");
        }
        Ok(saved)
    }

    async fn remove(&self, id: &MolluskId) -> Result<()> {
        let url = self.url_for(None, Some(id))?;
        tracing::debug!("DELETE {}", url);

        Self::check_status(self.client.delete(url).send().await?)?;
        Ok(())
    }
}

fn id_from_location(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
