use reqwest::{Client, Url, redirect};
use tracing::{debug, warn};

use crate::config::{Config, HttpConfig};
use crate::error::{Error, Result};

mod models;
mod parser;
mod query;

pub use models::{DetailRecord, ListItemRecord};
pub use parser::{absolutize, extract_detail, extract_list};
pub use query::{QuerySpec, SearchMode, UnknownMode, plan};

const LOAD_MORE_ACTION: &str = "madara_load_more";
const SEARCH_TEMPLATE: &str = "madara-core/content/content-search";

/// Client for a Madara catalog's `admin-ajax.php` search handler and its
/// item pages. Holds no per-request state; every call is one round trip.
pub struct MadaraClient {
    client: Client,
    endpoint: Url,
    fail_on_http_error: bool,
}

impl MadaraClient {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = parse_url(&config.catalog.endpoint)?;
        Ok(Self {
            client: build_http_client(&config.http)?,
            endpoint,
            fail_on_http_error: config.http.fail_on_http_error,
        })
    }

    /// Plan, fetch and extract one page of results.
    pub async fn search(
        &self,
        page: u32,
        query: &str,
        mode: SearchMode,
    ) -> Result<Vec<ListItemRecord>> {
        let spec = plan(page, query, mode);
        let html = self.fetch_list(&spec).await?;
        extract_list(&html)
    }

    /// Fetch and extract a single item page.
    pub async fn details(&self, url: &str) -> Result<DetailRecord> {
        let html = self.fetch_detail(url).await?;
        let mut record = extract_detail(&html)?;
        record.cover_image = absolutize(url, &record.cover_image);
        Ok(record)
    }

    /// POST the search form for `spec` and return the raw listing markup.
    pub async fn fetch_list(&self, spec: &QuerySpec) -> Result<String> {
        let page = spec.page().to_string();
        let mut form = vec![
            ("action".to_string(), LOAD_MORE_ACTION.to_string()),
            ("page".to_string(), page),
            ("template".to_string(), SEARCH_TEMPLATE.to_string()),
        ];
        form.extend(spec.form_pairs("vars"));

        debug!(
            endpoint = %self.endpoint,
            page = spec.page(),
            term = %spec.term(),
            "Requesting catalog page"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await?;
        self.read_body(response).await
    }

    /// GET an item page and return its raw markup.
    pub async fn fetch_detail(&self, url: &str) -> Result<String> {
        let url = parse_url(url)?;
        debug!(url = %url, "Requesting item page");

        let response = self.client.get(url).send().await?;
        self.read_body(response).await
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if self.fail_on_http_error && !status.is_success() {
            return Err(Error::HttpStatus(status));
        }

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }

        debug!(status = %status, bytes = html.len(), "Received markup");
        Ok(html)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))
}

fn build_http_client(http: &HttpConfig) -> Result<Client> {
    if http.accept_invalid_certs {
        warn!("TLS certificate verification is disabled");
    }

    let client = Client::builder()
        .user_agent(http.user_agent.as_str())
        .timeout(http.timeout())
        .redirect(redirect::Policy::limited(http.max_redirects))
        .danger_accept_invalid_certs(http.accept_invalid_certs)
        .build()?;
    Ok(client)
}
