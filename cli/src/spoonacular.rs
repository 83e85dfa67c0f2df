use serde::Deserialize;

use nosh_core::error::{LookupError, LookupResult};
use nosh_core::normalize::{ImageAnalysis, SearchResult};
use nosh_core::service::NutritionLookupProvider;

const SEARCH_URL: &str = "https://api.spoonacular.com/recipes/complexSearch";
const IMAGE_URL: &str = "https://api.spoonacular.com/food/images/analyze";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    results: Vec<SearchResult>,
}

pub struct SpoonacularClient {
    client: reqwest::Client,
    rt: tokio::runtime::Handle,
    api_key: String,
}

impl SpoonacularClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!("nosh-cli/{} (macro tracker)", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            rt: tokio::runtime::Handle::current(),
            api_key,
        }
    }

    pub async fn search_async(&self, query: &str) -> LookupResult<Option<SearchResult>> {
        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("query", query),
                ("addRecipeNutrition", "true"),
                ("number", "1"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let resp = check_status(resp)?;
        let data: SearchEnvelope = resp.json().await.map_err(|e| {
            LookupError::UpstreamServerError(format!("malformed search response: {e}"))
        })?;

        Ok(data.results.into_iter().next())
    }

    pub async fn analyze_image_async(&self, image_url: &str) -> LookupResult<ImageAnalysis> {
        let resp = self
            .client
            .get(IMAGE_URL)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("imageUrl", image_url),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let resp = check_status(resp)?;
        resp.json().await.map_err(|e| {
            LookupError::UpstreamServerError(format!("malformed image response: {e}"))
        })
    }
}

fn transport_error(err: reqwest::Error) -> LookupError {
    LookupError::NetworkFailure(err.to_string())
}

fn check_status(resp: reqwest::Response) -> LookupResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else if status.as_u16() == 401 || status.as_u16() == 402 {
        Err(LookupError::InvalidInput(format!(
            "nutrition API rejected the key (HTTP {status})"
        )))
    } else {
        Err(LookupError::UpstreamServerError(format!("HTTP {status}")))
    }
}

impl NutritionLookupProvider for SpoonacularClient {
    fn search(&self, query: &str) -> LookupResult<Option<SearchResult>> {
        tokio::task::block_in_place(|| self.rt.block_on(self.search_async(query)))
    }

    fn analyze_image(&self, image_ref: &str) -> LookupResult<ImageAnalysis> {
        tokio::task::block_in_place(|| self.rt.block_on(self.analyze_image_async(image_ref)))
    }
}
