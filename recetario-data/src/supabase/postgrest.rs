//! [`RecipeCollection`] over a PostgREST endpoint.
//!
//! Rows live at `{base}/rest/v1/{table}`. Selection uses PostgREST's query
//! grammar (`order=created_at.desc`, `ingredientes=cs.{"token"}`); writes ask
//! for the stored row back as a single JSON object.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use recetario_core::{
    CollectionError, IngredientFilter, Recipe, RecipeCollection, RecipeId, RecipePatch,
    RecipeQuery, RecipeRow,
};

use super::client::SupabaseClient;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
const NEWEST_FIRST: &str = "created_at.desc";

/// PostgREST error code for "the result contains 0 rows".
const NO_ROWS: &str = "PGRST116";

/// Error body returned by PostgREST.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct PostgrestErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestErrorBody {
    fn describe(&self) -> String {
        [Some(self.message.as_str()), self.details.as_deref(), self.hint.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Recipe rows stored behind PostgREST.
#[derive(Debug, Clone)]
pub struct PostgrestCollection {
    client: SupabaseClient,
}

impl PostgrestCollection {
    /// Use the table configured on `client`.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn table_url(&self) -> Url {
        self.client
            .endpoint(&["rest", "v1", self.client.config().table.as_str()])
    }

    fn select_url(&self, query: &RecipeQuery) -> Url {
        let mut url = self.table_url();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            pairs.append_pair("order", NEWEST_FIRST);
            if let Some(IngredientFilter::Contains(token)) = &query.filter {
                pairs.append_pair("ingredientes", &contains_clause(token));
            }
        }
        url
    }

    fn row_url(&self, id: &RecipeId) -> Url {
        let mut url = self.table_url();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id.as_str()));
        url
    }

    fn insert_request(&self, row: &RecipeRow) -> (Url, RequestBuilder) {
        let url = self.table_url();
        let request = returning_row(self.client.http().post(url.clone())).json(row);
        (url, request)
    }

    fn update_request(&self, id: &RecipeId, patch: &RecipePatch) -> (Url, RequestBuilder) {
        let url = self.row_url(id);
        let request = returning_row(self.client.http().patch(url.clone())).json(patch);
        (url, request)
    }

    async fn single_row(
        &self,
        response: Response,
        url: &Url,
        id: Option<&RecipeId>,
    ) -> Result<Recipe, CollectionError> {
        let response = check_status(response, url, id).await?;
        response
            .json::<Recipe>()
            .await
            .map_err(|err| CollectionError::Parse {
                message: err.to_string(),
            })
    }
}

fn returning_row(request: RequestBuilder) -> RequestBuilder {
    request
        .header("Prefer", RETURN_REPRESENTATION)
        .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
}

/// Array-containment filter value for a single token.
fn contains_clause(token: &str) -> String {
    let escaped = token.replace('\\', "\\\\").replace('"', "\\\"");
    format!("cs.{{\"{escaped}\"}}")
}

async fn check_status(
    response: Response,
    url: &Url,
    id: Option<&RecipeId>,
) -> Result<Response, CollectionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_failure(url.as_str(), status, &body, id))
}

/// Map a non-success response onto a [`CollectionError`].
pub(crate) fn classify_failure(
    url: &str,
    status: StatusCode,
    body: &str,
    id: Option<&RecipeId>,
) -> CollectionError {
    match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(error) if error.code == NO_ROWS => match id {
            Some(id) => CollectionError::NotFound { id: id.clone() },
            None => CollectionError::Rejected {
                message: error.describe(),
                code: error.code,
            },
        },
        Ok(error) if !error.code.is_empty() => CollectionError::Rejected {
            message: error.describe(),
            code: error.code,
        },
        _ => CollectionError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_owned()
            } else {
                body.trim().to_owned()
            },
        },
    }
}

#[async_trait(?Send)]
impl RecipeCollection for PostgrestCollection {
    async fn select(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, CollectionError> {
        let url = self.select_url(query);
        log::debug!("selecting recipes from {url}");
        let request = self.client.http().get(url.clone());
        let response = self.client.send(request, &url).await?;
        let response = check_status(response, &url, None).await?;
        response
            .json::<Vec<Recipe>>()
            .await
            .map_err(|err| CollectionError::Parse {
                message: err.to_string(),
            })
    }

    async fn insert(&self, row: &RecipeRow) -> Result<Recipe, CollectionError> {
        let (url, request) = self.insert_request(row);
        let response = self.client.send(request, &url).await?;
        self.single_row(response, &url, None).await
    }

    async fn update(&self, id: &RecipeId, patch: &RecipePatch) -> Result<Recipe, CollectionError> {
        let (url, request) = self.update_request(id, patch);
        let response = self.client.send(request, &url).await?;
        self.single_row(response, &url, Some(id)).await
    }

    async fn delete(&self, id: &RecipeId) -> Result<(), CollectionError> {
        let url = self.row_url(id);
        let request = self.client.http().delete(url.clone());
        let response = self.client.send(request, &url).await?;
        check_status(response, &url, Some(id)).await?;
        Ok(())
    }
}
