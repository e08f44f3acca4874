// API client module: a small blocking HTTP client for the POS cloud API.
// Each public call wraps exactly one endpoint, logs its outcome and returns
// a typed result; nothing is retried or cached.

use crate::error::ApiError;
use crate::models::{
    Order, OrdersResponse, Organization, OrganizationsResponse, RestaurantSection,
    SectionsResponse, TerminalGroup, TerminalGroupsResponse, TokenResponse,
};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

const ACCESS_TOKEN: &str = "/api/1/access_token";
const ORGANIZATIONS: &str = "/api/1/organizations";
const TERMINAL_GROUPS: &str = "/api/1/terminal_groups";
const RESTAURANT_SECTIONS: &str = "/api/1/reserve/available_restaurant_sections";
const ORDERS_BY_TABLE: &str = "/api/1/order/by_table";

/// Section lookup gives up after this long.
pub const SECTIONS_TIMEOUT: Duration = Duration::from_secs(10);
/// Order lookup gives up after this long.
pub const ORDERS_TIMEOUT: Duration = Duration::from_secs(15);

/// Statuses requested when the caller does not narrow them.
pub const DEFAULT_STATUSES: [&str; 2] = ["New", "Closed"];

/// Inclusive query window, passed to the API verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

/// Everything the orchestrator needs from the remote API. `ApiClient` is the
/// real implementation; tests drive the flow through an in-memory one.
pub trait PosApi {
    /// Exchange the login for a bearer token and keep it for later calls.
    fn authenticate(&mut self, api_login: &str) -> Result<String, ApiError>;

    fn organizations(&self) -> Result<Vec<Organization>, ApiError>;

    /// Active and dormant groups of the given organizations, flattened.
    fn terminal_groups(&self, organization_ids: &[String]) -> Result<Vec<TerminalGroup>, ApiError>;

    fn restaurant_sections(
        &self,
        terminal_group_ids: &[String],
    ) -> Result<Vec<RestaurantSection>, ApiError>;

    fn orders_by_table(
        &self,
        organization_ids: &[String],
        table_ids: &[String],
        range: &DateRange,
        statuses: &[String],
    ) -> Result<Vec<Order>, ApiError>;
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AccessTokenRequest<'a> {
    api_login: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TerminalGroupsRequest<'a> {
    organization_ids: &'a [String],
    include_disabled: bool,
    return_external_data: [&'static str; 1],
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SectionsRequest<'a> {
    terminal_group_ids: &'a [String],
    /// Schema echo is never requested.
    return_schema: bool,
    /// No incremental tracking; always the full list.
    revision: u64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct OrdersByTableRequest<'a> {
    organization_ids: &'a [String],
    table_ids: &'a [String],
    statuses: &'a [String],
    date_from: &'a str,
    date_to: &'a str,
}

/// Blocking client holding the reqwest client, the API host and the bearer
/// token once authentication succeeded.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    /// Ready-made `Bearer <token>` header, set once authentication succeeds.
    token: Option<HeaderValue>,
    show_progress: bool,
}

impl ApiClient {
    /// Build a client for `base_url`. Calls without an explicit timeout use
    /// reqwest's default.
    pub fn new(base_url: &str, show_progress: bool) -> Result<Self, ApiError> {
        let client = Client::builder()
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: "client setup",
                source,
            })?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            show_progress,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(val) = &self.token {
            headers.insert(AUTHORIZATION, val.clone());
        }
        headers
    }

    fn spinner(&self, message: &'static str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }

    /// Send the request and decode a 2xx body into `T`, mapping every failure
    /// into the [`ApiError`] taxonomy and logging it.
    fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        req: RequestBuilder,
        limit: Option<Duration>,
    ) -> Result<T, ApiError> {
        let spinner = self.spinner(endpoint);
        let result = send_and_decode(endpoint, req, limit);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        if let Err(e) = &result {
            error!(endpoint, "{e}");
        }
        result
    }
}

fn send_and_decode<T: DeserializeOwned>(
    endpoint: &'static str,
    req: RequestBuilder,
    limit: Option<Duration>,
) -> Result<T, ApiError> {
    let req = match limit {
        Some(limit) => req.timeout(limit),
        None => req,
    };
    let res = req.send().map_err(|source| match limit {
        Some(limit) if source.is_timeout() => ApiError::Timeout { endpoint, limit },
        _ => ApiError::Transport { endpoint, source },
    })?;

    let status = res.status();
    let body = res.text().map_err(|source| match limit {
        Some(limit) if source.is_timeout() => ApiError::Timeout { endpoint, limit },
        _ => ApiError::Transport { endpoint, source },
    })?;
    if !status.is_success() {
        return Err(ApiError::Http {
            endpoint,
            status,
            body,
        });
    }
    decode(endpoint, &body)
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Shape {
        endpoint,
        detail: e.to_string(),
    })
}

/// Pull a non-empty token out of an access-token response body.
fn token_from(resp: TokenResponse) -> Result<String, ApiError> {
    resp.token
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Shape {
            endpoint: ACCESS_TOKEN,
            detail: "response has no token field".into(),
        })
}

/// `Authorization` value for `token`; a token that cannot travel in a header
/// is rejected here instead of surfacing later as a 401.
fn bearer(token: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::Shape {
        endpoint: ACCESS_TOKEN,
        detail: "token contains characters not allowed in a header".into(),
    })
}

/// First few characters of a token, enough to tell runs apart in the log.
fn masked(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{prefix}...")
}

impl PosApi for ApiClient {
    fn authenticate(&mut self, api_login: &str) -> Result<String, ApiError> {
        let req = self
            .client
            .post(self.url(ACCESS_TOKEN))
            .json(&AccessTokenRequest { api_login });
        let resp: TokenResponse = self.execute(ACCESS_TOKEN, req, None)?;
        let (token, header) = token_from(resp)
            .and_then(|token| bearer(&token).map(|header| (token, header)))
            .map_err(|e| {
                error!(endpoint = ACCESS_TOKEN, "{e}");
                e
            })?;
        info!(token = %masked(&token), "access token obtained");
        self.token = Some(header);
        Ok(token)
    }

    fn organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let req = self
            .client
            .get(self.url(ORGANIZATIONS))
            .headers(self.auth_headers());
        let resp: OrganizationsResponse = self.execute(ORGANIZATIONS, req, None)?;
        info!(count = resp.organizations.len(), "organizations received");
        Ok(resp.organizations)
    }

    fn terminal_groups(&self, organization_ids: &[String]) -> Result<Vec<TerminalGroup>, ApiError> {
        let req = self
            .client
            .post(self.url(TERMINAL_GROUPS))
            .headers(self.auth_headers())
            .json(&TerminalGroupsRequest {
                organization_ids,
                include_disabled: true,
                return_external_data: ["string"],
            });
        let resp: TerminalGroupsResponse = self.execute(TERMINAL_GROUPS, req, None)?;
        let groups = resp.flatten();
        info!(count = groups.len(), "terminal groups received");
        Ok(groups)
    }

    fn restaurant_sections(
        &self,
        terminal_group_ids: &[String],
    ) -> Result<Vec<RestaurantSection>, ApiError> {
        let req = self
            .client
            .post(self.url(RESTAURANT_SECTIONS))
            .headers(self.auth_headers())
            .json(&SectionsRequest {
                terminal_group_ids,
                return_schema: false,
                revision: 0,
            });
        let resp: SectionsResponse =
            self.execute(RESTAURANT_SECTIONS, req, Some(SECTIONS_TIMEOUT))?;
        info!(
            count = resp.restaurant_sections.len(),
            "restaurant sections received"
        );
        Ok(resp.restaurant_sections)
    }

    fn orders_by_table(
        &self,
        organization_ids: &[String],
        table_ids: &[String],
        range: &DateRange,
        statuses: &[String],
    ) -> Result<Vec<Order>, ApiError> {
        let req = self
            .client
            .post(self.url(ORDERS_BY_TABLE))
            .headers(self.auth_headers())
            .json(&OrdersByTableRequest {
                organization_ids,
                table_ids,
                statuses,
                date_from: &range.from,
                date_to: &range.to,
            });
        let resp: OrdersResponse = self.execute(ORDERS_BY_TABLE, req, Some(ORDERS_TIMEOUT))?;
        info!(count = resp.orders.len(), "orders received");
        Ok(resp.orders)
    }
}
