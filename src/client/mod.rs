//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{
    DltManagerResponse, DltManagerType, Fast2smsResponse, Recipients, ScheduleTime, SmsLanguage,
    SmsParameters, SmsRoute, ValidationError, VariableValues, WalletBalanceResponse,
    validate_for_route,
};
use crate::fake;
use crate::transport::{
    BULK_PATH, DLT_MANAGER_PATH, MalformedResponseError, WALLET_PATH, classify_response,
    encode_dlt_manager_form, encode_send_form,
};

mod events;

pub use events::EventListener;

/// Production Fast2SMS endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.fast2sms.com/dev";
/// Sender id used when none is configured.
pub const DEFAULT_SENDER_ID: &str = "FSTSMS";
/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Balance threshold used by [`Fast2smsClient::monitor_balance`] by default.
pub const DEFAULT_BALANCE_THRESHOLD: f64 = 1000.0;

const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(100);
const UNKNOWN_API_ERROR: &str = "Unknown Fast2sms API error.";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a str,
        params: &'a [(String, String)],
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    async fn attempt(
        &self,
        url: &str,
        api_key: &str,
        params: &[(String, String)],
    ) -> Result<HttpResponse, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for (key, value) in params {
            form = form.text(key.clone(), value.clone());
        }

        let response = self
            .client
            .post(url)
            .header("Authorization", api_key)
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a str,
        params: &'a [(String, String)],
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            // Bounded retry on connection failures and 5xx, invisible to the
            // layer above; the final attempt's outcome is returned as-is so a
            // non-2xx body still reaches the caller.
            for _ in 1..RETRY_ATTEMPTS {
                match self.attempt(url, api_key, params).await {
                    Ok(response) if response.status < 500 => return Ok(response),
                    Ok(_) | Err(_) => tokio::time::sleep(RETRY_BACKOFF).await,
                }
            }
            self.attempt(url, api_key, params)
                .await
                .map_err(|err| Box::new(err) as Box<dyn StdError + Send + Sync>)
        })
    }
}

#[derive(Debug, Clone)]
/// Configuration consumed by [`Fast2smsClient`].
///
/// Only the API key is mandatory; every other field starts from the
/// Fast2SMS defaults.
pub struct Fast2smsConfig {
    /// API key sent as the `Authorization` header on every request.
    pub api_key: String,
    /// Base URL the endpoint paths are appended to.
    pub base_url: String,
    /// Whole-request timeout enforced by the transport.
    pub timeout: Duration,
    /// Sender id the parameter store resets to.
    pub default_sender_id: String,
    /// Route the parameter store resets to.
    pub default_route: SmsRoute,
    /// Balance at or below which [`Fast2smsClient::monitor_balance`] alerts.
    pub balance_threshold: f64,
}

impl Fast2smsConfig {
    /// Create a configuration with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            default_sender_id: DEFAULT_SENDER_ID.to_owned(),
            default_route: SmsRoute::Dlt,
            balance_threshold: DEFAULT_BALANCE_THRESHOLD,
        }
    }

    /// Read configuration from `FAST2SMS_*` environment variables.
    ///
    /// Recognized: `FAST2SMS_API_KEY`, `FAST2SMS_BASE_URL`,
    /// `FAST2SMS_TIMEOUT` (seconds), `FAST2SMS_DEFAULT_SENDER_ID`,
    /// `FAST2SMS_DEFAULT_ROUTE` (wire value), `FAST2SMS_BALANCE_THRESHOLD`.
    pub fn from_env() -> Result<Self, Fast2smsError> {
        let mut config = Self::new(std::env::var("FAST2SMS_API_KEY").unwrap_or_default());

        if let Ok(base_url) = std::env::var("FAST2SMS_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("FAST2SMS_TIMEOUT") {
            let seconds: u64 = timeout.parse().map_err(|_| Fast2smsError::Configuration {
                message: format!("FAST2SMS_TIMEOUT must be whole seconds, got {timeout:?}"),
            })?;
            config.timeout = Duration::from_secs(seconds);
        }
        if let Ok(sender_id) = std::env::var("FAST2SMS_DEFAULT_SENDER_ID") {
            config.default_sender_id = sender_id;
        }
        if let Ok(route) = std::env::var("FAST2SMS_DEFAULT_ROUTE") {
            config.default_route =
                SmsRoute::from_wire_value(&route).ok_or_else(|| Fast2smsError::Configuration {
                    message: format!("FAST2SMS_DEFAULT_ROUTE must be one of dlt/otp/q/dlt_manual, got {route:?}"),
                })?;
        }
        if let Ok(threshold) = std::env::var("FAST2SMS_BALANCE_THRESHOLD") {
            config.balance_threshold =
                threshold.parse().map_err(|_| Fast2smsError::Configuration {
                    message: format!("FAST2SMS_BALANCE_THRESHOLD must be numeric, got {threshold:?}"),
                })?;
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`Fast2smsClient`].
///
/// The variants keep "my input was invalid", "the provider rejected it", and
/// "the network failed" apart: callers layering retries on top can safely
/// retry [`Fast2smsError::Transport`] and must not retry
/// [`Fast2smsError::Validation`].
pub enum Fast2smsError {
    /// Required configuration is missing or unusable at construction time.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Caller-supplied parameters failed the route rules.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Network/timeout failure after the transport exhausted its retries.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The provider answered but reported a failure.
    #[error("Fast2sms API error: {message}")]
    Provider {
        message: String,
        status_code: Option<i64>,
        body: Option<Value>,
    },

    /// The response body could not be classified into any result variant.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] MalformedResponseError),
}

#[derive(Clone)]
/// Builder for [`Fast2smsClient`].
pub struct Fast2smsClientBuilder {
    config: Fast2smsConfig,
    user_agent: Option<String>,
    listeners: Vec<Arc<dyn EventListener>>,
}

impl Fast2smsClientBuilder {
    /// Create a builder from a configuration.
    pub fn new(config: Fast2smsConfig) -> Self {
        Self {
            config,
            user_agent: None,
            listeners: Vec::new(),
        }
    }

    /// Override the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Subscribe a listener to the client's integration events.
    pub fn listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Build a [`Fast2smsClient`].
    pub fn build(self) -> Result<Fast2smsClient, Fast2smsError> {
        if self.config.api_key.trim().is_empty() {
            return Err(Fast2smsError::Configuration {
                message: "Fast2sms API key is not configured; set FAST2SMS_API_KEY".to_owned(),
            });
        }
        url::Url::parse(&self.config.base_url).map_err(|err| Fast2smsError::Configuration {
            message: format!("invalid base URL {:?}: {err}", self.config.base_url),
        })?;

        let mut builder = reqwest::Client::builder().timeout(self.config.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| Fast2smsError::Transport(Box::new(err)))?;

        let params = SmsParameters::new(
            self.config.default_sender_id.clone(),
            self.config.default_route,
        );

        Ok(Fast2smsClient {
            config: self.config,
            http: Arc::new(ReqwestTransport { client }),
            listeners: self.listeners,
            params,
        })
    }
}

#[derive(Clone)]
/// High-level Fast2SMS client.
///
/// Message parameters accumulate through the fluent setters and are consumed
/// by a terminal call (`send`, `quick`, `dlt`, `otp`, `prepare`); the store
/// returns to its configured defaults on every terminal outcome, success or
/// error. One client instance carries one in-flight message at a time; use a
/// clone (or a [`SmsParameters`] snapshot) per concurrent message.
pub struct Fast2smsClient {
    config: Fast2smsConfig,
    http: Arc<dyn HttpTransport>,
    listeners: Vec<Arc<dyn EventListener>>,
    params: SmsParameters,
}

impl std::fmt::Debug for Fast2smsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fast2smsClient")
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Fast2smsClient {
    /// Create a client with default settings.
    pub fn new(config: Fast2smsConfig) -> Result<Self, Fast2smsError> {
        Self::builder(config).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(config: Fast2smsConfig) -> Fast2smsClientBuilder {
        Fast2smsClientBuilder::new(config)
    }

    /// Set the recipient number(s); a single number or a list.
    pub fn to(&mut self, numbers: impl Into<Recipients>) -> &mut Self {
        self.params.set_numbers(numbers);
        self
    }

    /// Set the message content (Quick), the OTP code (OTP), or the DLT
    /// message id (DLT routes).
    pub fn message(&mut self, message: impl Into<String>) -> &mut Self {
        self.params.set_message(message);
        self
    }

    /// Set the DLT approved sender id (3-6 characters).
    pub fn sender_id(&mut self, sender_id: impl Into<String>) -> &mut Self {
        self.params.set_sender_id(sender_id);
        self
    }

    /// Set the delivery route.
    pub fn route(&mut self, route: SmsRoute) -> &mut Self {
        self.params.set_route(route);
        self
    }

    /// Set the DLT principal entity id (required for `dlt_manual`).
    pub fn entity_id(&mut self, entity_id: impl Into<String>) -> &mut Self {
        self.params.set_entity_id(entity_id);
        self
    }

    /// Set the DLT content template id.
    pub fn template_id(&mut self, template_id: impl Into<String>) -> &mut Self {
        self.params.set_template_id(template_id);
        self
    }

    /// Set template variable values; lists are pipe-joined immediately.
    pub fn variables(&mut self, values: impl Into<VariableValues>) -> &mut Self {
        self.params.set_variables_values(values);
        self
    }

    /// Toggle flash delivery.
    pub fn flash(&mut self, flash: bool) -> &mut Self {
        self.params.set_flash(flash);
        self
    }

    /// Schedule delivery at a future time.
    pub fn schedule(&mut self, time: ScheduleTime) -> &mut Self {
        self.params.set_schedule_time(time);
        self
    }

    /// Set the message language for Quick SMS.
    pub fn language(&mut self, language: SmsLanguage) -> &mut Self {
        self.params.set_language(language);
        self
    }

    /// Inspect the currently accumulated parameters.
    pub fn parameters(&self) -> &SmsParameters {
        &self.params
    }

    /// Send an SMS using the currently accumulated parameters.
    ///
    /// The parameter store is swapped for a fresh defaulted one before the
    /// pipeline runs, so it is back at its defaults on every exit path,
    /// including validation failures.
    pub async fn send(&mut self) -> Result<Fast2smsResponse, Fast2smsError> {
        let params = self.take_parameters();
        self.send_parameters(&params).await
    }

    /// Run the validate → assemble → submit → classify pipeline for a
    /// parameter snapshot, leaving the live store untouched.
    ///
    /// This is the receiving half of deferred dispatch: freeze the store with
    /// [`Fast2smsClient::prepare`], move the snapshot to the executing task,
    /// and feed it here.
    pub async fn send_parameters(
        &self,
        params: &SmsParameters,
    ) -> Result<Fast2smsResponse, Fast2smsError> {
        validate_for_route(params)?;
        let payload = encode_send_form(params);
        self.execute(payload, BULK_PATH).await
    }

    /// Validate and freeze the accumulated parameters into a transferable
    /// snapshot, resetting the store.
    pub fn prepare(&mut self) -> Result<SmsParameters, Fast2smsError> {
        let params = self.take_parameters();
        validate_for_route(&params)?;
        Ok(params)
    }

    /// Quickly send an SMS with minimal configuration.
    pub async fn quick(
        &mut self,
        numbers: impl Into<Recipients>,
        message: impl Into<String>,
        language: Option<SmsLanguage>,
    ) -> Result<Fast2smsResponse, Fast2smsError> {
        self.to(numbers).message(message).route(SmsRoute::Quick);
        if let Some(language) = language {
            self.language(language);
        }
        self.send().await
    }

    /// Send an SMS via the DLT route.
    pub async fn dlt(
        &mut self,
        numbers: impl Into<Recipients>,
        template_id: impl Into<String>,
        variables: impl Into<VariableValues>,
        sender_id: Option<String>,
        entity_id: Option<String>,
    ) -> Result<Fast2smsResponse, Fast2smsError> {
        let template_id = template_id.into();
        self.to(numbers)
            .message(template_id.clone())
            .template_id(template_id)
            .variables(variables)
            .route(SmsRoute::Dlt);
        if let Some(sender_id) = sender_id {
            self.sender_id(sender_id);
        }
        if let Some(entity_id) = entity_id {
            self.entity_id(entity_id);
        }
        self.send().await
    }

    /// Send an OTP SMS.
    pub async fn otp(
        &mut self,
        numbers: impl Into<Recipients>,
        otp_value: impl Into<String>,
    ) -> Result<Fast2smsResponse, Fast2smsError> {
        self.to(numbers).message(otp_value).route(SmsRoute::Otp);
        self.send().await
    }

    /// Retrieve the wallet balance.
    ///
    /// When a threshold is given and the reported balance is at or below it,
    /// subscribed listeners receive a low-balance notification.
    pub async fn check_balance(
        &self,
        threshold: Option<f64>,
    ) -> Result<WalletBalanceResponse, Fast2smsError> {
        let response = self.execute(Vec::new(), WALLET_PATH).await?;
        let Fast2smsResponse::WalletBalance(wallet) = response else {
            return Err(MalformedResponseError::UnexpectedShape {
                expected: "wallet balance",
            }
            .into());
        };

        if let (Some(balance), Some(threshold)) = (wallet.balance, threshold) {
            if balance <= threshold {
                warn!(balance, threshold, "Fast2sms balance below threshold");
                for listener in &self.listeners {
                    listener.low_balance(balance, threshold);
                }
            }
        }

        Ok(wallet)
    }

    /// Check the balance against the configured threshold.
    pub async fn monitor_balance(&self) -> Result<WalletBalanceResponse, Fast2smsError> {
        self.check_balance(Some(self.config.balance_threshold)).await
    }

    /// Retrieve DLT manager details (registered senders or templates).
    pub async fn dlt_manager(
        &self,
        lookup: DltManagerType,
    ) -> Result<DltManagerResponse, Fast2smsError> {
        let response = self
            .execute(encode_dlt_manager_form(lookup), DLT_MANAGER_PATH)
            .await?;
        match response {
            Fast2smsResponse::DltManager(manager) => Ok(manager),
            _ => Err(MalformedResponseError::UnexpectedShape {
                expected: "DLT manager",
            }
            .into()),
        }
    }

    fn take_parameters(&mut self) -> SmsParameters {
        std::mem::replace(
            &mut self.params,
            SmsParameters::new(
                self.config.default_sender_id.clone(),
                self.config.default_route,
            ),
        )
    }

    async fn execute(
        &self,
        payload: Vec<(String, String)>,
        path: &str,
    ) -> Result<Fast2smsResponse, Fast2smsError> {
        debug!(path, "dispatching Fast2sms request");

        let response = if fake::is_enabled() {
            HttpResponse {
                status: 200,
                body: fake::record(path, &payload),
            }
        } else {
            let url = format!("{}{}", self.config.base_url, path);
            match self.http.post_form(&url, &self.config.api_key, &payload).await {
                Ok(response) => response,
                Err(source) => {
                    let error = Fast2smsError::Transport(source);
                    warn!(path, error = %error, "Fast2sms request failed");
                    self.notify_failed(&payload, &error, None);
                    return Err(error);
                }
            }
        };

        if !(200..=299).contains(&response.status) {
            let body: Option<Value> = serde_json::from_str(&response.body).ok();
            let message = body
                .as_ref()
                .and_then(|value| value.get("message"))
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_API_ERROR)
                .to_owned();
            let error = Fast2smsError::Provider {
                message,
                status_code: Some(i64::from(response.status)),
                body: body.clone(),
            };
            warn!(path, status = response.status, error = %error, "Fast2sms rejected the request");
            self.notify_failed(&payload, &error, body.as_ref());
            return Err(error);
        }

        let classified = match classify_response(&response.body) {
            Ok(classified) => classified,
            Err(source) => {
                let raw: Option<Value> = serde_json::from_str(&response.body).ok();
                let error = Fast2smsError::MalformedResponse(source);
                warn!(path, error = %error, "Fast2sms response could not be classified");
                self.notify_failed(&payload, &error, raw.as_ref());
                return Err(error);
            }
        };

        if !classified.is_success() {
            let raw = Value::Object(classified.raw().clone());
            let error = Fast2smsError::Provider {
                message: classified.message().to_owned(),
                status_code: classified.error_code(),
                body: Some(raw.clone()),
            };
            warn!(path, error = %error, "Fast2sms reported a failure");
            self.notify_failed(&payload, &error, Some(&raw));
            return Err(error);
        }

        if let Fast2smsResponse::SmsSend(send) = &classified {
            info!(request_id = %send.request_id, "Fast2sms message dispatched");
            for listener in &self.listeners {
                listener.sms_sent(&payload, send);
            }
        }

        Ok(classified)
    }

    fn notify_failed(
        &self,
        payload: &[(String, String)],
        error: &Fast2smsError,
        raw: Option<&Value>,
    ) {
        for listener in &self.listeners {
            listener.sms_failed(payload, error, raw);
        }
    }
}
