use std::time::Duration;

use log::trace;
use serde_json::Value;

use crate::constants::USER_AGENT;
use crate::error::TransportError;

/// Ответ сервера: статус и тело как есть
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP-статус
    pub status: u16,
    /// Тело ответа
    pub body: String,
}

impl HttpResponse {
    /// Статус 200
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Сетевой слой. Статус ответа не считается ошибкой, его разбирает вызывающий.
pub trait Transport {
    /// GET-запрос
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// POST с JSON-телом
    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        (**self).post_json(url, body)
    }
}

/// Блокирующий транспорт на `ureq`
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Без явного таймаута (значения ureq по умолчанию)
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// С общим таймаутом на запрос
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .into();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut resp = self.agent.get(url).header("User-Agent", USER_AGENT).call()?;

        let status = resp.status().as_u16();
        let body = resp.body_mut().read_to_string()?;
        trace!("GET status={status} bytes={}", body.len());

        Ok(HttpResponse { status, body })
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        let payload = serde_json::to_string(body).map_err(std::io::Error::from)?;

        let mut resp = self
            .agent
            .post(url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .send(&payload)?;

        let status = resp.status().as_u16();
        let body = resp.body_mut().read_to_string()?;
        trace!("POST status={status} bytes={}", body.len());

        Ok(HttpResponse { status, body })
    }
}
