use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Utc};
use log::{debug, info, warn};
use serde_json::{Value, json};

use crate::constants::{AUTH_PATH, DATE_FORMAT, OFD_BASE_URL};
use crate::error::TokenError;
use crate::json_store::{JsonMap, read_json, save_json};
use crate::transport::Transport;
use crate::types::Credentials;

/// Ключи в ответе сервера авторизации (и в файле кэша)
const AUTH_TOKEN_KEY: &str = "AuthToken";
const EXPIRATION_KEY: &str = "ExpirationDateUtc";

/// Токен авторизации и момент его истечения (UTC).
///
/// Неизменяемое значение: при обновлении заменяется целиком.
/// Пустой токен означает, что авторизации ещё не было.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    token: String,
    expiration_utc: NaiveDateTime,
    raw: JsonMap,
}

impl TokenRecord {
    /// Проверяет, что токен не пустой и дата в формате `%Y-%m-%dT%H:%M:%S`.
    /// Пустой токен бывает только у [`TokenRecord::empty`].
    pub fn new(token: impl Into<String>, expiration_utc: &str, raw: JsonMap) -> Result<Self, TokenError> {
        let token = token.into();
        if token.is_empty() {
            return Err(TokenError::EmptyToken);
        }

        let expiration_utc = NaiveDateTime::parse_from_str(expiration_utc, DATE_FORMAT).map_err(|e| {
            TokenError::BadExpiration {
                value: expiration_utc.to_string(),
                source: e,
            }
        })?;

        Ok(Self {
            token,
            expiration_utc,
            raw,
        })
    }

    /// Разбирает ответ сервера / содержимое файла кэша
    pub fn from_payload(payload: JsonMap) -> Result<Self, TokenError> {
        let token = payload
            .get(AUTH_TOKEN_KEY)
            .and_then(Value::as_str)
            .ok_or(TokenError::MissingField(AUTH_TOKEN_KEY))?
            .to_string();

        let expiration = payload
            .get(EXPIRATION_KEY)
            .and_then(Value::as_str)
            .ok_or(TokenError::MissingField(EXPIRATION_KEY))?
            .to_string();

        Self::new(token, &expiration, payload)
    }

    /// Пустой токен, истекающий в `now`
    pub fn empty(now: NaiveDateTime) -> Self {
        Self {
            token: String::new(),
            expiration_utc: now,
            raw: JsonMap::new(),
        }
    }

    /// Сам токен (значение параметра `AuthToken`)
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Момент истечения
    pub fn expiration_utc(&self) -> NaiveDateTime {
        self.expiration_utc
    }

    /// Ответ сервера целиком
    pub fn raw(&self) -> &JsonMap {
        &self.raw
    }

    /// Токена нет
    pub fn is_empty(&self) -> bool {
        self.token.is_empty()
    }

    /// Истёк ли токен к моменту `now` (UTC). Без запаса по времени.
    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        now >= self.expiration_utc
    }
}

/// Кэш токена в JSON-файле.
///
/// Два состояния: валиден / истёк. Истёкший токен обновляется
/// запросом к серверу авторизации, ответ сохраняется в файл как есть.
pub struct TokenCache<T> {
    path: PathBuf,
    auth_url: String,
    transport: T,
    record: TokenRecord,
}

impl<T: Transport> TokenCache<T> {
    /// Кэш в файле `path`, авторизация на ofd.ru
    pub fn new(path: impl Into<PathBuf>, transport: T) -> Self {
        Self::with_base_url(path, OFD_BASE_URL, transport)
    }

    /// Кэш с другим адресом сервиса
    pub fn with_base_url(path: impl Into<PathBuf>, base_url: &str, transport: T) -> Self {
        Self {
            path: path.into(),
            auth_url: format!("{}{}", base_url.trim_end_matches('/'), AUTH_PATH),
            transport,
            record: TokenRecord::empty(now_utc()),
        }
    }

    /// Путь к файлу кэша
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Текущий токен
    pub fn record(&self) -> &TokenRecord {
        &self.record
    }

    /// Истёк ли токен сейчас
    pub fn is_expired(&self) -> bool {
        self.record.is_expired_at(now_utc())
    }

    /// Сбрасывает в пустое состояние: токена нет, истекает "сейчас"
    pub fn flush(&mut self) {
        self.record = TokenRecord::empty(now_utc());
    }

    /// Читает токен из файла. Нет файла или он испорчен => пустое состояние.
    pub fn load_cached(&mut self) {
        let loaded = match read_json(&self.path) {
            Ok(Some(map)) => TokenRecord::from_payload(map).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e.into()),
        };

        match loaded {
            Ok(Some(record)) => {
                debug!(
                    "cached token from {:?}, expires {}",
                    self.path,
                    record.expiration_utc()
                );
                self.record = record;
            }
            Ok(None) => {
                debug!("no token cache at {:?}", self.path);
                self.flush();
            }
            Err(e) => {
                warn!("ignoring broken token cache {:?}: {e}", self.path);
                self.flush();
            }
        }
    }

    /// Получает новый токен. При любой ошибке текущее состояние не меняется.
    pub fn refresh(&mut self, credentials: &Credentials) -> Result<(), TokenError> {
        let body = json!({
            "Login": credentials.login,
            "Password": credentials.password,
        });

        info!("requesting auth token for {}", credentials.login);
        let resp = self.transport.post_json(&self.auth_url, &body)?;

        if !resp.is_ok() {
            return Err(TokenError::AuthenticationFailed {
                status: resp.status,
            });
        }

        let payload = match serde_json::from_str::<Value>(&resp.body) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(TokenError::BadPayload(format!(
                    "expected json object, got {other}"
                )));
            }
            Err(e) => return Err(TokenError::BadPayload(e.to_string())),
        };

        let record = TokenRecord::from_payload(payload)?;
        info!("got auth token, expires {} UTC", record.expiration_utc());
        self.record = record;

        Ok(())
    }

    /// Пишет ответ сервера в файл (если он есть)
    pub fn save(&self) -> Result<(), TokenError> {
        if self.record.raw().is_empty() {
            return Ok(());
        }
        save_json(self.record.raw(), &self.path)?;
        Ok(())
    }

    /// Загрузить из кэша, при необходимости обновить, сохранить.
    ///
    /// `Ok(true)` если в итоге есть пригодный токен.
    pub fn ensure_valid(&mut self, credentials: &Credentials) -> Result<bool, TokenError> {
        self.load_cached();

        if self.is_expired() {
            self.refresh(credentials)?;
        }

        self.save()?;
        Ok(!self.record.is_empty())
    }
}

fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}
