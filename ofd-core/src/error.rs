use std::path::PathBuf;

use thiserror::Error;

/// Верхнеуровневый тип ошибок крейта
#[derive(Debug, Error)]
pub enum OfdError {
    /// Ошибки файлового хранилища
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Ошибки токена авторизации
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Ошибки сборки URL
    #[error(transparent)]
    Url(#[from] UrlError),
}

/// Ошибки JSON-хранилища
#[derive(Debug, Error)]
pub enum StoreError {
    /// Не удалось записать файл
    #[error("failed to write {path:?}")]
    Write {
        /// Путь к файлу
        path: PathBuf,
        /// Исходная ошибка
        #[source]
        source: std::io::Error,
    },

    /// Файл есть, но JSON битый
    #[error("malformed json in {path:?}")]
    Parse {
        /// Путь к файлу
        path: PathBuf,
        /// Исходная ошибка
        #[source]
        source: serde_json::Error,
    },

    /// Валидный JSON, но не объект
    #[error("json in {path:?} is not an object")]
    NotAnObject {
        /// Путь к файлу
        path: PathBuf,
    },

    /// Ошибка сериализации
    #[error("json encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ошибки токена
#[derive(Debug, Error)]
pub enum TokenError {
    /// Сервер авторизации ответил не 200
    #[error("authentication failed: http status {status}")]
    AuthenticationFailed {
        /// HTTP-статус ответа
        status: u16,
    },

    /// Сервер вернул пустой `AuthToken`
    #[error("auth token in payload is empty")]
    EmptyToken,

    /// В ответе нет обязательного поля
    #[error("missing field in token payload: {0}")]
    MissingField(&'static str),

    /// Дата истечения не в формате %Y-%m-%dT%H:%M:%S
    #[error("bad expiration timestamp: {value:?}")]
    BadExpiration {
        /// Значение из ответа
        value: String,
        /// Ошибка разбора
        #[source]
        source: chrono::ParseError,
    },

    /// Тело ответа не JSON-объект
    #[error("bad token payload: {0}")]
    BadPayload(String),

    /// Сетевая ошибка
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Не удалось сохранить кэш
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Ошибки подстановки в шаблон URL
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    /// Для плейсхолдера не передано значение
    #[error("missing value for placeholder {{{0}}}")]
    MissingParam(String),

    /// Незакрытая фигурная скобка
    #[error("unclosed placeholder at byte {0}")]
    Unclosed(usize),

    /// Значение нельзя вставить в путь как есть (`/`, `?`, `&` и т.п.)
    #[error("unsafe value for {name}: {value:?}")]
    UnsafeSegment {
        /// Имя параметра
        name: &'static str,
        /// Переданное значение
        value: String,
    },
}

/// Ошибки HTTP-транспорта
#[derive(Debug, Error)]
pub enum TransportError {
    /// Ошибка ureq (соединение, TLS, чтение тела и т.д.)
    #[error("http request failed: {0}")]
    Request(#[from] ureq::Error),

    /// Ошибка ввода-вывода
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
