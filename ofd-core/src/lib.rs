//! # ofd-core
//!
//! Клиент API ofd.ru (оператор фискальных данных): токен авторизации,
//! чеки, z-отчёты и сводка по товарам.
//!
//! Этот крейт содержит:
//!
//! - [`json_store`] — чтение/запись JSON-объекта в файл (кэш токена)
//! - [`token`] — токен авторизации, проверка срока и кэш в файле
//! - [`endpoints`] — шаблоны URL integration API и подстановка параметров
//! - [`transport`] — HTTP-слой (трейт + блокирующая реализация на `ureq`)
//! - [`api`] — клиент для одной кассы
//! - [`receipts`] — подсчёт количества товара по чекам
//! - [`types`] — доменные типы
//! - [`error`] — типы ошибок
//!
//! ## Пример: подстановка в шаблон
//!
//! ```rust
//! use ofd_core::endpoints::{render, Endpoint};
//!
//! let url = render(
//!     Endpoint::ReceiptById.template(),
//!     &[("INN", "7700000000"), ("KKTRegNumber", "123"), ("RawId", "r1"), ("Code", "T")],
//! )
//! .unwrap();
//! assert_eq!(url, "/inn/7700000000/kkt/123/receipt/r1?AuthToken=T");
//! ```
//!
//! ## Пример: количество товара по чекам
//!
//! ```rust
//! use ofd_core::receipts::{total_items_quantity, Quantity};
//! use serde_json::json;
//!
//! let receipts = vec![
//!     json!({"Items": [{"Name": "A", "Quantity": 2}]}),
//!     json!({"Items": [{"Name": "A", "Quantity": 3}, {"Name": "B", "Quantity": 1}]}),
//!     json!({}),
//! ];
//! let totals = total_items_quantity(&receipts);
//! assert_eq!(totals["A"], Quantity::Whole(5));
//! assert_eq!(totals["B"], Quantity::Whole(1));
//! ```
//!
//! ## Дизайн
//!
//! Всё синхронно и однопоточно. Сеть спрятана за [`transport::Transport`],
//! поэтому кэш токена и клиент проверяются без сервера.
//! Логирование только через `log`, настройку логгера делает приложение.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Запросы к integration API.
pub mod api;

/// Шаблоны URL.
pub mod endpoints;

/// Ошибки `ofd-core`.
pub mod error;

/// JSON-файл как хранилище.
pub mod json_store;

/// Сводка по товарам.
pub mod receipts;

/// Токен авторизации.
pub mod token;

/// HTTP-транспорт.
pub mod transport;

/// Доменные типы.
pub mod types;

/// Общие константы
mod constants;
pub use constants::{DATE_FORMAT, DEFAULT_TOKEN_FILE, MAX_RANGE_DAYS, OFD_BASE_URL};

// --- Re-exports (публичный фасад API) ---

pub use crate::api::OfdClient;
pub use crate::error::{OfdError, StoreError, TokenError, TransportError, UrlError};
pub use crate::receipts::{ItemTotals, Quantity, total_items_quantity};
pub use crate::token::{TokenCache, TokenRecord};
pub use crate::transport::{HttpResponse, Transport, UreqTransport};
pub use crate::types::{Credentials, DateRange, DeviceIdentity};
