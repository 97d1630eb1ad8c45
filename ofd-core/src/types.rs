use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::constants::{DATE_FORMAT, MAX_RANGE_DAYS};

/// Реквизиты кассы, по которым строятся запросы.
///
/// Имена полей при (де)сериализации совпадают с `config.json`:
/// `INN`, `FNumber`, `KKTNumber`, `KKTRegNumber`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// ИНН организации
    #[serde(rename = "INN")]
    pub tax_id: String,
    /// Номер ФН
    #[serde(rename = "FNumber")]
    pub fiscal_storage_number: String,
    /// Заводской номер кассы
    #[serde(rename = "KKTNumber")]
    pub device_serial_number: String,
    /// Регистрационный номер ККТ в ФНС
    #[serde(rename = "KKTRegNumber")]
    pub registration_number: String,
}

/// Логин и пароль личного кабинета.
///
/// В конфиге задаются парой: `"auth": ["login", "password"]`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct Credentials {
    /// Логин
    pub login: String,
    /// Пароль
    pub password: String,
}

impl Credentials {
    /// Новая пара логин/пароль
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl From<(String, String)> for Credentials {
    fn from((login, password): (String, String)) -> Self {
        Self { login, password }
    }
}

// пароль в логи не пишем
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// Период выборки для запросов чеков и z-отчётов (локальное время).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Начало периода
    pub from: NaiveDateTime,
    /// Конец периода
    pub to: NaiveDateTime,
}

impl DateRange {
    /// Произвольный период
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    /// Сутки: с 00:00:01 до 23:59:59
    pub fn for_day(day: NaiveDate) -> Self {
        let midnight = day.and_time(NaiveTime::MIN);
        Self {
            from: midnight + TimeDelta::seconds(1),
            to: midnight + TimeDelta::seconds(86_399),
        }
    }

    /// Сегодняшние сутки по локальным часам
    pub fn today() -> Self {
        Self::for_day(Local::now().date_naive())
    }

    /// Начало периода в формате API
    pub fn date_from(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    /// Конец периода в формате API
    pub fn date_to(&self) -> String {
        self.to.format(DATE_FORMAT).to_string()
    }

    /// Период длиннее, чем принимает сервис (локально не запрещаем)
    pub fn exceeds_service_limit(&self) -> bool {
        self.to - self.from > TimeDelta::days(MAX_RANGE_DAYS)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.date_from(), self.date_to())
    }
}
