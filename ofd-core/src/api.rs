use log::{debug, info, warn};
use serde_json::Value;

use crate::constants::{INTEGRATION_PATH, MAX_RANGE_DAYS, OFD_BASE_URL};
use crate::endpoints::{Endpoint, render};
use crate::error::{OfdError, UrlError};
use crate::transport::Transport;
use crate::types::{DateRange, DeviceIdentity};

/// Клиент integration API для одной кассы.
///
/// Каждый метод строит URL по шаблону, делает GET и на ответ 200 возвращает
/// поле `Data`. Любой другой исход (не 200, сеть, битое тело, нет `Data`)
/// даёт `Ok(None)`. `Err` только если не удалось собрать URL.
pub struct OfdClient<T> {
    transport: T,
    base_url: String,
    token: String,
    device: DeviceIdentity,
    last_url: Option<String>,
    last_response: Option<Value>,
}

impl<T: Transport> OfdClient<T> {
    /// Клиент к ofd.ru
    pub fn new(transport: T, token: impl Into<String>, device: DeviceIdentity) -> Self {
        Self::with_base_url(transport, OFD_BASE_URL, token, device)
    }

    /// Клиент к другому адресу сервиса
    pub fn with_base_url(
        transport: T,
        base_url: &str,
        token: impl Into<String>,
        device: DeviceIdentity,
    ) -> Self {
        Self {
            transport,
            base_url: format!("{}{}", base_url.trim_end_matches('/'), INTEGRATION_PATH),
            token: token.into(),
            device,
            last_url: None,
            last_response: None,
        }
    }

    /// Реквизиты кассы
    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    /// URL последнего запроса
    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    /// Разобранный JSON последнего ответа 200
    pub fn last_response(&self) -> Option<&Value> {
        self.last_response.as_ref()
    }

    /// Полный URL эндпоинта: реквизиты кассы + токен + `extra`
    pub fn url(&self, endpoint: Endpoint, extra: &[(&str, &str)]) -> Result<String, OfdError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("INN", self.device.tax_id.as_str()),
            ("FNumber", self.device.fiscal_storage_number.as_str()),
            ("KKTNumber", self.device.device_serial_number.as_str()),
            ("KKTRegNumber", self.device.registration_number.as_str()),
            ("Code", self.token.as_str()),
        ];
        params.extend_from_slice(extra);

        let path = render(endpoint.template(), &params)?;
        Ok(format!("{}{}", self.base_url, path))
    }

    /// Информация по всем ККТ (список)
    pub fn kkts(&mut self) -> Result<Option<Value>, OfdError> {
        self.fetch(Endpoint::Kkts, &[])
    }

    /// Первая ККТ из списка
    pub fn kkt_info(&mut self) -> Result<Option<Value>, OfdError> {
        let list = self.kkts()?;
        Ok(list.and_then(|v| match v {
            Value::Array(mut items) if !items.is_empty() => Some(items.swap_remove(0)),
            _ => None,
        }))
    }

    /// Короткие чеки без наименований за период (по умолчанию сегодня).
    ///
    /// Показывает чеки открытой смены.
    pub fn receipts(&mut self, range: Option<DateRange>) -> Result<Option<Value>, OfdError> {
        self.fetch_range(Endpoint::Receipts, range)
    }

    /// Детальные чеки с `Items` за период (по умолчанию сегодня).
    ///
    /// Возвращает чеки и открытой, и закрытых смен.
    pub fn receipts_short(&mut self, range: Option<DateRange>) -> Result<Option<Value>, OfdError> {
        self.fetch_range(Endpoint::ReceiptsShort, range)
    }

    /// Чеки закрытой смены в короткой форме; открытую смену не отдаёт
    pub fn shift_receipts(&mut self, shift: u32) -> Result<Option<Value>, OfdError> {
        let shift = shift.to_string();
        self.fetch(Endpoint::ShiftReceipts, &[("Shift", shift.as_str())])
    }

    /// z-отчёты за период (по умолчанию сегодня).
    ///
    /// Для открытой смены отчёт приходит без полей `Close_*` и `ShiftDocsCount`.
    pub fn z_reports(&mut self, range: Option<DateRange>) -> Result<Option<Value>, OfdError> {
        self.fetch_range(Endpoint::ZReports, range)
    }

    /// Детальный чек по уникальному идентификатору `RawId`.
    ///
    /// `RawId` идёт в путь URL, поэтому допускаются только `A-Z a-z 0-9 - _ .`
    pub fn receipt_by_id(&mut self, raw_id: &str) -> Result<Option<Value>, OfdError> {
        let raw_id = path_segment("RawId", raw_id)?;
        self.fetch(Endpoint::ReceiptById, &[("RawId", raw_id)])
    }

    /// Детальный чек по номеру смены и номеру ФД за смену
    pub fn receipt_by_shift(&mut self, shift: u32, doc: u32) -> Result<Option<Value>, OfdError> {
        let shift = shift.to_string();
        let doc = doc.to_string();
        self.fetch(
            Endpoint::ReceiptByShift,
            &[("ShiftNumber", shift.as_str()), ("DocShiftNumber", doc.as_str())],
        )
    }

    fn fetch_range(
        &mut self,
        endpoint: Endpoint,
        range: Option<DateRange>,
    ) -> Result<Option<Value>, OfdError> {
        let range = range.unwrap_or_else(DateRange::today);
        if range.exceeds_service_limit() {
            warn!("{endpoint:?}: range {range} is longer than {MAX_RANGE_DAYS} days, service may reject it");
        }

        let from = range.date_from();
        let to = range.date_to();
        self.fetch(endpoint, &[("Date1", from.as_str()), ("Date2", to.as_str())])
    }

    fn fetch(&mut self, endpoint: Endpoint, extra: &[(&str, &str)]) -> Result<Option<Value>, OfdError> {
        let url = self.url(endpoint, extra)?;
        debug!("{endpoint:?}: GET {}", redact_token(&url));

        self.last_url = Some(url.clone());
        self.last_response = None;

        let resp = match self.transport.get(&url) {
            Ok(r) => r,
            Err(e) => {
                warn!("{endpoint:?}: request failed: {e}");
                return Ok(None);
            }
        };

        if !resp.is_ok() {
            info!("{endpoint:?}: http status {}, no data", resp.status);
            return Ok(None);
        }

        let json: Value = match serde_json::from_str(&resp.body) {
            Ok(v) => v,
            Err(e) => {
                warn!("{endpoint:?}: response is not json: {e}");
                return Ok(None);
            }
        };

        let data = json.get("Data").cloned();
        if data.is_none() {
            warn!("{endpoint:?}: response has no Data field");
        }
        self.last_response = Some(json);

        Ok(data)
    }
}

fn path_segment<'a>(name: &'static str, value: &'a str) -> Result<&'a str, UrlError> {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && value != "."
        && value != "..";

    if safe {
        Ok(value)
    } else {
        Err(UrlError::UnsafeSegment {
            name,
            value: value.to_string(),
        })
    }
}

/// Прячет значение параметра `AuthToken` (до `&` или конца строки)
fn redact_token(url: &str) -> String {
    const KEY: &str = "AuthToken=";

    let Some(pos) = url.find(KEY) else {
        return url.to_string();
    };
    let start = pos + KEY.len();
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);

    format!("{}***{}", &url[..start], &url[end..])
}
