use crate::error::UrlError;

/// Эндпоинты integration API.
///
/// Отличаются только шаблоном и набором параметров, поэтому это данные, а не типы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Информация по всем ККТ
    Kkts,
    /// Короткие чеки без наименований за период
    Receipts,
    /// Детальные чеки с `Items` за период
    ReceiptsShort,
    /// Чеки закрытой смены
    ShiftReceipts,
    /// z-отчёты за период
    ZReports,
    /// Детальный чек по `RawId`
    ReceiptById,
    /// Детальный чек по номеру смены и номеру ФД в смене
    ReceiptByShift,
}

impl Endpoint {
    /// Все эндпоинты
    pub const ALL: [Endpoint; 7] = [
        Endpoint::Kkts,
        Endpoint::Receipts,
        Endpoint::ReceiptsShort,
        Endpoint::ShiftReceipts,
        Endpoint::ZReports,
        Endpoint::ReceiptById,
        Endpoint::ReceiptByShift,
    ];

    /// Шаблон пути (после `/api/integration/v1`)
    pub fn template(self) -> &'static str {
        match self {
            // укороченный `/inn/{INN}/kkts?AuthToken=` отдаёт то же самое
            Endpoint::Kkts => {
                "/inn/{INN}/kkts?FNSerialNumber={FNumber}&KKTSerialNumber={KKTNumber}&KKTRegNumber={KKTRegNumber}&AuthToken={Code}"
            }
            Endpoint::Receipts => {
                "/inn/{INN}/kkt/{KKTRegNumber}/receipts?dateFrom={Date1}&dateTo={Date2}&AuthToken={Code}"
            }
            // в документации описан `/DateFrom/{Date1}/DateTo/{Date2}/...`, он не работает
            Endpoint::ReceiptsShort => {
                "/inn/{INN}/kkt/{KKTRegNumber}/receipts-with-fpd-short?dateFrom={Date1}&dateTo={Date2}&AuthToken={Code}"
            }
            Endpoint::ShiftReceipts => {
                "/inn/{INN}/kkt/{KKTRegNumber}/receipts?ShiftNumber={Shift}&FnNumber={FNumber}&AuthToken={Code}"
            }
            Endpoint::ZReports => {
                "/inn/{INN}/kkt/{KKTRegNumber}/zreports?dateFrom={Date1}&dateTo={Date2}&AuthToken={Code}"
            }
            Endpoint::ReceiptById => "/inn/{INN}/kkt/{KKTRegNumber}/receipt/{RawId}?AuthToken={Code}",
            Endpoint::ReceiptByShift => {
                "/inn/{INN}/kkt/{KKTRegNumber}/zreport/{ShiftNumber}/receipt/{DocShiftNumber}?AuthToken={Code}"
            }
        }
    }

    /// Параметры, которые вызывающий передаёт сверх реквизитов кассы и токена
    pub fn extra_params(self) -> &'static [&'static str] {
        match self {
            Endpoint::Kkts => &[],
            Endpoint::Receipts | Endpoint::ReceiptsShort | Endpoint::ZReports => &["Date1", "Date2"],
            Endpoint::ShiftReceipts => &["Shift"],
            Endpoint::ReceiptById => &["RawId"],
            Endpoint::ReceiptByShift => &["ShiftNumber", "DocShiftNumber"],
        }
    }
}

/// Подставляет значения в плейсхолдеры `{Name}` за один проход.
///
/// Подставленные значения повторно не сканируются.
pub fn render(template: &str, params: &[(&str, &str)]) -> Result<String, UrlError> {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    let mut offset = 0;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);

        let after = &rest[open + 1..];
        let close = after.find('}').ok_or(UrlError::Unclosed(offset + open))?;
        let name = &after[..close];

        let value = params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| UrlError::MissingParam(name.to_string()))?;
        out.push_str(value);

        let consumed = open + 1 + close + 1;
        rest = &rest[consumed..];
        offset += consumed;
    }

    out.push_str(rest);
    Ok(out)
}
