use std::collections::BTreeMap;

use anyhow::Result;
use log::info;
use ofd_core::{DATE_FORMAT, OfdClient, TokenRecord, Transport, total_items_quantity};
use serde_json::{Value, json};

use crate::cli::Command;

/// Выполняет команду и возвращает JSON для печати (`null`, если данных нет).
///
/// `Command::Token` обрабатывается по записи токена, остальные через клиент.
pub(crate) fn run<T: Transport>(
    command: &Command,
    token: &TokenRecord,
    client: &mut OfdClient<T>,
) -> Result<Value> {
    let data = match command {
        Command::Token => Some(token_summary(token)),
        Command::Kkts => client.kkts()?,
        Command::KktInfo => client.kkt_info()?,
        Command::Receipts(r) => client.receipts(r.range())?,
        Command::ReceiptsShort(r) => client.receipts_short(r.range())?,
        Command::ShiftReceipts { shift } => client.shift_receipts(*shift)?,
        Command::ZReports(r) => client.z_reports(r.range())?,
        Command::Receipt { id } => client.receipt_by_id(id)?,
        Command::ShiftReceipt { shift, doc } => client.receipt_by_shift(*shift, *doc)?,
        Command::Totals(r) => client.receipts_short(r.range())?.map(totals),
    };

    if data.is_none() {
        info!("no data for {command:?}");
    }

    Ok(data.unwrap_or(Value::Null))
}

fn token_summary(token: &TokenRecord) -> Value {
    json!({
        "ExpirationDateUtc": token.expiration_utc().format(DATE_FORMAT).to_string(),
        "HasToken": !token.is_empty(),
    })
}

/// Сводка по товарам с ключами по алфавиту
fn totals(receipts: Value) -> Value {
    let list = match receipts {
        Value::Array(list) => list,
        _ => Vec::new(),
    };

    let sorted: BTreeMap<_, _> = total_items_quantity(&list).into_iter().collect();
    json!(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RangeArgs;
    use ofd_core::{DeviceIdentity, HttpResponse, TransportError};
    use std::cell::RefCell;

    /// Отдаёт одно и то же тело на любой GET
    struct Fixed {
        status: u16,
        body: &'static str,
        urls: RefCell<Vec<String>>,
    }

    impl Fixed {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                urls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Fixed {
        fn get(&self, url: &str) -> std::result::Result<HttpResponse, TransportError> {
            self.urls.borrow_mut().push(url.to_string());
            Ok(HttpResponse {
                status: self.status,
                body: self.body.to_string(),
            })
        }

        fn post_json(&self, _url: &str, _body: &Value) -> std::result::Result<HttpResponse, TransportError> {
            panic!("no POST expected");
        }
    }

    fn device() -> DeviceIdentity {
        DeviceIdentity {
            tax_id: "7700000000".into(),
            fiscal_storage_number: "9999078900001234".into(),
            device_serial_number: "0000000001".into(),
            registration_number: "0000000000012345".into(),
        }
    }

    fn token() -> TokenRecord {
        TokenRecord::new("T", "2999-01-01T00:00:00", Default::default()).unwrap()
    }

    #[test]
    fn totals_aggregates_detailed_receipts() {
        let t = Fixed::new(
            200,
            r#"{"Data":[
                {"Items":[{"Name":"Кофе","Quantity":2}]},
                {"Items":[{"Name":"Кофе","Quantity":1},{"Name":"Булка","Quantity":1}]},
                {"Id":"no items"}
            ]}"#,
        );
        let mut client = OfdClient::with_base_url(&t, "http://ofd.test", "T", device());

        let out = run(&Command::Totals(RangeArgs::default()), &token(), &mut client).unwrap();

        assert_eq!(out, json!({"Булка": 1, "Кофе": 3}));
        assert!(t.urls.borrow()[0].contains("/receipts-with-fpd-short?"));
    }

    #[test]
    fn non_200_prints_null() {
        let t = Fixed::new(500, "oops");
        let mut client = OfdClient::with_base_url(&t, "http://ofd.test", "T", device());

        let out = run(&Command::Kkts, &token(), &mut client).unwrap();
        assert_eq!(out, Value::Null);

        let out = run(&Command::Totals(RangeArgs::default()), &token(), &mut client).unwrap();
        assert_eq!(out, Value::Null);
    }

    #[test]
    fn token_command_makes_no_requests() {
        let t = Fixed::new(200, "{}");
        let mut client = OfdClient::with_base_url(&t, "http://ofd.test", "T", device());

        let out = run(&Command::Token, &token(), &mut client).unwrap();

        assert_eq!(
            out,
            json!({"ExpirationDateUtc": "2999-01-01T00:00:00", "HasToken": true})
        );
        assert!(t.urls.borrow().is_empty());
    }

    #[test]
    fn receipt_commands_pass_ids() {
        let t = Fixed::new(200, r#"{"Data":{"Id":"x"}}"#);
        let mut client = OfdClient::with_base_url(&t, "http://ofd.test", "T", device());

        let out = run(&Command::Receipt { id: "raw-7".into() }, &token(), &mut client).unwrap();
        assert_eq!(out, json!({"Id": "x"}));

        run(&Command::ShiftReceipt { shift: 5, doc: 9 }, &token(), &mut client).unwrap();
        run(&Command::ShiftReceipts { shift: 5 }, &token(), &mut client).unwrap();

        let urls = t.urls.borrow();
        assert!(urls[0].contains("/receipt/raw-7?"));
        assert!(urls[1].contains("/zreport/5/receipt/9?"));
        assert!(urls[2].contains("ShiftNumber=5&FnNumber=9999078900001234"));
    }
}
