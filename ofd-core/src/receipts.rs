use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Serialize;
use serde_json::Value;

/// Количество товара. Целое остаётся целым, пока не встретится дробное.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Штучный товар
    Whole(i64),
    /// Весовой товар
    Fractional(f64),
}

impl Quantity {
    /// Из JSON-числа; не число => `None`
    pub fn from_json(v: &Value) -> Option<Self> {
        if let Some(n) = v.as_i64() {
            return Some(Quantity::Whole(n));
        }
        v.as_f64().map(Quantity::Fractional)
    }

    /// Значение как f64
    pub fn as_f64(self) -> f64 {
        match self {
            Quantity::Whole(n) => n as f64,
            Quantity::Fractional(x) => x,
        }
    }

    fn add(self, other: Quantity) -> Quantity {
        match (self, other) {
            (Quantity::Whole(a), Quantity::Whole(b)) => match a.checked_add(b) {
                Some(sum) => Quantity::Whole(sum),
                None => Quantity::Fractional(a as f64 + b as f64),
            },
            (a, b) => Quantity::Fractional(a.as_f64() + b.as_f64()),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Whole(n) => write!(f, "{n}"),
            Quantity::Fractional(x) => write!(f, "{x}"),
        }
    }
}

/// Итог по товарам: наименование -> количество
pub type ItemTotals = HashMap<String, Quantity>;

/// Кол-во товара по чекам.
///
/// Чеки без `Items` пропускаются; позиции суммируются по `Name`.
/// Позиции без строкового `Name` или числового `Quantity` пропускаются.
pub fn total_items_quantity(receipts: &[Value]) -> ItemTotals {
    let mut totals = ItemTotals::new();

    let items = receipts
        .iter()
        .filter_map(|r| r.get("Items").and_then(Value::as_array))
        .flatten();

    for item in items {
        let name = item.get("Name").and_then(Value::as_str);
        let qty = item.get("Quantity").and_then(Quantity::from_json);

        let (Some(name), Some(qty)) = (name, qty) else {
            debug!("skipping line item without Name/Quantity: {item}");
            continue;
        };

        totals
            .entry(name.to_string())
            .and_modify(|acc| *acc = acc.add(qty))
            .or_insert(qty);
    }

    totals
}
