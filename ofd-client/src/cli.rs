use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use ofd_core::{DATE_FORMAT, DateRange};

/// OFD Client - чеки и z-отчёты кассы из личного кабинета ofd.ru.
///
/// Токен авторизации кэшируется в файле и обновляется, когда истёк.
/// Результат печатается в stdout как JSON (`null`, если данных нет).
#[derive(Parser, Debug, Clone)]
#[command(name = "ofd-client", version, about)]
pub(crate) struct Args {
    /// JSON-конфиг: {"auth": [login, password], "kkt": {"INN", "FNumber", "KKTNumber", "KKTRegNumber"}}
    #[arg(long, default_value = "config.json")]
    pub(crate) config: PathBuf,

    /// Файл кэша токена (перекрывает token_file из конфига)
    #[arg(long)]
    pub(crate) token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Проверить/обновить токен и показать срок действия
    Token,

    /// Информация по всем ККТ
    Kkts,

    /// Информация по первой ККТ
    KktInfo,

    /// Короткие чеки без наименований за период
    Receipts(RangeArgs),

    /// Детальные чеки с наименованиями за период
    ReceiptsShort(RangeArgs),

    /// Чеки закрытой смены
    ShiftReceipts {
        /// Номер смены
        #[arg(long)]
        shift: u32,
    },

    /// z-отчёты за период
    ZReports(RangeArgs),

    /// Детальный чек по RawId
    Receipt {
        /// Уникальный идентификатор чека
        #[arg(long)]
        id: String,
    },

    /// Детальный чек по номеру смены и номеру ФД в смене
    ShiftReceipt {
        /// Номер смены
        #[arg(long)]
        shift: u32,

        /// Номер ФД за смену
        #[arg(long)]
        doc: u32,
    },

    /// Количество товара по детальным чекам за период
    Totals(RangeArgs),
}

/// Период: либо --date, либо пара --from/--to. Ничего не задано => сегодня.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RangeArgs {
    /// Сутки, например 2021-02-06
    #[arg(long, value_parser = parse_date, conflicts_with_all = ["from", "to"])]
    pub(crate) date: Option<NaiveDate>,

    /// Начало периода, например 2021-02-01T00:00:01
    #[arg(long, value_parser = parse_datetime, requires = "to")]
    pub(crate) from: Option<NaiveDateTime>,

    /// Конец периода, например 2021-02-06T23:59:59
    #[arg(long, value_parser = parse_datetime, requires = "from")]
    pub(crate) to: Option<NaiveDateTime>,
}

impl RangeArgs {
    /// `None` => клиент возьмёт сегодняшние сутки
    pub(crate) fn range(&self) -> Option<DateRange> {
        match (self.date, self.from, self.to) {
            (Some(day), _, _) => Some(DateRange::for_day(day)),
            (None, Some(from), Some(to)) => Some(DateRange::new(from, to)),
            _ => None,
        }
    }
}

impl Args {
    /// Валидация аргументов (конфиг существует, период не перевёрнут)
    pub(crate) fn validate(&self) -> Result<()> {
        let md = std::fs::metadata(&self.config)
            .with_context(|| format!("config file not found: {:?}", self.config))?;
        if !md.is_file() {
            bail!("--config must point to a file: {:?}", self.config);
        }

        if let Some(range) = self.command.range_args().and_then(RangeArgs::range) {
            if range.from > range.to {
                bail!("--from must not be later than --to (got {range})");
            }
        }

        Ok(())
    }
}

impl Command {
    pub(crate) fn range_args(&self) -> Option<&RangeArgs> {
        match self {
            Command::Receipts(r)
            | Command::ReceiptsShort(r)
            | Command::ZReports(r)
            | Command::Totals(r) => Some(r),
            _ => None,
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("ofd-client").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_and_simple_commands() {
        let a = parse(&["kkts"]).unwrap();
        assert_eq!(a.config, PathBuf::from("config.json"));
        assert_eq!(a.token_file, None);
        assert_eq!(a.command, Command::Kkts);

        let a = parse(&["--config", "my.json", "--token-file", "t.json", "token"]).unwrap();
        assert_eq!(a.config, PathBuf::from("my.json"));
        assert_eq!(a.token_file, Some(PathBuf::from("t.json")));
        assert_eq!(a.command, Command::Token);
    }

    #[test]
    fn range_by_day() {
        let a = parse(&["receipts-short", "--date", "2021-02-06"]).unwrap();
        let range = a.command.range_args().unwrap().range().unwrap();

        assert_eq!(range.date_from(), "2021-02-06T00:00:01");
        assert_eq!(range.date_to(), "2021-02-06T23:59:59");
    }

    #[test]
    fn range_by_from_to() {
        let a = parse(&[
            "z-reports",
            "--from",
            "2021-02-01T00:00:01",
            "--to",
            "2021-02-06T23:59:59",
        ])
        .unwrap();
        let range = a.command.range_args().unwrap().range().unwrap();

        assert_eq!(range.date_from(), "2021-02-01T00:00:01");
        assert_eq!(range.date_to(), "2021-02-06T23:59:59");
    }

    #[test]
    fn no_range_means_today() {
        let a = parse(&["totals"]).unwrap();
        assert_eq!(a.command.range_args().unwrap().range(), None);
    }

    #[test]
    fn from_requires_to_and_date_conflicts() {
        assert!(parse(&["receipts", "--from", "2021-02-01T00:00:01"]).is_err());
        assert!(parse(&["receipts", "--to", "2021-02-01T00:00:01"]).is_err());
        assert!(
            parse(&[
                "receipts",
                "--date",
                "2021-02-01",
                "--from",
                "2021-02-01T00:00:01",
                "--to",
                "2021-02-01T23:59:59",
            ])
            .is_err()
        );
    }

    #[test]
    fn bad_formats_are_rejected() {
        assert!(parse(&["receipts", "--date", "06.02.2021"]).is_err());
        assert!(parse(&["receipts", "--from", "2021-02-01", "--to", "2021-02-02"]).is_err());
        assert!(parse(&["shift-receipts", "--shift", "-1"]).is_err());
    }

    #[test]
    fn shift_and_document_args() {
        let a = parse(&["shift-receipt", "--shift", "12", "--doc", "3"]).unwrap();
        assert_eq!(a.command, Command::ShiftReceipt { shift: 12, doc: 3 });

        let a = parse(&["receipt", "--id", "raw-1"]).unwrap();
        assert_eq!(
            a.command,
            Command::Receipt {
                id: "raw-1".to_string()
            }
        );
        assert!(a.command.range_args().is_none());
    }

    #[test]
    fn validate_checks_config_and_range_order() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("config.json");
        std::fs::write(&cfg, "{}").unwrap();
        let cfg = cfg.to_str().unwrap();

        assert!(parse(&["--config", cfg, "kkts"]).unwrap().validate().is_ok());

        let missing = dir.path().join("nope.json");
        let a = parse(&["--config", missing.to_str().unwrap(), "kkts"]).unwrap();
        assert!(a.validate().is_err());

        let a = parse(&[
            "--config",
            cfg,
            "receipts",
            "--from",
            "2021-02-06T00:00:01",
            "--to",
            "2021-02-01T00:00:01",
        ])
        .unwrap();
        let err = a.validate().unwrap_err();
        assert!(err.to_string().contains("--from"));
    }
}
