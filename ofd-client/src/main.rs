//! Точка входа `ofd-client`.
//!
//! Жизненный цикл:
//! - парсинг CLI и загрузка `config.json`
//! - токен из файла кэша; если истёк, запрос нового и сохранение
//! - один запрос к API по выбранной команде
//! - печать результата в stdout как JSON

mod cli;
mod commands;
mod config;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;
use ofd_core::{OfdClient, TokenCache, UreqTransport};

fn main() -> anyhow::Result<()> {
    // Логи через RUST_LOG=info/debug
    env_logger::init();

    let args = cli::Args::parse();
    args.validate()?;

    let cfg = config::load_config(&args.config)?;
    let token_path = cfg.token_path(args.token_file.as_deref());

    info!(
        "Starting ofd-client: base_url={}, inn={}, kkt={}, token_file={:?}",
        cfg.base_url, cfg.kkt.tax_id, cfg.kkt.registration_number, token_path
    );

    let transport = UreqTransport::with_timeout(cfg.timeout());

    let mut cache = TokenCache::with_base_url(&token_path, &cfg.base_url, &transport);
    let has_token = cache
        .ensure_valid(&cfg.auth)
        .with_context(|| format!("failed to obtain auth token for {}", cfg.auth.login))?;
    if !has_token {
        bail!("server returned an empty auth token");
    }

    let token = cache.record().clone();
    let mut client = OfdClient::with_base_url(&transport, &cfg.base_url, token.token(), cfg.kkt.clone());

    let out = commands::run(&args.command, &token, &mut client)?;
    println!("{}", serde_json::to_string_pretty(&out)?);

    Ok(())
}
