//! Главный исполняемый файл stepql

use anyhow::Context;
use clap::Parser;
use stepql::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli
        .load_config()
        .context("failed to load configuration")?;

    // Повторная инициализация логгера не считается ошибкой
    let _ = env_logger::Builder::new()
        .parse_filters(&config.logging.level)
        .try_init();
    log::debug!("stepql {} with {:?}", stepql::VERSION, config);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let ok = cli.execute(&config, stdin.lock(), &mut stdout)?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
