use std::io::Write;

use gbstep::RunConfig;

fn main() {
    env_logger::init();

    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let config = RunConfig::from_env()?;
    log::info!("Stepping ROM path: '{}'", config.rom_path.display());

    let mut stdout = std::io::stdout().lock();
    let report = gbstep::run(&config, &mut stdout)?;
    if !report.title.is_empty() {
        writeln!(stdout, "cartridge: {}", report.title)?;
    }
    writeln!(stdout, "{report}")?;
    report.into_result()
}
