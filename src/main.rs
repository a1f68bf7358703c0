/// Main planview entry point for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use planview::AppConfig;
    use planview::cli::Cli;
    use planview::native;

    let cli = Cli::parse_args();

    // Logging depends on the config, so load errors go to stderr
    let config = match &cli.config {
        Some(path) => match AppConfig::load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => match AppConfig::load_from_default_path() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                let path = AppConfig::default_path().unwrap_or_default();
                eprintln!(
                    "Ignoring config file {}: {}, using defaults",
                    path.display(),
                    e
                );
                AppConfig::default()
            }
        },
    };

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    if cli.init_config {
        match config.save_to_default_path() {
            Ok(()) => return,
            Err(e) => {
                eprintln!("Failed to write config: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = native::run(config, cli.run_options()) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
