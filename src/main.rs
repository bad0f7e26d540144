use portal::config::SETTINGS;

/// Fallback settings for builds shipped without a .env file (mobile)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    // Variables already in the environment win over the bundled ones.
    if let Err(err) = dotenvy::from_read(BUNDLED_CONFIG.as_bytes()) {
        eprintln!("bundled config ignored: {err}");
    }
}

fn init_logging(level: tracing::Level) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

fn main() {
    load_dotenv();
    if let Err(err) = init_logging(SETTINGS.log_level) {
        eprintln!("{err:#}");
    }
    tracing::info!(
        chat = %SETTINGS.chat_api_base,
        upload = %SETTINGS.upload_url,
        "starting portal"
    );
    dioxus::launch(portal::ui::App);
}
