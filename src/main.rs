use foodgram_api::{
    configuration::get_configuration, startup::Application,
    telemetry::setup_tracing,
};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    setup_tracing("foodgram_api", "info", std::io::stdout);
    let configuration = get_configuration().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Could not read configuration: {e}"),
        )
    })?;

    let app = Application::build(configuration).await?;
    app.run_until_stopped().await?;
    Ok(())
}
