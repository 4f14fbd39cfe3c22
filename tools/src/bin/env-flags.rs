use clap::Parser;
use typenv::{EnvReader, must_parse, with_fallback_to_default_on_error};
use typenv_tools::{Opts, Settings, init_log};
use url::Url;

fn main() -> anyhow::Result<()> {
    init_log();
    let opts = Opts::parse();
    // Lenient mode falls back to defaults for malformed env values.
    let lenient: bool = must_parse("ENV_FLAGS_LENIENT", false, &[]);
    let reader = EnvReader::new(&[with_fallback_to_default_on_error(lenient)])?;
    let settings = Settings::resolve(&reader, opts)?;
    tracing::info!(
        port = settings.port,
        peers = settings.peers.len(),
        "resolved settings"
    );

    println!("port:      {}", settings.port);
    println!("timeout:   {:?}", settings.timeout);
    let peers: Vec<&str> = settings.peers.iter().map(Url::as_str).collect();
    println!("peers:     {peers:?}");
    println!("features:  {}", settings.features.join(","));
    println!(
        "database:  {}://{}",
        settings.database_url.scheme(),
        settings.database_url.host_str().unwrap_or("-")
    );
    Ok(())
}
