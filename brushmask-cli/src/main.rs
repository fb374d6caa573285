//! # Brushmask Preview
//!
//! Renders a brush mask dab from the command line.

use brushmask_cli::{export, preview, CliArgs, PreviewConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("brushmask_cli=info,brushmask_core=info"));

    // Logs go to stderr; stdout carries tables and XML.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // Use JSON format when requested (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let mut config = PreviewConfig::from(args);
    if !config.has_output() {
        config.table = true;
    }

    let generator = preview::load_generator(&config)?;
    tracing::debug!(
        "Generator ready: {} diameter {} scale {} softness {}",
        generator.id(),
        generator.base().diameter(),
        config.scale,
        config.softness
    );

    if config.export_xml {
        println!("{}", generator.to_xml());
    }

    if config.table {
        print!(
            "{}",
            export::value_table(&generator, export::default_reach(&generator))
        );
    }

    if let Some(ref path) = config.output {
        let dab = preview::render(&generator, &config)?;
        export::write_png(&dab, path)?;
    }

    Ok(())
}
