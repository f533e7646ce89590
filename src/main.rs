use gridtone::{
    Config, FileStorage, InstrumentRegistry, Sequencer, SequencerApp, Store, create_instruments,
    init_sequencer,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> gridtone::Result<()> {
    let config = Config::discover()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let instruments = Store::new(InstrumentRegistry::default());
    create_instruments(&instruments);

    let sequencer = Store::new(Sequencer::default());
    let storage = Arc::new(FileStorage::new(&config.storage_dir));
    let _persistence = init_sequencer(&sequencer, storage, &config.storage_key)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_title("gridtone"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "gridtone",
        options,
        Box::new(|_cc| Ok(Box::new(SequencerApp::new(sequencer, instruments)))),
    ) {
        tracing::error!(error = %e, "window closed with an error");
    }

    Ok(())
}
