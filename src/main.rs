mod app;
mod cli;
mod commands;
mod configuration;
mod context;
mod repository;
mod storage;
mod tracing;
mod types;

fn main() -> anyhow::Result<()> {
    app::run()
}
