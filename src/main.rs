mod app;
mod audio;
mod catalog;
mod cli;
mod config;
mod mpris;
mod playback;
mod runtime;
mod search;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
