mod app;
mod blob;
mod config;
mod field;
mod frame;
mod render;
mod sim;
mod surface;
mod terminal;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
