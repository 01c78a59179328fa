mod animation;
mod app;
mod config;
mod frame;
mod hint;
mod input;
mod nav;
mod renderer;
mod scene;
mod scroll;
mod track;

use anyhow::Context;
use app::App;
use config::Config;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load_or_default();

    let event_loop = EventLoop::new().context("create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("run app")?;
    Ok(())
}
