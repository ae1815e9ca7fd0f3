use clap::Parser;
use log::error;

use winit::event_loop::EventLoop;

use nehe::args::Args;
use nehe::config::Settings;

mod app;

use app::{App, AppError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    let event_loop = EventLoop::new();

    let app = match start(&args, &event_loop) {
        Ok(app) => app,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    app.run(event_loop);
}

fn start(args: &Args, event_loop: &EventLoop<()>) -> Result<App, AppError> {
    let settings = Settings::resolve(args)?;

    let mut app = App::new(settings, event_loop)?;
    app.on_load()?;

    Ok(app)
}
