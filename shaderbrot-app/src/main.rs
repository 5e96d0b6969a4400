mod app;
mod app_dir;
mod canvas;
mod events;
mod gl_program;
mod hud;
mod preferences;
mod snapshot;

fn main() -> eframe::Result {
    app::run()
}
