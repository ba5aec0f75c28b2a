use std::time::Instant;

use projection_demo::{
    abs::App,
    config::DemoConfig,
    demo::{CubeDemo, resizes_drawable},
    logging,
};
use sdl2::{event::Event, keyboard::Keycode};

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("Could not install logger: {e}");
    }

    let config = DemoConfig::discover();
    log::set_max_level(config.level_filter());

    let mut app = match App::new(
        &config.window.title,
        config.window.width,
        config.window.height,
        config.window.fullscreen,
    ) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    app.set_vsync(config.window.vsync);

    let mut demo = match CubeDemo::new(&app.gl, &config, app.drawable_size()) {
        Ok(demo) => demo,
        Err(e) => {
            log::error!("Could not set up the scene: {e}");
            std::process::exit(1);
        }
    };

    let start = Instant::now();

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window { win_event, .. } if resizes_drawable(&win_event) => {
                    let (width, height) = app.window.drawable_size();
                    demo.resize(width, height);
                }
                _ => {}
            }
        }

        demo.render(start.elapsed().as_secs_f32());
        app.window.gl_swap_window();
    }

    log::info!("Shutting down after {:.1}s", start.elapsed().as_secs_f32());
}
