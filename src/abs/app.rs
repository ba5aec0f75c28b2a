//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("SDL error: {0}")]
    Sdl(String),
    #[error("failed to create window: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),
    #[error("failed to create OpenGL context: {0}")]
    Context(String),
}

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a new [`App`] instance with the specified title, width, and height.
    /// The width and height options are ignored if `fullscreen` is set to `true`.
    pub fn new(title: &str, width: u32, height: u32, fullscreen: bool) -> Result<Self, AppError> {
        Self::create(title, width, height, fullscreen, false)
    }

    /// Creates an [`App`] whose window is never shown. Useful to obtain a GL context
    /// without putting anything on screen.
    pub fn hidden(title: &str, width: u32, height: u32) -> Result<Self, AppError> {
        Self::create(title, width, height, false, true)
    }

    fn create(title: &str, width: u32, height: u32, fullscreen: bool, hidden: bool) -> Result<Self, AppError> {
        let sdl = sdl2::init().map_err(AppError::Sdl)?;
        let video_subsystem = sdl.video().map_err(AppError::Sdl)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);
        gl_attr.set_double_buffer(true);

        let (width, height) = if fullscreen {
            let display_mode = video_subsystem
                .current_display_mode(0)
                .map_err(AppError::Sdl)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (width, height)
        };

        let mut builder = video_subsystem.window(title, width, height);
        builder.opengl().resizable().allow_highdpi();
        if hidden {
            builder.hidden();
        }
        let mut window = builder.build()?;
        if fullscreen {
            window
                .set_fullscreen(sdl2::video::FullscreenType::Desktop)
                .map_err(AppError::Sdl)?;
        }

        let gl_context = window.gl_create_context().map_err(AppError::Context)?;
        window
            .gl_make_current(&gl_context)
            .map_err(AppError::Context)?;
        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(AppError::Sdl)?;

        log::info!(
            "Created {}x{} window \"{}\" with an OpenGL {}.{} context",
            width,
            height,
            title,
            gl_attr.context_major_version(),
            gl_attr.context_minor_version()
        );

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
        })
    }

    /// Turns vertical synchronisation on or off. Failure is not fatal: the
    /// loop simply runs unthrottled.
    pub fn set_vsync(&self, enabled: bool) {
        let interval = if enabled {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(e) = self.video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("Could not set swap interval: {e}");
        }
    }

    /// Size of the drawable area in pixels, which differs from the window size on
    /// high-DPI displays.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }
}
