use std::ffi::CString;
use std::num::NonZeroU32;
use std::panic::{self, UnwindSafe};

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use thiserror::Error;

use tracing::{debug, error, info};

use winit::dpi::{LogicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;

use spinning_triangle::animation::Animation;
use spinning_triangle::frame::Frame;
use spinning_triangle::shaders::{
    FRAGMENT_SHADER, MODEL_UNIFORM, POSITION_ATTRIBUTE, VERTEX_SHADER,
};
use spinning_triangle::TRIANGLE;

use crate::args::Args;

const GL_MAJOR: u8 = 4;
const GL_MINOR: u8 = 6;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const TITLE: &str = "test window";

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    geometry: Geometry,
    program: Program,
    model_location: i32,
    renderer: GlRenderer,
    frame_limit: Option<u64>,
}

impl App {
    pub fn new(args: &Args) -> Result<Self, AppError> {
        let event_loop = init_quietly(EventLoop::new)?;
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Logical(LogicalSize::new(WIDTH as f64, HEIGHT as f64)))
            .with_resizable(false)
            .with_title(TITLE);

        let (gl_context, gl_window) = open_gl_window(&event_loop, window_builder)?;

        // Physical size, may differ from the requested logical size when scaled.
        let (fb_width, fb_height): (u32, u32) = gl_window.window.inner_size().into();
        info!(
            width = fb_width,
            height = fb_height,
            scale = gl_window.window.scale_factor(),
            "created window"
        );

        let renderer = GlRenderer::new();
        renderer.resize(fb_width, fb_height);

        let builder = GeometryBuilder::new(&TRIANGLE).with_attribute(VertexAttribute::Vec3);
        debug_assert_eq!(builder.layout()[0].index, POSITION_ATTRIBUTE);
        let geometry = builder.build()?;

        let program = ProgramBuilder::new(VERTEX_SHADER, FRAGMENT_SHADER).build()?;
        let model_location = program.uniform_location(MODEL_UNIFORM)?;
        debug!(model_location, "cached model uniform");

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            geometry,
            program,
            model_location,
            renderer,
            frame_limit: args.frames,
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            gl_context,
            gl_window,
            geometry,
            program,
            model_location,
            mut renderer,
            frame_limit,
        } = self;

        let mut animation = Animation::new();
        let mut frames: u64 = 0;

        event_loop.run(move |event, _window_target, control_flow| {
            control_flow.set_poll();
            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    info!(frames, "window closed");
                    control_flow.set_exit();
                }
                Event::MainEventsCleared => {
                    animation.step();
                    let frame = Frame::new(&animation);
                    debug_assert_eq!(frame.vertices, geometry.vertices());

                    renderer.clear_color(frame.clear_color);
                    renderer.begin(&program);
                    renderer.set_matrix4(model_location, frame.model_columns());
                    renderer.draw(&geometry);
                    renderer.end();

                    if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                        error!("Could not present frame: {e}");
                        control_flow.set_exit_with_code(1);
                        return;
                    }

                    frames += 1;
                    if frame_limit.map_or(false, |limit| frames >= limit) {
                        info!(frames, "frame limit reached");
                        control_flow.set_exit();
                    }
                }
                _ => (),
            }
        })
    }
}

/// Creates the window with a current OpenGL core context and loads GL functions.
fn open_gl_window(
    event_loop: &EventLoop<()>,
    window_builder: WindowBuilder,
) -> Result<(PossiblyCurrentContext, GlWindow), AppError> {
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
    let template = ConfigTemplateBuilder::new();

    let (window, gl_config) = display_builder
        .build(event_loop, template, |configs| {
            // glutin errors out before calling the picker when nothing matches
            configs.max_by_key(|c| c.num_samples()).unwrap()
        })
        .map_err(|e| AppError::Display(e.to_string()))?;

    let window = window.ok_or(AppError::NoWindow)?;
    let handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    let context_attr = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(GL_MAJOR, GL_MINOR))))
        .with_profile(GlProfile::Core)
        .build(Some(handle));

    let gl_window = GlWindow::new(window, &gl_config)?;

    let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
        .make_current(&gl_window.surface)?;

    gl::load_with(|s| match CString::new(s) {
        Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
        Err(_) => std::ptr::null(),
    });

    if !(gl::Viewport::is_loaded()
        && gl::CreateProgram::is_loaded()
        && gl::GenVertexArrays::is_loaded()
        && gl::DrawArrays::is_loaded())
    {
        return Err(AppError::Loader);
    }

    Ok((gl_context, gl_window))
}

/// Runs a windowing-layer initializer, turning its panic into an error.
///
/// winit reports a missing display server by panicking. The default hook is
/// silenced meanwhile so the failure is logged once, through `AppError`.
fn init_quietly<T>(init: impl FnOnce() -> T + UnwindSafe) -> Result<T, AppError> {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(init);
    panic::set_hook(hook);

    result.map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown reason".to_string());

        AppError::EventLoop(reason)
    })
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::ZeroSize)?,
            NonZeroU32::new(height).ok_or(AppError::ZeroSize)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Window system initialization failed: {0}")]
    EventLoop(String),
    #[error("Window creation failed: {0}")]
    Display(String),
    #[error("Window creation failed")]
    NoWindow,
    #[error("Window has a zero sized framebuffer")]
    ZeroSize,
    #[error("OpenGL context setup failed: {0}")]
    Context(#[from] glutin::error::Error),
    #[error("OpenGL function loading failed")]
    Loader,
    #[error("Geometry upload failed: {0}")]
    Geometry(#[from] GBError),
    #[error(transparent)]
    Program(#[from] PBError),
}
