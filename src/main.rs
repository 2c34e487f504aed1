mod app;
mod camera;
mod components;
mod constants;
mod error;
mod floor_texture;
mod input;
mod level;
mod projection;
mod renderer;
mod software;
mod spawning;
mod systems;
mod ui;

use camera::{CameraState, PlayerCamera};
use clap::Parser;
use constants::*;
use hecs::World;
use level::{Level, LevelConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::Renderer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use glutin::prelude::*;
use glutin::surface::WindowSurface;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use egui_glow::EguiGlow;

/// Mode-7 floor renderer with floor-aligned billboards
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Level file (JSON); a generated level is used when omitted
    #[arg(long)]
    level: Option<PathBuf>,

    /// Render one frame in software to this PNG and exit
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Enable puffin profiling and serve it over puffin_http
    #[arg(long)]
    profile: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let level = match &args.level {
        Some(path) => Level::load(path)?,
        None => Level::from_config(LevelConfig::default(), Path::new("."))?,
    };

    if let Some(path) = &args.snapshot {
        let player = PlayerCamera::from_level(&level.config);
        let world = spawn_world(&level, player.position);
        software::render_snapshot(&level, &player, &world)?.save(path)?;
        info!(path = %path.display(), "snapshot written");
        return Ok(());
    }

    let _profiler = if args.profile {
        puffin::set_scopes_on(true);
        let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        info!(%addr, "puffin server listening");
        Some(puffin_http::Server::new(&addr)?)
    } else {
        None
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(level);
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn spawn_world(level: &Level, center: glam::Vec2) -> World {
    let mut world = World::new();
    let mut rng = StdRng::seed_from_u64(level.config.sprites.seed);
    spawning::scatter_billboards(&mut world, &level.config.sprites, center, &mut rng);
    world
}

struct App {
    level: Level,
    state: Option<AppState>,
}

struct AppState {
    // Window and GL
    window: Window,
    gl_surface: glutin::surface::Surface<WindowSurface>,
    gl_context: glutin::context::PossiblyCurrentContext,
    _gl: Arc<glow::Context>,
    egui_glow: EguiGlow,
    renderer: Renderer,

    // Scene
    world: World,
    player: PlayerCamera,

    // UI and input
    input: input::InputState,
    panel: ui::DebugPanel,
    stats: ui::FrameStats,

    last_frame_time: Instant,
}

impl App {
    fn new(level: Level) -> Self {
        Self { level, state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_context = match app::create_window(event_loop, &self.level.config.name) {
            Ok(context) => context,
            Err(e) => {
                error!(%e, "window setup failed");
                event_loop.exit();
                return;
            }
        };
        let app::WindowContext {
            window,
            gl_surface,
            gl_context,
            gl,
            egui_glow,
        } = window_context;

        let mut renderer = match Renderer::new(gl.clone(), &self.level.floor) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!(%e, "renderer setup failed");
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        let [logical_w, logical_h] = self.level.config.viewport;
        renderer.resize(size.width, size.height, logical_w, logical_h);

        let player = PlayerCamera::from_level(&self.level.config);
        let world = spawn_world(&self.level, player.position);
        info!(level = %self.level.config.name, sprites = world.len(), "started");

        self.state = Some(AppState {
            window,
            gl_surface,
            gl_context,
            _gl: gl,
            egui_glow,
            renderer,
            world,
            player,
            input: input::InputState::new(),
            panel: ui::DebugPanel::new(),
            stats: ui::FrameStats::default(),
            last_frame_time: Instant::now(),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui handle the event first
        let egui_consumed = state.egui_glow.on_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app::resize_surface(&state.gl_surface, &state.gl_context, size.width, size.height);
                let [logical_w, logical_h] = self.level.config.viewport;
                state.renderer.resize(size.width, size.height, logical_w, logical_h);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed if !egui_consumed.consumed => {
                            if key == KeyCode::Escape {
                                event_loop.exit();
                            }
                            state.input.press(key);
                        }
                        ElementState::Pressed => {}
                        ElementState::Released => state.input.release(key),
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                state.update_and_render(&mut self.level);
                state.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

impl AppState {
    fn update_and_render(&mut self, level: &mut Level) {
        puffin::GlobalProfiler::lock().new_frame();
        puffin::profile_function!();

        let now = Instant::now();
        let raw_dt = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;
        let dt = raw_dt.min(MAX_FRAME_DT);
        self.stats.frame_ms = raw_dt * 1000.0;

        let input = input::process_keyboard(&mut self.input);
        if input.toggle_debug_panel {
            self.panel.toggle();
        }
        if input.toggle_fullscreen {
            self.toggle_fullscreen();
        }
        self.player.update(input.turn_axis, input.move_axis, input.climb_axis, dt);
        systems::update_drift(&mut self.world, dt);

        // Camera is fixed for the rest of the frame from here on
        let camera = match CameraState::from_player(&self.player, &level.config, level.config.viewport()) {
            Ok(camera) => camera,
            Err(e) => {
                warn!(%e, "skipping frame");
                return;
            }
        };
        let quads = systems::collect_sprites(&self.world, &camera);
        self.stats.total_sprites = self.world.len() as usize;
        self.stats.visible_sprites = quads.len();

        let mut actions = ui::UiActions::default();
        {
            let panel = &mut self.panel;
            let player = &mut self.player;
            let stats = &self.stats;
            let config = &mut level.config;
            self.egui_glow.run(&self.window, |ctx| {
                actions = panel.show(ctx, config, player, stats);
            });
        }
        self.process_ui_actions(actions, level);

        {
            puffin::profile_scope!("render_floor");
            self.renderer.clear(level.config.sky_color);
            self.renderer.render_floor(&camera);
        }
        {
            puffin::profile_scope!("render_sprites");
            self.renderer.render_sprites(&camera, &quads);
        }

        self.egui_glow.paint(&self.window);

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!(%e, "swap_buffers failed");
        }
    }

    fn process_ui_actions(&mut self, actions: ui::UiActions, level: &Level) {
        if actions.respawn_sprites {
            self.world = spawn_world(level, self.player.position);
            info!(sprites = self.world.len(), "respawned sprites");
        }
        if actions.save_snapshot {
            let path = PathBuf::from(format!("snapshot-{}.png", level.config.name.replace(' ', "_")));
            match software::render_snapshot(level, &self.player, &self.world).and_then(|image| Ok(image.save(&path)?)) {
                Ok(()) => info!(path = %path.display(), "snapshot written"),
                Err(e) => warn!(%e, "snapshot failed"),
            }
        }
    }

    fn toggle_fullscreen(&self) {
        use winit::window::Fullscreen;
        let fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(fullscreen);
    }
}
