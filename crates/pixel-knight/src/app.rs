//! Application state and event loop

use anyhow::{Context, Result};
use glam::IVec2;
use std::sync::Arc;
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use pixel_knight_core::game::GameSettings;
use pixel_knight_core::levels::LevelCatalog;
use pixel_knight_core::progression::Progression;
use pixel_knight_core::timestep::FixedTimestep;
use pixel_knight_core::{Game, DISPLAY_HEIGHT, DISPLAY_WIDTH};

use crate::audio::CueLog;
use crate::config::GameConfig;
use crate::editor::{EditorButton, EditorState};
use crate::input::{keyboard, Action, Gamepad, InputMapper, InputSource};
use crate::render::{draw_game, scene, Canvas, Renderer, SceneOptions};
use crate::ui::{show_editor_panel, DebugStats, EditorCommand};

/// Startup choices from the command line, on top of the config
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub config: GameConfig,
    pub start_level: Option<usize>,
    pub editor: bool,
    /// Ignore the save file and start fresh
    pub new_game: bool,
    pub unlock_all: bool,
}

/// Main application state
pub struct App {
    // Window and rendering
    window: Arc<Window>,
    renderer: Renderer,
    canvas: Canvas,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,

    // Game
    game: Game,
    editor: Option<EditorState>,
    timestep: FixedTimestep,
    cues: CueLog,

    // Input
    input: InputMapper,
    gamepad: Gamepad,

    // UI state
    show_hud: bool,
    show_stats: bool,
    show_hitboxes: bool,
    paused: bool,

    // Timing
    last_update: Instant,
    frame_count: u64,
    fps_update_time: Instant,
    fps: f32,

    should_exit: bool,
}

impl App {
    /// Create a new app
    pub async fn new(options: LaunchOptions) -> Result<(Self, EventLoop<()>)> {
        let config = options.config;

        // Load levels and progress
        let catalog = LevelCatalog::discover(&config.levels.maps_dir)
            .with_context(|| format!("Failed to load levels from {:?}", config.levels.maps_dir))?;

        let save_path = config.progression.save_path.clone();
        let mut progression = if options.new_game {
            log::info!("Starting a new game");
            Progression::new()
        } else {
            Progression::load_or_default(&save_path)
                .with_context(|| format!("Failed to load progress from {:?}", save_path))?
        };
        if options.unlock_all {
            progression.grant_all();
        }

        let seed = match config.debug.seed {
            0 => rand::random(),
            seed => seed,
        };
        log::debug!("Effect seed: {}", seed);

        let settings = GameSettings {
            player: config.player,
            camera: config.camera,
            seed,
            save_path: config.progression.autosave.then_some(save_path),
            max_particles: config.debug.max_particles,
        };
        let start_level = options.start_level.or(config.levels.start_level);
        let game = Game::new(catalog, progression, settings, start_level)
            .context("Failed to start the game")?;

        let editor = if options.editor {
            Some(EditorState::open(game.catalog(), game.level()).context("Failed to open editor")?)
        } else {
            None
        };

        // Create event loop
        let event_loop = EventLoop::new()?;

        // Create window
        let window_attrs = WindowAttributes::default()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        // Create renderer
        let renderer =
            Renderer::new(&window, (DISPLAY_WIDTH, DISPLAY_HEIGHT), config.window.vsync).await?;

        // Setup egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &renderer.device,
            renderer.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        Ok((
            Self {
                window,
                renderer,
                canvas: Canvas::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
                egui_ctx,
                egui_state,
                egui_renderer,
                game,
                editor,
                timestep: FixedTimestep::default(),
                cues: CueLog::new(),
                input: InputMapper::new(),
                gamepad: Gamepad::new(),
                show_hud: true,
                show_stats: config.debug.show_stats_on_start,
                show_hitboxes: false,
                paused: false,
                last_update: Instant::now(),
                frame_count: 0,
                fps_update_time: Instant::now(),
                fps: 0.0,
                should_exit: false,
            },
            event_loop,
        ))
    }

    /// Run the event loop
    pub fn run(event_loop: EventLoop<()>, mut app: Self) -> Result<()> {
        event_loop.run_app(&mut app)?;
        Ok(())
    }

    /// Poll input and run as many ticks as the elapsed time allows
    fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update).as_secs_f32();
        self.last_update = now;

        // FPS counter
        self.frame_count += 1;
        let elapsed = now.duration_since(self.fps_update_time).as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.frame_count as f32 / elapsed;
            self.frame_count = 0;
            self.fps_update_time = now;
        }

        self.gamepad.poll(&mut self.input);
        self.handle_system_actions();

        let ticks = self.timestep.advance(dt);

        if let Some(editor) = self.editor.as_mut() {
            let movement = IVec2::new(
                self.input.is_held(Action::MoveRight) as i32
                    - self.input.is_held(Action::MoveLeft) as i32,
                self.input.is_held(Action::LookDown) as i32
                    - self.input.is_held(Action::LookUp) as i32,
            );
            for _ in 0..ticks {
                editor.update(movement);
            }
            self.input.consume_gameplay_edges();
            return;
        }

        if self.paused {
            // Presses made while paused do not fire on resume
            self.input.consume_gameplay_edges();
            return;
        }

        for _ in 0..ticks {
            let input = self.input.player_input();
            self.game.tick(&input);
            self.input.consume_gameplay_edges();
        }
        self.cues.process(self.game.audio.drain());
    }

    fn handle_system_actions(&mut self) {
        if self.input.take_pressed(Action::Quit) {
            self.should_exit = true;
        }
        if self.input.take_pressed(Action::ToggleHud) {
            self.show_hud = !self.show_hud;
        }
        if self.input.take_pressed(Action::Pause) && self.editor.is_none() {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        if self.input.take_pressed(Action::ToggleEditor) {
            self.toggle_editor();
        }
    }

    fn toggle_editor(&mut self) {
        match self.editor.take() {
            Some(editor) => {
                if editor.is_dirty() {
                    log::warn!("Leaving the editor with unsaved changes to {:?}", editor.path());
                }
                log::info!("Back to level {}", self.game.level());
            }
            None => match EditorState::open(self.game.catalog(), self.game.level()) {
                Ok(mut editor) => {
                    editor.scroll = self.game.camera.render_scroll().as_vec2();
                    self.editor = Some(editor);
                }
                Err(e) => log::error!("Failed to open editor: {}", e),
            },
        }
    }

    fn run_editor_command(&mut self, command: EditorCommand) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match command {
            EditorCommand::Save => {
                if let Err(e) = editor.save() {
                    log::error!("Failed to save map: {}", e);
                    return;
                }
                // The game picks up the edited map
                if let Err(e) = self.game.reload_level() {
                    log::error!("Failed to reload level after saving: {}", e);
                }
            }
            EditorCommand::Reload => {
                if let Err(e) = editor.reload() {
                    log::error!("Failed to reload map: {}", e);
                }
            }
            EditorCommand::Autotile => {
                let changed = editor.autotile();
                log::info!("Autotile updated {} tiles", changed);
            }
        }
    }

    /// Keys only the editor listens to
    fn editor_key(&mut self, key: KeyCode) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        match key {
            KeyCode::KeyG => editor.toggle_grid(),
            KeyCode::KeyT => self.run_editor_command(EditorCommand::Autotile),
            KeyCode::Enter => self.run_editor_command(EditorCommand::Save),
            KeyCode::KeyL => self.run_editor_command(EditorCommand::Reload),
            _ => return false,
        }
        true
    }

    /// Render frame
    fn render(&mut self) -> Result<()> {
        // Draw the low resolution frame
        match &self.editor {
            Some(editor) => scene::draw_editor(&mut self.canvas, editor),
            None => draw_game(
                &mut self.canvas,
                &self.game,
                SceneOptions {
                    show_hitboxes: self.show_hitboxes,
                },
            ),
        }
        self.renderer.upload(&self.canvas);

        // Collect data for egui closure to avoid borrow checker issues
        let stats = self.show_stats.then(|| DebugStats {
            fps: self.fps,
            tick: self.game.tick_count(),
            particle_count: self.game.particles.len(),
            collectables: self.game.collectables.len(),
            gamepad: self.gamepad.has_gamepad(),
            recent_cues: self.cues.recent().map(str::to_string).collect(),
        });
        let show_hud = self.show_hud;
        let paused = self.paused;

        // Begin frame
        let output = self.renderer.begin_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.renderer
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render_encoder"),
                });

        // Render display
        self.renderer.render_display(&mut encoder, &view)?;

        // Run egui
        let mut command = None;
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(editor) = self.editor.as_mut() {
                command = show_editor_panel(ctx, editor);
            } else if show_hud {
                crate::ui::show_hud(ctx, &self.game, stats.as_ref(), paused);
            }
        });

        // Handle egui platform output
        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        // Tessellate egui shapes
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        // Update egui textures
        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(
                &self.renderer.device,
                &self.renderer.queue,
                *id,
                delta,
            );
        }

        // Create screen descriptor
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.renderer.size().width, self.renderer.size().height],
            pixels_per_point: full_output.pixels_per_point,
        };

        // Update egui buffers
        self.egui_renderer.update_buffers(
            &self.renderer.device,
            &self.renderer.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        // Render egui
        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &paint_jobs,
                &screen_descriptor,
            );
        }

        // Free egui textures
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        // Submit and present
        self.renderer.submit(encoder);
        self.renderer.end_frame(output);

        if let Some(command) = command {
            self.run_editor_command(command);
        }

        Ok(())
    }

    fn save_on_exit(&self) {
        if let Err(e) = self.game.save_progress() {
            log::error!("Failed to save progress: {}", e);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // Window is created up front; nothing to do on resume
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle events first
        let egui_response = self.egui_state.on_window_event(&self.window, &event);
        if egui_response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.save_on_exit();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
            }
            WindowEvent::Focused(false) => {
                self.input.release_all(InputSource::Keyboard);
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if self.should_exit {
                    self.save_on_exit();
                    event_loop.exit();
                    return;
                }
                if let Err(e) = self.render() {
                    match e.downcast_ref::<wgpu::SurfaceError>() {
                        Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            self.renderer.reconfigure();
                        }
                        _ => log::error!("Render error: {}", e),
                    }
                }
                self.window.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let cursor = self
                    .renderer
                    .screen_to_display(position.x as f32, position.y as f32);
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_cursor(cursor);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_cursor(None);
                    editor.button_up(EditorButton::Place);
                    editor.button_up(EditorButton::Remove);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(editor) = self.editor.as_mut() else {
                    return;
                };
                let button = match button {
                    MouseButton::Left => EditorButton::Place,
                    MouseButton::Right => EditorButton::Remove,
                    _ => return,
                };
                match state {
                    ElementState::Pressed => editor.button_down(button),
                    ElementState::Released => editor.button_up(button),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 50.0).round() as i32,
                };
                if let Some(editor) = self.editor.as_mut() {
                    editor.wheel(steps);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_shift(modifiers.state().shift_key());
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                let pressed = event.state == ElementState::Pressed;

                if pressed && !event.repeat {
                    if self.editor_key(key) {
                        return;
                    }
                    if key == KeyCode::F4 {
                        self.show_hitboxes = !self.show_hitboxes;
                    }
                }

                if let Some(action) = keyboard::action_for_key(key) {
                    if !event.repeat {
                        self.input.set_held(InputSource::Keyboard, action, pressed);
                    }
                }
            }
            _ => {}
        }
    }
}
