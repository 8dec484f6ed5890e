//! Wavetank - a raindrop-driven water surface simulation
//!
//! A fixed-timestep wave solver integrates a 2D height field, rebuilds a
//! normal map from it each frame, and publishes the result into a texture
//! the preview pipeline shades.

use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use clap::Parser;
use glam::Vec3;
use wavetank::cli::Args;
use wavetank::params::{RecordingConfig, RenderConfig};
use wavetank::publish;
use wavetank::rendering::{RenderSystem, Uniforms};
use wavetank::water::WaterSystem;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    water: WaterSystem,

    // Configuration
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,

    // Time tracking
    start_time: Instant,
    last_frame: Option<Instant>,
    frame_num: usize,
}

impl App {
    fn new(water: WaterSystem, recording_config: Option<RecordingConfig>) -> Self {
        Self {
            window: None,
            render_system: None,
            water,
            render_config: RenderConfig::default(),
            recording_config,
            start_time: Instant::now(),
            last_frame: None,
            frame_num: 0,
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Wavetank - Water Surface Simulation")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Initialize rendering system
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.water.grid_size() as u32,
            self.recording_config.clone(),
        ))
        .unwrap();

        println!("\nWavetank is running!");
        println!("Press ESC to quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Advance the simulation and render a single frame
    fn render_frame(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let Some(ref mut render_system) = self.render_system else {
            return;
        };

        // Measured frame delta
        let now = Instant::now();
        let dt_s = match self.last_frame {
            Some(last) => now.duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);

        // All due solver steps run before the normal map is rebuilt
        let steps = self.water.advance(dt_s);

        // Publish the fresh map; on failure the previous texture contents
        // stay visible for one more frame
        if steps > 0 {
            let grid_size = self.water.grid_size();
            match publish::publish(
                self.water.normal_map(),
                grid_size,
                render_system.staging_mut(),
            ) {
                Ok(()) => render_system.upload_normal_map(),
                Err(e) => log::warn!("Normal map publish failed: {}", e),
            }
        }

        // Slowly orbiting light so the surface relief reads even between drops
        let time_s = self.start_time.elapsed().as_secs_f32();
        let light_dir = Vec3::new(
            0.4 * (time_s * 0.2).cos(),
            0.9,
            0.4 * (time_s * 0.2).sin(),
        )
        .normalize();
        render_system.update_uniforms(&Uniforms {
            light_dir: light_dir.to_array(),
            time: time_s,
        });

        match render_system.render(self.frame_num, self.water.normal_map()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if let Some(ref config) = self.recording_config {
            self.frame_num += 1;
            if self.frame_num >= config.total_frames() {
                println!("Recording finished: {} frames", self.frame_num);
                event_loop.exit();
            }
        }
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let physics = args.water_physics();

    println!("Wavetank - fixed-step water surface simulation");
    println!(
        "Grid {}x{}, step {:.4}s, speed x{}",
        physics.grid_size, physics.grid_size, physics.step_duration_s, physics.speed_multiplier
    );

    let water = match WaterSystem::new(&physics) {
        Ok(water) => water,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let recording_config = match args.create_recording_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    if let Some(ref config) = recording_config {
        println!(
            "Recording {} frames to {}",
            config.total_frames(),
            config.frames_dir()
        );
    }

    let mut app = App::new(water, recording_config);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
