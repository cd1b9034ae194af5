//! Desktop relay: opens a window and logs the normalized gestures it receives

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use futures::channel::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use gesture_relay::build_info;
use gesture_relay::config::RelayConfig;
use gesture_relay::gesture::{
    Broadcasted, ChannelBroadcast, Engine, GestureEvent, RawEvent, TargetId, Vec2,
    normalize_wheel,
};
use gesture_relay::health;
use gesture_relay::platform::{WinitCollector, WinitHost};

/// The window is the container every raw payload arrives on
const WINDOW_TARGET: TargetId = TargetId(0);
const BROADCAST_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "relay", author, version, about, long_about = None)]
struct Args {
    /// Configuration profile (defaults to RELAY_PROFILE, then "debug")
    #[arg(short, long)]
    profile: Option<String>,

    /// Override the engine mode (virtual, native, fake)
    #[arg(short, long)]
    mode: Option<String>,

    /// Run the health checks and exit
    #[arg(long)]
    check: bool,

    /// Print build information and exit
    #[arg(long)]
    version_info: bool,
}

struct RelayApp {
    config: RelayConfig,
    window: Option<Window>,
    collector: WinitCollector,
    engine: Engine<WinitHost>,
    broadcasts: Option<mpsc::Receiver<Broadcasted>>,
    /// Simulated document position for native and fake modes
    document_offset: Vec2,
}

impl RelayApp {
    fn new(config: RelayConfig) -> Result<Self> {
        let host = WinitHost::new(config.window.height as f32);
        let mut engine =
            Engine::new(config.engine.clone(), host).context("invalid engine options")?;

        let mut broadcasts = None;
        if engine.config().emit_global() {
            let (broadcast, receiver) = ChannelBroadcast::channel(BROADCAST_CAPACITY);
            engine = engine.with_broadcast(broadcast);
            broadcasts = Some(receiver);
        }

        engine.on(|event: &GestureEvent| {
            info!(
                category = %event.category,
                dx = event.delta.x,
                dy = event.delta.y,
                "gesture"
            );
        })?;

        Ok(Self {
            config,
            window: None,
            collector: WinitCollector::new(),
            engine,
            broadcasts,
            document_offset: Vec2::ZERO,
        })
    }

    /// Hands a raw payload to the engine
    ///
    /// In native and fake modes the window stands in for a scrollable
    /// document: wheel input moves the document and the engine observes the
    /// resulting scroll.
    fn forward(&mut self, raw: RawEvent) {
        match (self.engine.config().scroll_target(), raw) {
            (Some(target), RawEvent::Wheel(wheel)) => {
                let moved = self.document_offset + normalize_wheel(&wheel);
                self.document_offset = Vec2::new(moved.x.max(0.0), moved.y.max(0.0));
                self.engine
                    .host_mut()
                    .set_scroll_offset(target, self.document_offset);
                self.engine.handle_event(target, RawEvent::Scroll);
            }
            (_, raw) => self.engine.handle_event(WINDOW_TARGET, raw),
        }
    }

    fn drain_broadcasts(&mut self) {
        let Some(receiver) = self.broadcasts.as_mut() else {
            return;
        };
        while let Ok(Some(message)) = receiver.try_next() {
            debug!(name = %message.name, delta = ?message.event.delta, "broadcast observed");
        }
    }
}

impl ApplicationHandler for RelayApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let scale_factor = window.scale_factor();
                let size = window.inner_size().to_logical::<f32>(scale_factor);
                info!(
                    window.width = size.width,
                    window.height = size.height,
                    mode = %self.engine.config().mode_name(),
                    "Window created, listening for gestures"
                );
                self.collector.set_scale_factor(scale_factor as f32);
                self.engine.host_mut().set_viewport_height(size.height);
                self.window = Some(window);
            }
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.drain_broadcasts();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                self.engine.destroy();
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => {
                if let Some(window) = &self.window {
                    let logical = size.to_logical::<f32>(window.scale_factor());
                    self.engine.host_mut().set_viewport_height(logical.height);
                }
            }
            _ => {}
        }

        if let Some(raw) = self.collector.handle_window_event(&event) {
            self.forward(raw);
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if args.version_info {
        println!("{}", build_info::detailed_info());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &args.profile {
        Some(profile) => RelayConfig::load(profile),
        None => RelayConfig::load_from_env(),
    }
    .context("failed to load configuration")?;

    if let Some(mode) = args.mode {
        config.engine.mode = mode;
    }

    init_tracing(&config.log_filter);
    info!(
        version = %build_info::version_string(),
        profile = %config.profile,
        "Starting relay"
    );

    if args.check {
        let report = health::run_all_checks();
        health::print_report(&report);
        return Ok(ExitCode::from(report.exit_code() as u8));
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = RelayApp::new(config)?;
    event_loop.run_app(&mut app).context("event loop failed")?;

    Ok(ExitCode::SUCCESS)
}
