use clap::Parser;
use client::game::ClientGame;
use client::input::InputSampler;
use client::mirror::PlayerMirror;
use client::network::spawn_network_thread;
use client::rendering::Renderer;
use log::{error, info};
use macroquad::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket URL of the server
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8000")]
    server: String,

    /// Window width
    #[arg(short = 'w', long, default_value = "800")]
    width: i32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "600")]
    height: i32,
}

fn window_conf() -> Conf {
    let args = Args::parse();

    Conf {
        window_title: "Multiplayer".to_owned(),
        window_width: args.width,
        window_height: args.height,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    info!("Controls: ZQSD, WASD or arrow keys to move");

    let mirror = PlayerMirror::spawn(&mut ::rand::thread_rng(), screen_width(), screen_height());
    let mut game = ClientGame::from_mirror(mirror);

    let mut network = match spawn_network_thread(args.server) {
        Ok(network) => network,
        Err(e) => {
            error!("Failed to start network thread: {}", e);
            return;
        }
    };

    let mut input = InputSampler::new();
    let mut renderer = Renderer::new();

    loop {
        while let Some(event) = network.try_recv() {
            if let Some(packet) = game.handle_event(event) {
                network.send(packet);
            }
        }

        if let Some(packet) = game.update(&input.sample()) {
            network.send(packet);
        }

        renderer.render(&game);
        next_frame().await;
    }
}
