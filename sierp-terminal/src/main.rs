/// Sierp Terminal - Sierpinski tetrahedron morph viewer
///
/// Plays the fold-and-subdivide animation in the terminal, or exports a
/// single frame as STL.
/// Controls:
///   - Space: Play/pause, L: Loop
///   - [ / ]: Scrub time, - / +: Speed
///   - WASD / Arrow Keys: Orbit, Z/X: Zoom, R: Reset camera
///   - C/B/F: Toggle color, lighting, depth fade
///   - Q/ESC: Quit
use clap::Parser;
use sierp_core::generator::DEFAULT_MAX_TIME;
use sierp_core::{stl, ConfigError, GeneratorConfig, MeshGenerator, Playback, PlaybackConfig};
use std::fs;
use std::io;
use std::path::PathBuf;
use sierp_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "sierp-terminal", version, about = "Sierpinski tetrahedron morph viewer")]
struct Args {
    /// Starting point on the timeline
    #[arg(long, default_value_t = 1.5)]
    time: f64,

    /// Timeline units per second
    #[arg(long, default_value_t = 0.5)]
    speed: f64,

    /// Start playing immediately
    #[arg(long)]
    play: bool,

    /// Wrap around at the end of the timeline
    #[arg(long = "loop")]
    looping: bool,

    /// End of the timeline; the deepest level is one less
    #[arg(long, default_value_t = DEFAULT_MAX_TIME)]
    max_time: f64,

    /// Write the frame at --time to this STL file and exit
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export ASCII instead of binary STL
    #[arg(long, requires = "export")]
    ascii: bool,
}

fn main() -> io::Result<()> {
    env_logger::builder().init();
    let args = Args::parse();

    let invalid = |e: ConfigError| io::Error::new(io::ErrorKind::InvalidInput, e);
    let config = GeneratorConfig::new(args.max_time).map_err(invalid)?;
    let generator = MeshGenerator::new(config);
    let mut playback = Playback::new(PlaybackConfig {
        max_time: config.max_time(),
        time: args.time,
        speed: args.speed,
        ..PlaybackConfig::default()
    })
    .map_err(invalid)?;

    if let Some(path) = &args.export {
        let buffers = generator.generate(playback.time());
        let name = format!("sierpinski t={}", playback.time());
        let data = if args.ascii {
            stl::to_ascii(&buffers, &name).into_bytes()
        } else {
            stl::to_binary(&buffers, &name)
        };
        fs::write(path, data).map_err(|e| {
            io::Error::new(e.kind(), format!("Failed to write {}: {}", path.display(), e))
        })?;
        log::info!(
            "wrote {} triangles to {}",
            buffers.triangle_count(),
            path.display()
        );
        return Ok(());
    }

    if args.looping {
        playback.toggle_loop();
    }
    if args.play {
        playback.toggle_play();
    }

    println!("Starting terminal viewer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_millis(500));

    let mut app = TerminalApp::new(generator, playback)?;
    app.run()?;

    Ok(())
}
