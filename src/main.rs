// Native Texture - Command-line entry point
//
// Loads a PNG into a native texture and prints its memory layout.
//
// Usage: native-texture <image.png> [format] [--config <file>]

use native_texture::config::CONFIG_FILE;
use native_texture::{TextureConfig, TextureFactory, TextureFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

struct Args {
    image: PathBuf,
    format: Option<TextureFormat>,
    config: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut image = None;
    let mut format = None;
    let mut config = PathBuf::from(CONFIG_FILE);

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| "--config needs a file".to_string())?;
            }
            _ if image.is_none() => image = Some(PathBuf::from(arg)),
            _ if format.is_none() => {
                format = Some(arg.parse::<TextureFormat>().map_err(|e| e.to_string())?)
            }
            _ => return Err(format!("unexpected argument '{}'", arg)),
        }
    }

    Ok(Args {
        image: image.ok_or_else(|| "missing image path".to_string())?,
        format,
        config,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("native-texture: {}", e);
            eprintln!("Usage: native-texture <image.png> [format] [--config <file>]");
            return ExitCode::from(2);
        }
    };

    let config = if args.config.exists() {
        TextureConfig::load_or_default(&args.config)
    } else {
        TextureConfig::default()
    };
    let format = args.format.unwrap_or(config.loader.default_format);
    let factory = TextureFactory::new(&config);

    let texture = match factory.create_resource_from_png(&args.image, format) {
        Ok(texture) => texture,
        Err(e) => {
            eprintln!("native-texture: {}: {}", args.image.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let texture = texture.borrow();

    println!("Image:      {}", args.image.display());
    println!("Format:     {}", texture.format());
    println!("Size:       {}x{}", texture.width(), texture.height());
    println!(
        "Allocated:  {}x{}",
        texture.corrected_width(),
        texture.corrected_height()
    );
    println!("Block:      {}", texture.block_width());
    println!("Stride:     {} bytes", texture.stride());
    println!("Total:      {} bytes", texture.bytes_required());
    println!(
        "Memory:     {} system, {} video",
        texture.system_memory_usage(),
        texture.video_memory_usage()
    );

    ExitCode::SUCCESS
}
