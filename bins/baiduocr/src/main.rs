//! baiduocr: read text from JPEG/PNG images with the Baidu OCR service.

use anyhow::{bail, Context};
use baiduocr::config::{ClientConfig, ENV_API_KEY, ENV_API_PATH, ENV_TIMEOUT_MS, NO_TIMEOUT};
use baiduocr::{OcrClient, OcrOption, Rgba};
use baiduocr_image::{detect_format, png_to_jpeg, ImageFormat};
use baiduocr_telemetry::{TelemetryConfig, Timer};
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "baiduocr")]
#[command(about = "Read Chinese and English text from JPEG/PNG images")]
#[command(version)]
struct Cli {
    /// API key sent to the OCR service
    #[arg(long, env = ENV_API_KEY, default_value = "", hide_env_values = true)]
    api_key: String,

    /// API endpoint (defaults to the public Baidu endpoint)
    #[arg(long, env = ENV_API_PATH, default_value = "")]
    api_path: String,

    /// Request timeout in milliseconds (0 = 5s default, -1 = no timeout)
    #[arg(long, env = ENV_TIMEOUT_MS, default_value_t = 0, allow_negative_numbers = true)]
    timeout_ms: i64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize text in an image file
    Parse {
        /// Path to a JPEG or PNG file
        path: PathBuf,
        /// Recognition language
        #[arg(long, value_enum, default_value_t = Lang::ChnEng)]
        lang: Lang,
        /// Background for transparent PNG areas, as R,G,B or R,G,B,A
        #[arg(long, value_parser = parse_color)]
        background: Option<Rgba<u8>>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Include bounding rectangles (JSON output only)
        #[arg(long, requires = "json")]
        rects: bool,
    },
    /// Detect image format from file content
    Detect {
        /// Path to image file
        path: PathBuf,
    },
    /// Convert a PNG file to the JPEG that would be uploaded
    Convert {
        /// Input PNG file
        input: PathBuf,
        /// Output JPEG file
        output: PathBuf,
        /// Background for transparent areas, as R,G,B or R,G,B,A
        #[arg(long, value_parser = parse_color)]
        background: Option<Rgba<u8>>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Lang {
    /// Chinese and English
    ChnEng,
    /// English only
    Eng,
    /// Japanese
    Jap,
}

impl Lang {
    fn option(self) -> OcrOption {
        match self {
            Lang::ChnEng => baiduocr::lang_chn_eng(),
            Lang::Eng => baiduocr::lang_eng(),
            Lang::Jap => baiduocr::lang_jap(),
        }
    }
}

/// Parse `R,G,B` or `R,G,B,A`; alpha defaults to 255.
fn parse_color(value: &str) -> Result<Rgba<u8>, String> {
    let channels = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid color channel {part:?}: expected 0-255"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match channels.as_slice() {
        [r, g, b] => Ok(Rgba([*r, *g, *b, 255])),
        [r, g, b, a] => Ok(Rgba([*r, *g, *b, *a])),
        _ => Err(format!("expected R,G,B or R,G,B,A, got {value:?}")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = baiduocr_telemetry::init_with_config(telemetry) {
        eprintln!("{} {e}", "⚠".yellow());
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "✗".red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        api_key,
        api_path,
        timeout_ms,
        command,
        ..
    } = cli;

    match command {
        Commands::Parse {
            path,
            lang,
            background,
            json,
            rects,
        } => {
            let client = build_client(api_key, api_path, timeout_ms)?;

            let mut options = vec![lang.option()];
            options.extend(background.map(baiduocr::png_background));

            let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let timer = Timer::start("parse");
            let fragments = client.recognize_image(&data, &options)?;
            timer.stop();

            if json && rects {
                println!("{}", serde_json::to_string_pretty(&fragments)?);
            } else {
                let words: Vec<_> = fragments.into_iter().map(|f| f.word).collect();
                if json {
                    println!("{}", serde_json::to_string_pretty(&words)?);
                } else {
                    println!("{}", words.join(", "));
                }
            }
        }

        Commands::Detect { path } => {
            let data = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let format = detect_format(&data)?;
            println!("Format: {:?}", format);
            println!("MIME: {}", format.mime_type());
            println!("Extensions: {:?}", format.extensions());
        }

        Commands::Convert {
            input,
            output,
            background,
        } => {
            let data =
                std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let jpeg = match detect_format(&data)? {
                ImageFormat::Png => png_to_jpeg(&data, background)?,
                ImageFormat::Jpeg => bail!("{} is already a JPEG image", input.display()),
            };
            std::fs::write(&output, &jpeg)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "{} Wrote {} ({} bytes)",
                "✓".green(),
                output.display(),
                jpeg.len()
            );
        }
    }

    Ok(())
}

fn build_client(api_key: String, api_path: String, timeout_ms: i64) -> anyhow::Result<OcrClient> {
    // Checked here so a bad flag is a usage error rather than a library panic.
    if timeout_ms < NO_TIMEOUT {
        bail!("--timeout-ms must be 0, {NO_TIMEOUT}, or positive (got {timeout_ms})");
    }
    if api_key.is_empty() {
        tracing::warn!("No API key set; the service will reject the request");
    }

    let config = ClientConfig::new(api_key)
        .with_api_path(api_path)
        .with_timeout_ms(timeout_ms);
    Ok(OcrClient::with_config(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("255,255,255").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("1, 2, 3, 4").unwrap(), Rgba([1, 2, 3, 4]));
        assert!(parse_color("256,0,0").is_err());
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("white").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_timeout_flag() {
        let cli = Cli::try_parse_from(["baiduocr", "--timeout-ms", "-1", "detect", "x.png"]).unwrap();
        assert_eq!(cli.timeout_ms, NO_TIMEOUT);
    }
}
