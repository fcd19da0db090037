use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tiledit_core::{Config, CursorState, RopeBuffer};
use tiledit_draw::{rgb, Color, Drawer, MonoFace, Point, Rect, SharedFaceCache};
use tiledit_edit::Highlighter;
use tracing::info;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

const BACKGROUND: Color = rgb(0xff, 0xff, 0xff);
const FOREGROUND: Color = rgb(0x20, 0x20, 0x20);

/// Command line of `tiledit-render`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "tiledit-render",
    about = "Render a text file into a PNG with the built-in monospace face",
    version,
    after_help = ENV_HELP
)]
pub struct RenderArgs {
    /// Text file to render
    pub input: PathBuf,

    /// PNG file to write
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Image height in pixels
    #[arg(default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Draw long lines unwrapped, overriding TILEDIT_LINE_WRAP
    #[arg(long)]
    pub no_wrap: bool,

    /// Spaces per tab stop, overriding TILEDIT_TAB_WIDTH
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub tab_width: Option<u32>,
}

const ENV_HELP: &str = "Environment variables:
  TILEDIT_TAB_WIDTH           Spaces per tab stop (default: 8)
  TILEDIT_LINE_WRAP           Soft-wrap long lines (default: true)
  TILEDIT_WRAP_INDICATOR      Rune drawn on wrapped rows
  RUST_LOG                    Log filter (default: tiledit=info)";

impl RenderArgs {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if self.no_wrap {
            config.line_wrap = false;
        }
        if let Some(w) = self.tab_width {
            config.tab_width = w as usize;
        }
    }
}

/// Paint `text` into a `width` x `height` image. Returns the image and the
/// measured content size.
pub fn render_text(text: &str, width: u32, height: u32, config: &Config) -> Result<(RgbaImage, Point)> {
    let buf = RopeBuffer::new(text);
    let mut drawer = Drawer::with_config(SharedFaceCache::new(MonoFace::default()), config);
    let side = |n: u32| i32::try_from(n).context("image side too large");
    drawer.set_bounds(Rect::new(0, 0, side(width)?, side(height)?));
    let size = drawer.measure(&buf)?;

    let mut highlighter = Highlighter::new();
    highlighter.apply(&mut drawer, &buf, &CursorState::at(0), config)?;

    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);
    drawer.draw(&buf, &mut img, FOREGROUND)?;
    Ok((img, size))
}

/// Render a file into a PNG.
pub fn render_file(args: &RenderArgs, config: &Config) -> Result<Point> {
    let text = read_text(&args.input)?;
    let (img, size) = render_text(&text, args.width, args.height, config)?;
    img.save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        width = size.x,
        height = size.y,
        "rendered"
    );
    Ok(size)
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<RenderArgs, clap::Error> {
        RenderArgs::try_parse_from(std::iter::once("tiledit-render").chain(list.iter().copied()))
    }

    #[test]
    fn parse_applies_default_size() {
        let parsed = args(&["in.txt", "out.png"]).expect("args");
        assert_eq!(parsed.width, DEFAULT_WIDTH);
        assert_eq!(parsed.height, DEFAULT_HEIGHT);
        let parsed = args(&["in.txt", "out.png", "100", "50"]).expect("args");
        assert_eq!((parsed.width, parsed.height), (100, 50));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(args(&["in.txt"]).is_err());
        assert!(args(&["in.txt", "out.png", "0"]).is_err());
        assert!(args(&["in.txt", "out.png", "wide"]).is_err());
        assert!(args(&["in.txt", "out.png", "1", "1", "extra"]).is_err());
        assert!(args(&["in.txt", "out.png", "--tab-width", "0"]).is_err());
    }

    #[test]
    fn flags_override_config() {
        let parsed = args(&["in.txt", "out.png", "--no-wrap", "--tab-width", "4"]).expect("args");
        let mut config = Config::default();
        parsed.apply(&mut config);
        assert!(!config.line_wrap);
        assert_eq!(config.tab_width, 4);

        let mut config = Config::default();
        args(&["in.txt", "out.png"]).expect("args").apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn render_text_paints_glyphs() {
        let config = Config {
            line_wrap: false,
            ..Config::default()
        };
        let (img, size) = render_text("ab\ncd", 40, 30, &config).expect("render");
        // the newline adds half a cell after "ab"
        assert_eq!(size, Point::new(15, 20));
        assert_eq!(img.dimensions(), (40, 30));
        assert!(img.pixels().any(|px| *px == FOREGROUND));
        assert_eq!(*img.get_pixel(39, 29), BACKGROUND);
    }
}
