//! TiffWang CLI - TIFF annotation inspector
//!
//! A command-line tool that walks a TIFF file and prints the eiStream/Wang
//! annotation marks found on its pages.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tiffwang::{
    Color, FontInfo, MarkCallback, Point, Rect, RotationInfo, TextInfo, TiffReader, WangDecoder,
};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Verbosity {
    /// Only log success or failure messages.
    #[default]
    Quiet,
    /// Log directory information and basic progress.
    Normal,
    /// Log all parsing details including tag and block data.
    Verbose,
}

impl Verbosity {
    /// Returns the tracing filter string for this verbosity level.
    fn as_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "tiffwang=warn",
            Verbosity::Normal => "tiffwang=info",
            Verbosity::Verbose => "tiffwang=trace",
        }
    }
}

/// TIFF annotation inspector
#[derive(Parser, Debug)]
#[command(name = "tiffwang")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input TIFF file path
    #[arg(short, long)]
    input: PathBuf,

    /// Inspect a single page instead of all pages
    #[arg(short, long)]
    page: Option<usize>,

    /// List every tag of each inspected page
    #[arg(short, long)]
    tags: bool,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value_t = Verbosity::default())]
    verbosity: Verbosity,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing with the appropriate filter level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.verbosity.as_filter())),
        )
        .with_target(false)
        .with_level(true)
        .init();

    if let Err(e) = run(&args) {
        error!("Inspection failed: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Main inspection logic.
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    info!("Reading input file: {}", args.input.display());
    let mut reader = TiffReader::open(&args.input)?;
    reader.read_directories()?;
    info!("Read {} pages", reader.page_count());

    let pages: Vec<usize> = match args.page {
        Some(page) => vec![page],
        None => (0..reader.page_count()).collect(),
    };

    for page in pages {
        print_page_info(&reader, page)?;

        if args.tags {
            print_page_tags(&reader, page)?;
        }

        let Some(entry) = reader.annotation(page)? else {
            println!("  no annotation data");
            continue;
        };

        let mut printer = PrintingCallback::default();
        let mut decoder = WangDecoder::new(&mut reader, entry)?;
        decoder.set_callback(&mut printer);
        decoder.run();

        if printer.marks == 0 {
            println!("  no visible marks");
        }
    }

    Ok(())
}

fn print_page_info<R: std::io::Read + std::io::Seek>(
    reader: &TiffReader<R>,
    page: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let dims = reader.dimensions(page)?;
    println!("PAGE {}", page);
    println!("  size       : {}x{} px", dims.width, dims.height);
    println!(
        "  resolution : {}x{} ({:?})",
        dims.resolution_x, dims.resolution_y, dims.resolution_unit
    );

    for (label, value) in [
        ("software", reader.software(page)?),
        ("date-time", reader.date_time(page)?),
        ("artist", reader.artist(page)?),
    ] {
        if !value.is_empty() {
            println!("  {:<10} : {}", label, value);
        }
    }

    Ok(())
}

fn print_page_tags<R: std::io::Read + std::io::Seek>(
    reader: &TiffReader<R>,
    page: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    for index in 0..reader.entry_count(page)? {
        let entry = reader.entry(page, index)?;
        println!(
            "  tag {:#06x} {:?}, count {}, value/offset {:#x}",
            entry.tag_id, entry.tag_type, entry.value_count, entry.value_or_offset
        );
    }
    Ok(())
}

/// Prints one section per emitted mark.
#[derive(Default)]
struct PrintingCallback {
    marks: usize,
}

impl PrintingCallback {
    fn section(&mut self, name: &str) {
        self.marks += 1;
        println!("  == {} ==", name);
    }
}

fn bounds_string(bounds: Rect) -> String {
    format!(
        "({}, {}) - ({}, {})",
        bounds.left, bounds.top, bounds.right, bounds.bottom
    )
}

fn color_string(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

fn flag_string(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl MarkCallback for PrintingCallback {
    fn line(
        &mut self,
        bounds: Rect,
        points: &[Point],
        color: Color,
        line_size: u32,
        highlight: bool,
        transparent: bool,
    ) {
        self.section("LINE");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    THICKNESS : {} px", line_size);
        println!("    COLOR     : {}", color_string(color));
        println!("    HILITE    : {}", flag_string(highlight));
        println!("    TRANSP    : {}", flag_string(transparent));
        let points: Vec<String> = points.iter().map(|p| format!("({}, {})", p.x, p.y)).collect();
        println!("    POINTS    : {}", points.join(" "));
    }

    fn filled_rect(&mut self, bounds: Rect, color: Color, highlight: bool, transparent: bool) {
        self.section("RECT");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    COLOR     : {}", color_string(color));
        println!("    HILITE    : {}", flag_string(highlight));
        println!("    TRANSP    : {}", flag_string(transparent));
    }

    fn bordered_rect(
        &mut self,
        bounds: Rect,
        fill: Color,
        border: Color,
        line_size: u32,
        highlight: bool,
        transparent: bool,
    ) {
        self.section("BORDERED RECT");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    THICKNESS : {} px", line_size);
        println!("    COLOR     : {}", color_string(fill));
        println!("    BORDER    : {}", color_string(border));
        println!("    HILITE    : {}", flag_string(highlight));
        println!("    TRANSP    : {}", flag_string(transparent));
    }

    fn outlined_rect(
        &mut self,
        bounds: Rect,
        color: Color,
        line_size: u32,
        highlight: bool,
        transparent: bool,
    ) {
        self.section("BORDERED RECT");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    THICKNESS : {} px", line_size);
        println!("    BORDER    : {}", color_string(color));
        println!("    HILITE    : {}", flag_string(highlight));
        println!("    TRANSP    : {}", flag_string(transparent));
    }

    fn text(&mut self, text: &str, bounds: Rect, font: &FontInfo, info: &TextInfo, color: Color) {
        self.section("ANSI TEXT");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    COLOR     : {}", color_string(color));
        println!("    FONT      : {}", font.face_name);
        println!("    POINTS    : {} pt", font.height);
        println!("    SCALE     : {}", info.creation_scale);
        println!("    ORIENT    : {}", info.orientation);
        println!("    LENGTH    : {} characters", info.text_length);
        println!("    TEXT      : {}", text);
    }

    fn wide_text(
        &mut self,
        text: &[u16],
        bounds: Rect,
        font: &FontInfo,
        info: &TextInfo,
        color: Color,
    ) {
        self.section("UNICODE TEXT");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    COLOR     : {}", color_string(color));
        println!("    FONT      : {}", font.face_name);
        println!("    POINTS    : {} pt", font.height);
        println!("    SCALE     : {}", info.creation_scale);
        println!("    ORIENT    : {}", info.orientation);
        println!("    LENGTH    : {} characters", info.text_length);
        println!("    TEXT      : {}", String::from_utf16_lossy(text));
    }

    fn mask(&mut self, filename: &str, bounds: Rect, _rotation: Option<&RotationInfo>) {
        self.section("MASK");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    FILENAME  : {}", filename);
    }

    fn image_reference(
        &mut self,
        filename: &str,
        bounds: Rect,
        _rotation: Option<&RotationInfo>,
        highlight: bool,
        transparent: bool,
    ) {
        self.section("IMAGE FILE");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    HILITE    : {}", flag_string(highlight));
        println!("    TRANSP    : {}", flag_string(transparent));
        println!("    FILENAME  : {}", filename);
    }

    fn image(
        &mut self,
        filename: &str,
        bounds: Rect,
        _rotation: Option<&RotationInfo>,
        data: &[u8],
        highlight: bool,
        transparent: bool,
    ) {
        self.section("IMAGE DATA");
        println!("    BOUNDS    : {}", bounds_string(bounds));
        println!("    SIZE      : {} bytes", data.len());
        println!("    HILITE    : {}", flag_string(highlight));
        println!("    TRANSP    : {}", flag_string(transparent));
        println!("    FILENAME  : {}", filename);
    }
}
