//! This binary crate provides a CLI utility for batch converting a directory of raw coverage
//! bitmaps into signed distance fields. It's just a frontend to
//! [coverage_sdf](../coverage_sdf/index.html); check that out for the technical details of
//! how the fields are generated.
//!
//! ## Usage
//!
//! Bitmaps are read as headerless `.raw` files of interleaved 8-bit samples, so their layout
//! has to be described in a JSON manifest keyed by file name:
//!
//! ```json
//! {"glyph_a.raw": {"width": 64, "height": 64, "components": 4}}
//! ```
//!
//! `components` defaults to 1 (a single coverage channel). Each selected channel is replaced
//! with its distance field and the result is written to `out_dir` under the same file name.
//! By default only the last channel (alpha, for RGBA data) is converted. Existing outputs are
//! skipped unless `--overwrite` is given.
//!
//! ```
//! $ build_coverage_sdf /path/to/in_dir /path/to/out_dir --manifest manifest.json --radius 16
//! ```

use std::collections::HashMap;
use std::error::Error;
use std::{
    fs::{self, create_dir_all, read_dir},
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Instant,
};

use clap::{command, crate_description, crate_version, value_parser, Arg, Command};
use coverage_sdf::{bake_channels, check_interleaved, CoverageImage, FieldEncoding, NarrowBand, SdfError};
use serde::Deserialize;
use spmc::{channel, Receiver};

static TOTAL_FIELDS_RENDERED: AtomicUsize = AtomicUsize::new(0);

/// Layout of one headerless bitmap, as listed in the manifest.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
struct RawLayout {
    width: usize,
    height: usize,
    #[serde(default = "default_components")]
    components: usize,
}

fn default_components() -> usize {
    1
}

#[derive(Clone, Copy, Debug)]
enum Generator {
    /// The full distance transform, recording distances out to the band radii.
    Transform(NarrowBand),
    /// The single pass, √2 pixel band estimate.
    SinglePass,
}

#[derive(Clone, Debug)]
struct Settings {
    generator: Generator,
    /// Channel indices to convert; the last channel of each bitmap when unset.
    channels: Option<Vec<usize>>,
}

struct Job {
    path: PathBuf,
    file_name: String,
    layout: RawLayout,
}

/// Parses a comma separated list of channel names (`r`, `g`, `b`, `a`) into indices.
fn parse_channels(list: &str) -> Result<Vec<usize>, String> {
    list.split(',')
        .map(|name| match name.trim() {
            "r" => Ok(0),
            "g" => Ok(1),
            "b" => Ok(2),
            "a" => Ok(3),
            other => Err(format!("Unknown channel '{other}'; expected r, g, b or a.")),
        })
        .collect()
}

/// Converts the selected channels of a single bitmap.
fn render_field(
    mut pixels: Vec<u8>,
    layout: RawLayout,
    settings: &Settings,
) -> Result<Vec<u8>, SdfError> {
    let RawLayout {
        width,
        height,
        components,
    } = layout;
    let channels = settings
        .channels
        .clone()
        .unwrap_or_else(|| vec![components.saturating_sub(1)]);

    match settings.generator {
        Generator::Transform(band) => {
            bake_channels(&mut pixels, width, height, components, &channels, &band)?;
        }
        Generator::SinglePass => {
            check_interleaved(pixels.len(), width, height, components, &channels)?;

            // The single pass generator can't work in place, so each channel is copied out.
            for &channel in &channels {
                let plane: Vec<u8> = pixels
                    .iter()
                    .skip(channel)
                    .step_by(components)
                    .copied()
                    .collect();
                let field = CoverageImage::packed(&plane, width, height)?.render_coverage_field()?;

                for (dst, src) in pixels.iter_mut().skip(channel).step_by(components).zip(field) {
                    *dst = src;
                }
            }
        }
    }

    Ok(pixels)
}

/// A worker function that converts raw bitmaps to distance fields.
///
/// Each field is written to `<base_out_dir>/<file name>`, keeping the layout of its input.
fn render_worker(
    base_out_dir: PathBuf,
    overwrite: bool,
    settings: Settings,
    rx: Receiver<Option<Job>>,
) {
    while let Ok(Some(job)) = rx.recv() {
        let out_path = base_out_dir.join(&job.file_name);
        if !overwrite && Path::exists(&out_path) {
            println!("Skipped {}", job.path.display());
            continue;
        }

        println!("Processing {}", job.path.display());

        let result = fs::read(&job.path)
            .map_err(Box::<dyn Error>::from)
            .and_then(|pixels| render_field(pixels, job.layout, &settings).map_err(Box::from));

        match result {
            Ok(field) => {
                fs::write(&out_path, field).expect("Unable to write distance field");
                TOTAL_FIELDS_RENDERED.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                println!("ERROR: Failed to render {}: {}", job.path.display(), e)
            }
        }
    }
}

fn cli() -> Command<'static> {
    command!()
        .version(crate_version!())
        .before_help(crate_description!())
        .arg(Arg::new("IN_DIR")
            .help("Sets the source directory to be scanned for raw coverage bitmaps (*.raw)")
            .required(true)
            .index(1))
        .arg(Arg::new("OUT_DIR")
            .help("Sets the output directory in which the distance fields will be placed (using the same file names as the inputs)")
            .required(true)
            .index(2))
        .arg(Arg::new("MANIFEST")
            .help("Path to a JSON file describing the layout of each bitmap, like so: {\"glyph.raw\": {\"width\": 64, \"height\": 64, \"components\": 4}}")
            .required(true)
            .short('m')
            .long("manifest")
            .takes_value(true))
        .arg(Arg::new("RADIUS")
            .help("Radius of the narrow band in pixels; distances further from the outline are clamped")
            .short('r')
            .long("radius")
            .takes_value(true)
            .value_parser(value_parser!(u16).range(1..=256))
            .default_value("64"))
        .arg(Arg::new("INSIDE_RADIUS")
            .help("Radius of the narrow band inside the shape, if it should differ from the outside radius (only used by --signed)")
            .long("inside-radius")
            .takes_value(true)
            .value_parser(value_parser!(u16).range(1..=256)))
        .arg(Arg::new("CHANNELS")
            .help("Comma separated list of channels to convert (r, g, b, a); defaults to the last channel of each bitmap")
            .short('c')
            .long("channels")
            .takes_value(true)
            .value_parser(parse_channels))
        .arg(Arg::new("SIGNED")
            .help("Encode distances inside the shape above 128 and distances outside below it, instead of the classic encoding where both sides fall off to 0")
            .long("signed")
            .takes_value(false))
        .arg(Arg::new("FAST")
            .help("Use the single pass generator, which only records distances within about 1.4 pixels of the outline")
            .long("fast")
            .takes_value(false)
            .conflicts_with_all(&["SIGNED", "RADIUS", "INSIDE_RADIUS"]))
        .arg(Arg::new("OVERWRITE")
            .help("Overwrite existing distance fields; by default, any bitmap with a matching file in the output directory is skipped. Note that the contents of the file are not inspected; only the name.")
            .long("overwrite")
            .takes_value(false))
}

fn main() {
    let matches = cli().get_matches();

    let in_dir = Path::new(matches.get_one::<String>("IN_DIR").unwrap());
    let out_dir = PathBuf::from(matches.get_one::<String>("OUT_DIR").unwrap());
    let overwrite = matches.is_present("OVERWRITE");

    let manifest_path = matches.get_one::<String>("MANIFEST").unwrap();
    let manifest: HashMap<String, RawLayout> =
        serde_json::from_slice(&fs::read(manifest_path).expect("Unable to read manifest."))
            .expect("Unable to parse manifest.");

    let generator = if matches.is_present("FAST") {
        Generator::SinglePass
    } else {
        let radius = f32::from(*matches.get_one::<u16>("RADIUS").unwrap());
        let inside_radius = matches
            .get_one::<u16>("INSIDE_RADIUS")
            .map_or(radius, |r| f32::from(*r));
        let encoding = if matches.is_present("SIGNED") {
            FieldEncoding::Signed
        } else {
            FieldEncoding::Unsigned
        };
        Generator::Transform(
            NarrowBand::new(radius, inside_radius)
                .expect("Invalid radius")
                .with_encoding(encoding),
        )
    };
    let settings = Settings {
        generator,
        channels: matches.get_one::<Vec<usize>>("CHANNELS").cloned(),
    };

    create_dir_all(&out_dir).expect("Unable to create output directory");

    let (mut tx, rx) = channel();
    let num_threads = num_cpus::get();
    println!("Starting {} worker threads...", num_threads);

    let join_handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let out_dir = out_dir.clone();
            let settings = settings.clone();
            let rx = rx.clone();
            thread::spawn(move || render_worker(out_dir, overwrite, settings, rx))
        })
        .collect();

    let render_start = Instant::now();

    for dir_entry in read_dir(in_dir)
        .expect("Unable to open input directory")
        .flatten()
    {
        let path = dir_entry.path();
        if !path.is_file() || path.extension().map_or(true, |extension| extension != "raw") {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            println!("ERROR: Skipping non UTF-8 file name {}", path.display());
            continue;
        };

        match manifest.get(file_name) {
            Some(layout) => {
                let job = Job {
                    file_name: file_name.to_string(),
                    layout: *layout,
                    path: path.clone(),
                };
                tx.send(Some(job))
                    .expect("Unable to push job to thread worker");
            }
            None => println!("ERROR: No manifest entry for {}", path.display()),
        }
    }

    for _ in 0..num_threads {
        // Sentinel value to signal the end of the work pool for each thread
        tx.send(None)
            .expect("Unable to push completion job to thread worker");
    }

    for handle in join_handles {
        handle.join().unwrap();
    }

    let total_fields_rendered = TOTAL_FIELDS_RENDERED.load(Ordering::Relaxed);
    let render_duration = render_start.elapsed();

    if total_fields_rendered > 0 {
        let duration_per_field = render_duration / total_fields_rendered as u32;

        println!(
            "Rendered {} distance field(s) in {:?} ({:?}/field)",
            total_fields_rendered, render_duration, duration_per_field
        );
    }
}
