// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::process;

use pico_args::Arguments;

const HELP: &str = "\
svgom loads an SVG document and prints its object model.

USAGE:
  svgom [OPTIONS] <in-svg>

OPTIONS:
  -h, --help                Prints help information
  -V, --version             Prints version information

  --width LENGTH            Sets the window width in pixels
                            [default: 100]
  --height LENGTH           Sets the window height in pixels
                            [default: 100]
  --dpi DPI                 Sets the resolution
                            [default: 96] [possible values: 10..4000 (inclusive)]
  --font-size SIZE          Sets the default font size that will be
                            used when no 'font-size' is present
                            [default: 16] [possible values: 1..192 (inclusive)]
  --id ID                   Prints transforms of a single element and,
                            for a 'use' element, its instance tree
  --dump                    Prints the document as SVG instead
  --quiet                   Disables warnings

ARGS:
  <in-svg>                  Input file
";

#[derive(Debug)]
struct Args {
    width: u32,
    height: u32,
    dpi: u32,
    font_size: u32,
    id: Option<String>,
    dump: bool,
    quiet: bool,
    input: PathBuf,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    Ok(Args {
        width: input.opt_value_from_fn("--width", parse_length)?.unwrap_or(100),
        height: input.opt_value_from_fn("--height", parse_length)?.unwrap_or(100),
        dpi: input.opt_value_from_fn("--dpi", parse_dpi)?.unwrap_or(96),
        font_size: input.opt_value_from_fn("--font-size", parse_font_size)?.unwrap_or(16),
        id: input.opt_value_from_str("--id")?,
        dump: input.contains("--dump"),
        quiet: input.contains("--quiet"),
        input: input.free_from_str()?,
    })
}

fn parse_dpi(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if (10..=4000).contains(&n) {
        Ok(n)
    } else {
        Err("DPI out of bounds".to_string())
    }
}

fn parse_font_size(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if n > 0 && n <= 192 {
        Ok(n)
    } else {
        Err("font size out of bounds".to_string())
    }
}

fn parse_length(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid length")?;

    if n > 0 {
        Ok(n)
    } else {
        Err("LENGTH cannot be zero".to_string())
    }
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

fn process(args: Args) -> Result<(), String> {
    let opt = svgom::Options {
        dpi: args.dpi as f64,
        font_size: args.font_size as f64,
        ..svgom::Options::default()
    };

    let window = svgom::Window::new(args.width, args.height);
    let doc = svgom::Document::load_file(&args.input, window, opt)
        .map_err(|e| e.to_string())?;

    if args.dump {
        print!("{}", doc.to_string(svgom::XmlOptions::default()));
        return Ok(());
    }

    match args.id {
        Some(ref id) => {
            let element = doc.get_element_by_id(id)
                .ok_or_else(|| format!("'{}' not found", id))?;
            print_element_info(&element)
        }
        None => {
            if let Some(svg) = doc.document_element() {
                print_tree(&svg, 0);
            }

            Ok(())
        }
    }
}

fn print_tree(element: &svgom::Element, depth: usize) {
    let indent = "    ".repeat(depth);
    let mut line = format!("{}{}", indent, element.tag_name());

    let id = element.id();
    if !id.is_empty() {
        line.push_str(&format!(" #{}", id));
    }

    line.push_str(&format!(" {:?}", element.rendering_hint()));

    if let Some(ts) = element_ctm(element) {
        if !ts.is_default() {
            line.push_str(&format!(" {}", ts));
        }
    }

    println!("{}", line);

    for child in element.children() {
        print_tree(&child, depth + 1);
    }
}

fn element_ctm(element: &svgom::Element) -> Option<svgom::Transform> {
    if let Some(vp) = element.as_viewport() {
        return vp.ctm().ok();
    }

    element.as_transformable()?.ctm().ok()
}

fn print_element_info(element: &svgom::Element) -> Result<(), String> {
    println!("{:?}", element);

    let (ctm, screen_ctm) = if let Some(vp) = element.as_viewport() {
        (vp.ctm(), vp.screen_ctm())
    } else if let Some(ts) = element.as_transformable() {
        (ts.ctm(), ts.screen_ctm())
    } else {
        return Ok(());
    };

    println!("CTM: {}", ctm.map_err(|e| e.to_string())?);
    println!("Screen CTM: {}", screen_ctm.map_err(|e| e.to_string())?);

    if let Some(use_node) = element.as_use() {
        match use_node.instance_root() {
            Some(root) => {
                println!("Instances:");
                print_instance(&root, 1);
            }
            None => println!("Instances: none"),
        }
    }

    Ok(())
}

fn print_instance(instance: &svgom::Instance, depth: usize) {
    if let Some(e) = instance.corresponding_element() {
        println!("{}{:?}", "    ".repeat(depth), e);
    }

    for child in instance.child_nodes().iter() {
        print_instance(child, depth + 1);
    }
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
