//! TEXEL: a texture browser with PS1-era degradation previews
//!
//! Indexes a directory tree of texture images and runs selections through a
//! retro-console degrade pipeline: downscale, 16/8/4-bit color reduction,
//! optional dithering. The interactive shell lives elsewhere; this binary is
//! the thin command-line boundary over the core:
//! - `tree`: scan and print the indexed texture tree
//! - `info`: metadata for one image (format, resolution, size)
//! - `degrade`: run the pipeline and write the re-encoded PNG
//! - `set-dir`: persist the default texture directory

mod config;
mod texture;
mod tree;

use std::path::PathBuf;
use std::process::ExitCode;

use config::Config;
use texture::{load_asset, process, ColorDepth, ProcessingRequest, ResampleMode};
use tree::{visible_subset, ExpansionState, Node, NodeKind};

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match args.first().map(String::as_str) {
        Some("tree") => cmd_tree(&args[1..]),
        Some("info") => cmd_info(&args[1..]),
        Some("degrade") => cmd_degrade(&args[1..]),
        Some("set-dir") => cmd_set_dir(&args[1..]),
        Some("-V") | Some("--version") => {
            println!("texel v{}", VERSION);
            Ok(())
        }
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!("texel v{} - texture browser with PS1-era degradation previews", VERSION);
    println!();
    println!("Usage:");
    println!("  texel tree [dir] [--expand <folder>]...");
    println!("      List the indexed texture tree. With --expand flags, only");
    println!("      nodes visible under that expansion state are shown.");
    println!("  texel info <image> [dir] [--data-uri]");
    println!("      Show image metadata (format, resolution, file size).");
    println!("  texel degrade <image> -o <out.png> [--size WxH] [--mode nearest|bilinear]");
    println!("                [--depth 16|8|4] [--dither] [--data-uri] [dir]");
    println!("      Run the degrade pipeline and write the preview PNG.");
    println!("  texel set-dir <dir>");
    println!("      Persist the default texture directory.");
}

/// List the tree, optionally filtered through an expansion state
fn cmd_tree(args: &[String]) -> Result<(), String> {
    let mut dir = None;
    let mut expansion: Option<ExpansionState> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--expand" => {
                let path = expect_value(args, &mut i, "--expand")?;
                let state = expansion.take().unwrap_or_else(ExpansionState::new);
                expansion = Some(state.toggle(&path));
            }
            arg if dir.is_none() => dir = Some(PathBuf::from(arg)),
            arg => return Err(format!("unexpected argument: {}", arg)),
        }
        i += 1;
    }

    let root = dir.unwrap_or_else(|| Config::load().texture_directory);

    // A missing root renders as an empty tree with a message, not a failure
    let nodes = match tree::scan(&root) {
        Ok(nodes) => nodes,
        Err(e) => {
            eprintln!("{}", e);
            Vec::new()
        }
    };

    match expansion {
        Some(state) => {
            for node in visible_subset(&nodes, &state) {
                print_node(node);
            }
        }
        None => {
            for node in &nodes {
                print_node(node);
            }
        }
    }
    Ok(())
}

fn print_node(node: &Node) {
    let indent = "  ".repeat(node.depth);
    match node.kind {
        NodeKind::Folder => println!("{}{}/", indent, node.name),
        NodeKind::File => println!("{}{}", indent, node.name),
    }
}

/// Show metadata for one image
fn cmd_info(args: &[String]) -> Result<(), String> {
    let mut relative = None;
    let mut dir = None;
    let mut data_uri = false;

    for arg in args {
        match arg.as_str() {
            "--data-uri" => data_uri = true,
            other if relative.is_none() => relative = Some(other.to_string()),
            other if dir.is_none() => dir = Some(PathBuf::from(other)),
            other => return Err(format!("unexpected argument: {}", other)),
        }
    }

    let relative = relative.ok_or_else(|| "usage: texel info <image> [dir]".to_string())?;
    let root = dir.unwrap_or_else(|| Config::load().texture_directory);

    let asset = load_asset(&root, &relative).map_err(|e| format!("{}: {}", relative, e))?;

    println!("{}", relative);
    println!("  format:     {}", asset.format);
    println!("  resolution: {}", asset.resolution);
    println!("  size:       {}", asset.file_size_display);
    if data_uri {
        println!("{}", asset.display_data_uri());
    }
    Ok(())
}

/// Run the degrade pipeline and write the preview PNG
fn cmd_degrade(args: &[String]) -> Result<(), String> {
    let mut relative = None;
    let mut out = None;
    let mut dir = None;
    let mut size = (64u32, 64u32);
    let mut mode = ResampleMode::NearestNeighbor;
    let mut depth = ColorDepth::Bits16;
    let mut dither = false;
    let mut data_uri = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--out" => out = Some(PathBuf::from(expect_value(args, &mut i, "--out")?)),
            "--size" => size = parse_size(&expect_value(args, &mut i, "--size")?)?,
            "--mode" => mode = parse_mode(&expect_value(args, &mut i, "--mode")?)?,
            "--depth" => depth = parse_depth(&expect_value(args, &mut i, "--depth")?)?,
            "--dither" => dither = true,
            "--data-uri" => data_uri = true,
            arg if relative.is_none() => relative = Some(arg.to_string()),
            arg if dir.is_none() => dir = Some(PathBuf::from(arg)),
            arg => return Err(format!("unexpected argument: {}", arg)),
        }
        i += 1;
    }

    let relative = relative
        .ok_or_else(|| "usage: texel degrade <image> -o <out.png> [options] [dir]".to_string())?;
    if out.is_none() && !data_uri {
        return Err("missing output path (-o <out.png>) or --data-uri".to_string());
    }
    let root = dir.unwrap_or_else(|| Config::load().texture_directory);

    let asset = load_asset(&root, &relative).map_err(|e| format!("{}: {}", relative, e))?;
    let request = ProcessingRequest {
        target_width: size.0,
        target_height: size.1,
        mode,
        depth,
        dither,
    };
    let processed = process(&asset.pixels, &request).map_err(|e| e.to_string())?;

    if data_uri {
        println!("{}", processed.display_data_uri());
    }
    if let Some(out) = out {
        std::fs::write(&out, &processed.png_bytes)
            .map_err(|e| format!("write {}: {}", out.display(), e))?;
        println!(
            "{} -> {} ({}x{}, {}, {}{})",
            relative,
            out.display(),
            size.0,
            size.1,
            mode.label(),
            depth.label(),
            if dither { ", dithered" } else { "" }
        );
    }
    Ok(())
}

/// Persist the default texture directory
fn cmd_set_dir(args: &[String]) -> Result<(), String> {
    let dir = args
        .first()
        .ok_or_else(|| "usage: texel set-dir <dir>".to_string())?;

    let mut config = Config::load();
    config.texture_directory = PathBuf::from(dir);
    config
        .save()
        .map_err(|e| format!("failed to save config: {}", e))?;

    println!("texture directory set to {}", dir);
    Ok(())
}

fn expect_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once('x')
        .ok_or_else(|| format!("invalid size: {} (expected WxH)", value))?;
    let w = w.parse().map_err(|_| format!("invalid width: {}", w))?;
    let h = h.parse().map_err(|_| format!("invalid height: {}", h))?;
    Ok((w, h))
}

fn parse_mode(value: &str) -> Result<ResampleMode, String> {
    match value {
        // "point" is the same sampling as nearest-neighbor
        "nearest" | "point" => Ok(ResampleMode::NearestNeighbor),
        "bilinear" => Ok(ResampleMode::Bilinear),
        other => Err(format!("unknown resample mode: {}", other)),
    }
}

fn parse_depth(value: &str) -> Result<ColorDepth, String> {
    match value {
        "16" => Ok(ColorDepth::Bits16),
        "8" => Ok(ColorDepth::Bits8),
        "4" => Ok(ColorDepth::Bits4),
        other => Err(format!("unknown color depth: {} (expected 16, 8, or 4)", other)),
    }
}
