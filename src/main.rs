use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;

use build_reconstructor::config;
use build_reconstructor::fetch;
use build_reconstructor::git_ops::GitRepo;
use build_reconstructor::offset;
use build_reconstructor::package::{Package, SourceType};
use build_reconstructor::resolver;
use build_reconstructor::sloc;
use build_reconstructor::specfile::SpecFile;
use build_reconstructor::ui;
use build_reconstructor::ReconstructError;

#[derive(clap::Parser)]
#[command(
    name = "build-reconstructor",
    about = "Reconstruct the exact source trees binary package artifacts were built from"
)]
struct Args {
    #[arg(help = "EXPLICIT environment dump file")]
    specfile: String,

    #[arg(short = 'p', long = "include-pkgs", help = "Filter parsed packages by name")]
    include_pkgs: Vec<String>,

    #[arg(short = 'u', long = "include-urls", help = "Filter parsed URLs by name")]
    include_urls: Vec<String>,

    #[arg(short, long, help = "Retain a copy of the work directory")]
    keep_files: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let spec = match SpecFile::load(
        Path::new(&args.specfile),
        &args.include_pkgs,
        &args.include_urls,
    ) {
        Ok(spec) => spec,
        Err(e) => {
            ui::display_error(&format!("{}", e));
            std::process::exit(1);
        }
    };

    if spec.urls.is_empty() {
        println!("Nothing to do.");
        std::process::exit(1);
    }

    let workdir = tempfile::tempdir()?;
    let mut processed = 0usize;
    let mut skipped = 0usize;

    // Per-package isolation: one failing package never aborts the rest.
    for url in spec.iter() {
        match process_package(url, workdir.path(), &config) {
            Ok(()) => processed += 1,
            Err(e) => {
                ui::display_error(&format!("Skipping {}: {}", url, e));
                skipped += 1;
            }
        }
    }

    ui::display_summary(processed, skipped);

    if processed == 0 {
        ui::display_error("sloccount report not generated");
        std::process::exit(1);
    }

    let report = sloc::report(&config.tools.sloccount_command()?, workdir.path())?;
    println!("{}", report);

    if args.keep_files || config.behavior.keep_files {
        let dest = keep_dir_name(&args.specfile);
        copy_tree(workdir.path(), Path::new(&dest))?;
        ui::display_success(&format!("Work directory retained at {}", dest));
    }

    Ok(())
}

/// Reconstructs one package into the work directory: read metadata, then
/// either clone + resolve + checkout (git sources) or download + unpack
/// (archive sources).
fn process_package(
    url: &str,
    workdir: &Path,
    config: &config::Config,
) -> build_reconstructor::Result<()> {
    ui::display_status(&format!("Processing {}", url));
    let tar_cmd = config.tools.tar_command()?;
    let pkg = Package::open(url, &tar_cmd)?;

    let (source_type, source_url) = pkg.source().ok_or_else(|| {
        ReconstructError::metadata(format!("{}: unknown source URL type", pkg.name))
    })?;

    match source_type {
        SourceType::Git => {
            let pv = pkg.version()?;
            let decoded = offset::decode(pv.encoded_offset);
            let dest = workdir.join(format!("{}-{}-{}", pkg.name, pv.base_tag, decoded.offset));

            ui::display_status(&format!("Cloning {}", source_url));
            let repo = GitRepo::clone(source_url, &dest)?;

            let commit = resolver::resolve(&dest, &pv.base_tag, pv.encoded_offset, &pkg.name)?;
            repo.checkout(&commit.hash)?;

            let head = repo.head_hash()?;
            let short = &head[..head.len().min(7)];
            ui::display_success(&format!("{} at {} ({})", pkg.name, short, commit.subject));
        }
        SourceType::Archive => {
            let scratch = tempfile::tempdir()?;
            let tarball_name = source_url.rsplit('/').next().unwrap_or("source.tar.gz");
            let tarball = scratch.path().join(tarball_name);

            ui::display_status(&format!("Downloading {}", source_url));
            fetch::download(source_url, &tarball)?;
            fetch::untar(&tar_cmd, &tarball, workdir)?;
            ui::display_success(&format!("{} unpacked from archive", pkg.name));
        }
    }
    Ok(())
}

fn keep_dir_name(specfile: &str) -> String {
    let stem = Path::new(specfile)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spec");
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}-BR-{}", stem, now)
}

fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dst.join(entry.file_name());
        if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else if file_type.is_symlink() {
            #[cfg(unix)]
            {
                let link = fs::read_link(entry.path())?;
                std::os::unix::fs::symlink(link, &target)?;
            }
            #[cfg(not(unix))]
            {
                fs::copy(entry.path(), &target)?;
            }
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
