mod cli;

use clap::Parser;
use log::{error, info};
use logger_call::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cli::Args;

enum Failure {
    Io(PathBuf, io::Error),
    Transform(TransformError),
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Io(path, e) => write!(f, "{}: {e}", path.display()),
            Failure::Transform(e) => write!(f, "{e}"),
        }
    }
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn process(
    transform: &LoggerCallTransform,
    resolver: &FsResolver,
    file: &Path,
    out_dir: Option<&Path>,
) -> Result<bool, Failure> {
    let path = absolute(file).map_err(|e| Failure::Io(file.to_path_buf(), e))?;
    let id = path.to_string_lossy().into_owned();
    let code = fs::read_to_string(&path).map_err(|e| Failure::Io(path.clone(), e))?;
    let output = transform
        .transform(&code, &id, resolver)
        .map_err(Failure::Transform)?;

    let Some(out_dir) = out_dir else {
        print!("{}", output.code);
        return Ok(output.is_changed());
    };
    let name = path.file_name().map(PathBuf::from).unwrap_or_default();
    let target = out_dir.join(&name);
    fs::write(&target, &output.code).map_err(|e| Failure::Io(target.clone(), e))?;
    if let Some(map) = &output.map {
        let mut map_name = name.into_os_string();
        map_name.push(".map");
        let map_path = out_dir.join(map_name);
        fs::write(&map_path, map.to_string()).map_err(|e| Failure::Io(map_path.clone(), e))?;
    }
    Ok(output.is_changed())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let root = absolute(args.root()).unwrap_or_else(|e| {
        eprintln!("Failed to resolve project root: {e}");
        std::process::exit(1);
    });
    if let Some(out_dir) = args.out_dir() {
        if let Err(e) = fs::create_dir_all(out_dir) {
            eprintln!("Failed to create {}: {e}", out_dir.display());
            std::process::exit(1);
        }
    }

    let mut transform = LoggerCallTransform::new(args.config.clone());
    transform.config_resolved(root.to_string_lossy());
    transform.build_start();
    let resolver = FsResolver::new(&root);

    if args.verbose {
        info!("Project root: {}", root.display());
        info!("Logger module: {}", args.config.logger_path());
    }

    let mut failed = false;
    for file in &args.files {
        match process(&transform, &resolver, file, args.out_dir()) {
            Ok(changed) => {
                if args.verbose {
                    info!("{}: {}", file.display(), if changed { "rewritten" } else { "unchanged" });
                }
            }
            Err(e) => {
                error!("{e}");
                eprintln!("{e}");
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_writes_code_and_map() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let root = dir.path();
        let out = root.join("out");
        assert!(fs::create_dir_all(root.join("src")).is_ok());
        assert!(fs::create_dir_all(&out).is_ok());
        assert!(fs::write(root.join("src/logger.ts"), "").is_ok());
        let file = root.join("src/app.js");
        assert!(fs::write(&file, "import { logger } from './logger';\nlogger.log(1);\n").is_ok());

        let mut transform = LoggerCallTransform::new(TransformConfig::default());
        transform.config_resolved(root.to_string_lossy());
        let resolver = FsResolver::new(root);

        let changed = process(&transform, &resolver, &file, Some(&out));
        assert!(matches!(changed, Ok(true)));
        assert_eq!(
            fs::read_to_string(out.join("app.js")).ok().as_deref(),
            Some("import { logger } from './logger';\nlogger.log(1)();\n")
        );
        let map = fs::read_to_string(out.join("app.js.map")).unwrap_or_default();
        assert!(SourceMap::from_json(&map).is_ok());
    }

    #[test]
    fn test_process_reports_missing_file() {
        let transform = LoggerCallTransform::new(TransformConfig::default());
        let resolver = FsResolver::new("/");
        let result = process(&transform, &resolver, Path::new("/no/such/file.js"), None);
        assert!(matches!(result, Err(Failure::Io(_, _))));
    }
}
