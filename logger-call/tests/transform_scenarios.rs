use std::error::Error;
use std::fs;

use logger_call::prelude::*;
use logger_call::transform::LineIndex;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

struct Project {
    dir: TempDir,
    transform: LoggerCallTransform,
    resolver: FsResolver,
}

impl Project {
    fn new() -> Result<Project, Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("src/nested"))?;
        fs::write(dir.path().join("src/logger.ts"), "export const logger = {};")?;
        let mut transform = LoggerCallTransform::new(TransformConfig::default());
        transform.config_resolved(dir.path().to_string_lossy());
        transform.build_start();
        let resolver = FsResolver::new(dir.path());
        Ok(Project {
            dir,
            transform,
            resolver,
        })
    }

    fn id(&self, file: &str) -> String {
        self.dir.path().join(file).to_string_lossy().into_owned()
    }

    fn run(&self, file: &str, code: &str) -> Result<TransformOutput, TransformError> {
        self.transform.transform(code, &self.id(file), &self.resolver)
    }
}

#[test]
fn test_level_call_is_invoked() -> TestResult {
    let project = Project::new()?;
    let code = r#"import { logger } from "/src/logger"; logger.log("hi");"#;
    let output = project.run("src/app.js", code)?;
    assert_eq!(
        output.code,
        r#"import { logger } from "/src/logger"; logger.log("hi")();"#
    );
    Ok(())
}

#[test]
fn test_string_literal_is_left_alone() -> TestResult {
    let project = Project::new()?;
    let code = "import { logger } from \"/src/logger\";\nconst s = \"logger.log(1)\";\n";
    let output = project.run("src/app.js", code)?;
    assert_eq!(output.code, code);
    assert!(!output.is_changed());
    Ok(())
}

#[test]
fn test_modifier_call_and_source_map() -> TestResult {
    let project = Project::new()?;
    let code = "import { logger } from '../logger';\n\nlogger.debug.red(\"x\");\n";
    let output = project.run("src/nested/view.js", code)?;
    assert_eq!(
        output.code,
        "import { logger } from '../logger';\n\nlogger.debug.red(\"x\")();\n"
    );

    // Serialise and parse again, as a consumer of the `.map` file would.
    let map = output.map.map(|m| m.to_string()).ok_or("no source map")?;
    let map = SourceMap::from_json(&map)?;
    let generated_at = output.code.find("\"x\"").ok_or("literal missing")?;
    let (line, column) = LineIndex::new(&output.code).line_col(generated_at);
    let original = map
        .original_position_for(line as u32, column as u32)
        .ok_or("unmapped position")?;
    let original_at = LineIndex::new(code).offset(original.line as usize, original.column as usize);
    assert_eq!(original_at, code.find("\"x\""));
    assert_eq!(map.sources_content, vec![Some(code.to_string())]);
    Ok(())
}

#[test]
fn test_file_without_logger_import_is_identical() -> TestResult {
    let project = Project::new()?;
    let code = "import { render } from './view';\nrender(logger.log('x'));\nlogger.log('y');\n";
    let output = project.run("src/app.js", code)?;
    assert!(output.map.is_none());
    assert_eq!(output.code, code);
    Ok(())
}

#[test]
fn test_unrelated_file_with_unusual_syntax_passes_through() -> TestResult {
    let project = Project::new()?;
    let code = r#"import { h } from "vue";
if (ready) /[)]/.test(name)
const node = h("div", { class: "box", function: 1 })
const half = node.class / 2 / 3
export { node as default }"#;
    let output = project.run("src/app.js", code)?;
    assert!(output.map.is_none());
    assert_eq!(output.code, code);
    Ok(())
}

#[test]
fn test_rewrite_alongside_unusual_syntax() -> TestResult {
    let project = Project::new()?;
    let code = r#"import { logger } from "/src/logger";
_createElementVNode("div", { class: "box" })
if (x) /[)]/.test(s)
logger.log(x.class / 2 / 3)
const x = 1
export { x as y }"#;
    let expected = r#"import { logger } from "/src/logger";
_createElementVNode("div", { class: "box" })
if (x) /[)]/.test(s)
logger.log(x.class / 2 / 3)()
const x = 1
export { x as y }"#;
    assert_eq!(project.run("src/app.js", code)?.code, expected);
    Ok(())
}

#[test]
fn test_aliases_and_shadowing() -> TestResult {
    let project = Project::new()?;
    let code = r#"import log, { logger as l } from "./logger.ts";
export function view(items) {
  l.log("render", items.length)
  items.forEach((l) => { l.log("not the logger") })
  log.debug("default import")
  if (items.length === 0) l.debug.blue(`empty ${items}`)
  return l.log("value position")
}
"#;
    let expected = r#"import log, { logger as l } from "./logger.ts";
export function view(items) {
  l.log("render", items.length)()
  items.forEach((l) => { l.log("not the logger") })
  log.debug("default import")()
  if (items.length === 0) l.debug.blue(`empty ${items}`)()
  return l.log("value position")
}
"#;
    assert_eq!(project.run("src/app.js", code)?.code, expected);
    Ok(())
}

#[test]
fn test_syntax_error_reports_position() -> TestResult {
    let project = Project::new()?;
    let code = "import { logger } from '/src/logger';\nlogger.log((1);\n";
    let message = project
        .run("src/app.js", code)
        .err()
        .map(|e| e.to_string())
        .unwrap_or_default();
    assert!(message.ends_with(":2:11: unclosed ()"), "{message}");
    Ok(())
}

#[test]
fn test_custom_logger_path() -> TestResult {
    let project = Project::new()?;
    let lib = project.dir.path().join("lib");
    fs::create_dir_all(&lib)?;
    fs::write(lib.join("log.js"), "")?;

    let mut transform = LoggerCallTransform::new(TransformConfig::new("lib/log.js"));
    transform.config_resolved(project.dir.path().to_string_lossy());
    let code = "import { logger } from '../lib/log.js';\nlogger.log(1)\n";
    let output = transform.transform(code, &project.id("src/app.js"), &project.resolver)?;
    assert_eq!(output.code, "import { logger } from '../lib/log.js';\nlogger.log(1)()\n");
    Ok(())
}
